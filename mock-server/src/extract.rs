//! Extractors that reject with the backend's error envelope instead of
//! axum's plain-text bodies.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiFailure;

/// A JSON request body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiFailure))]
pub struct JsonBody<T>(pub T);

/// A numeric id taken from the last path segment.
#[derive(FromRequestParts, serde::Deserialize)]
#[from_request(via(axum::extract::Path), rejection(ApiFailure))]
pub struct IdPath(pub u64);
