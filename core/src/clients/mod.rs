//! Resource clients: thin façades mapping backend actions onto the session.
//!
//! Every method returns the raw `HttpResponse` so callers can assert on
//! `status` and `body` whatever the server answered. The only exception is
//! `AuthClient::login`, a multi-step flow that needs each step to succeed.

mod account;
mod auth;
mod photo;
mod profile;

pub use account::{AccountClient, ACCOUNT_ENDPOINT, REGISTRATION_ENDPOINT};
pub use auth::{AuthClient, AUTH_ENDPOINT, CONFIRM_ENDPOINT, REFRESH_ENDPOINT};
pub use photo::{PhotoClient, PHOTO_FIELD, UPLOAD_ENDPOINT};
pub use profile::{ProfileClient, AVATAR_ENDPOINT, PROFILE_ENDPOINT};

use crate::error::ApiError;
use crate::http::HttpResponse;

/// Passes `response` through when it has the `expected` status.
fn expect_status(response: HttpResponse, expected: u16) -> Result<HttpResponse, ApiError> {
    if response.status == expected {
        return Ok(response);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body,
    })
}
