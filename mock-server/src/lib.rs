//! In-memory stand-in for the swipe backend.
//!
//! Serves the phone-login, account, profile and photo endpoints with the
//! same status codes and error envelope as the real service, so the core
//! crate's end-to-end suite can run against it.

pub mod error;
mod extract;
mod jwt;
pub mod messages;
pub mod models;
mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tokio::net::TcpListener;

use crate::routes::{account, auth, photo, profile};
pub use crate::routes::photo::PHOTO_FIELD;
pub use crate::state::AppState;

/// Request bodies up to this size are read in full, so oversized photos get
/// the backend's own 413 envelope instead of a bare rejection.
const BODY_LIMIT_BYTES: usize = 16 * 1024 * 1024;

pub fn app() -> Router {
    app_with_state(AppState::new())
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/auth/phone", post(auth::send_phone))
        .route("/auth/phone/confirm", post(auth::confirm))
        .route("/auth/refresh", post(auth::refresh))
        .route("/account", get(account::my_account))
        .route("/account/complete-registration", post(account::complete_registration))
        .route("/account/{id}", delete(account::delete_account))
        .route("/photo/upload", post(photo::upload))
        .route("/profile/{id}", get(profile::get_profile))
        .route("/profile/avatar/{id}", put(profile::set_avatar))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}
