use axum::extract::State;
use axum::Json;
use tracing::info;

use super::auth::CurrentAccount;
use crate::error::ApiFailure;
use crate::extract::IdPath;
use crate::messages::{NOT_YOUR_PHOTO, PROFILE_NOT_FOUND};
use crate::models::{Photo, Profile};
use crate::state::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    CurrentAccount(_): CurrentAccount,
    IdPath(id): IdPath,
) -> Result<Json<Profile>, ApiFailure> {
    state
        .db
        .read()
        .await
        .profile_view(id)
        .map(Json)
        .ok_or_else(|| ApiFailure::not_found(PROFILE_NOT_FOUND))
}

/// Only the caller's own photos can become the avatar.
pub async fn set_avatar(
    State(state): State<AppState>,
    CurrentAccount(id): CurrentAccount,
    IdPath(photo_id): IdPath,
) -> Result<Json<Photo>, ApiFailure> {
    let mut db = state.db.write().await;
    let photo = db
        .photo(photo_id)
        .filter(|photo| photo.account_id == id)
        .ok_or_else(|| ApiFailure::forbidden(NOT_YOUR_PHOTO))?;
    if let Some(record) = db.account_mut(id) {
        record.avatar_photo = Some(photo.id);
    }
    info!(account_id = id, photo_id, "avatar set");
    Ok(Json(photo))
}
