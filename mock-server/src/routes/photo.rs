use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use super::auth::CurrentAccount;
use crate::error::ApiFailure;
use crate::messages::{NON_IMAGE, PHOTO_REQUIRED};
use crate::models::Photo;
use crate::state::{AppState, MAX_PHOTO_BYTES};

/// Multipart field holding the upload.
pub const PHOTO_FIELD: &str = "photo";

/// Checks run in order: present and non-empty, image content type, size.
pub async fn upload(
    State(state): State<AppState>,
    CurrentAccount(id): CurrentAccount,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Photo>), ApiFailure> {
    let mut multipart = multipart?;
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiFailure::bad_request(&e.body_text()))?
    {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiFailure::bad_request(&e.body_text()))?;
        upload = Some((content_type, data));
    }

    let Some((content_type, data)) = upload.filter(|(_, data)| !data.is_empty()) else {
        return Err(ApiFailure::bad_request(PHOTO_REQUIRED));
    };
    if !content_type.as_deref().is_some_and(|ct| ct.starts_with("image/")) {
        return Err(ApiFailure::bad_request(NON_IMAGE));
    }
    if data.len() > MAX_PHOTO_BYTES {
        return Err(ApiFailure::payload_too_large());
    }

    let photo = state.db.write().await.add_photo(id);
    info!(account_id = id, photo_id = photo.id, size = data.len(), "photo uploaded");
    Ok((StatusCode::CREATED, Json(photo)))
}
