//! The backend's error envelope.

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Error detail: a single code or a list of field messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Messages {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Messages>,
}

/// A failed request, rendered as `{statusCode, message, error}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub error: Option<Messages>,
}

impl ApiFailure {
    pub fn new(status: StatusCode, error: Option<Messages>) -> Self {
        Self { status, error }
    }

    pub fn bad_request(code: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, Some(Messages::One(code.to_string())))
    }

    pub fn invalid_fields(messages: Vec<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, Some(Messages::Many(messages)))
    }

    pub fn forbidden(code: &str) -> Self {
        Self::new(StatusCode::FORBIDDEN, Some(Messages::One(code.to_string())))
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, None)
    }

    pub fn not_found(code: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, Some(Messages::One(code.to_string())))
    }

    pub fn payload_too_large() -> Self {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE, None)
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            status_code: self.status.as_u16(),
            message: self.status.canonical_reason().unwrap_or("Error").to_string(),
            error: self.error.clone(),
        }
    }
}

impl From<JsonRejection> for ApiFailure {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), Some(Messages::One(rejection.body_text())))
    }
}

impl From<PathRejection> for ApiFailure {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.status(), Some(Messages::One(rejection.body_text())))
    }
}

impl From<MultipartRejection> for ApiFailure {
    fn from(rejection: MultipartRejection) -> Self {
        Self::new(rejection.status(), Some(Messages::One(rejection.body_text())))
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        tracing::debug!(status = self.status.as_u16(), error = ?self.error, "request rejected");
        (self.status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_uses_reason_phrase_as_message() {
        let body = ApiFailure::forbidden("you_can_use_only_yours_photos").body();
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "statusCode": 403,
                "message": "Forbidden",
                "error": "you_can_use_only_yours_photos"
            })
        );
    }

    #[test]
    fn field_errors_are_a_list() {
        let body = ApiFailure::invalid_fields(vec!["phone must be a valid phone number".to_string()]).body();
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["message"], "Bad Request");
        assert_eq!(json["error"], serde_json::json!(["phone must be a valid phone number"]));
    }

    #[test]
    fn unauthorized_has_no_error_detail() {
        let json = serde_json::to_value(ApiFailure::unauthorized().body()).unwrap();
        assert_eq!(json, serde_json::json!({"statusCode": 401, "message": "Unauthorized"}));
    }
}
