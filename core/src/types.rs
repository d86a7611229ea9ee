//! Domain DTOs for the swipe API.
//!
//! # Design
//! Field names follow the backend's JSON (camelCase, with a few legacy
//! spellings such as `accountID` and the profile's `fullname`). The mock
//! backend defines its own copies; the end-to-end suite catches drift.

use serde::{Deserialize, Serialize};

/// Body of `POST /auth/phone`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhoneRequest {
    pub phone: String,
}

/// Response of `POST /auth/phone`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Confirmation {
    pub confirmation_id: u64,
}

/// Body of `POST /auth/phone/confirm`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub confirmation_id: u64,
    pub code: u32,
}

/// Token pair issued by confirm and refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub token: String,
    pub refresh_token: String,
    pub expire_in: u64,
}

/// Body of `POST /auth/refresh`. The server ignores `expireIn`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub token: String,
    pub refresh_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_in: Option<u64>,
}

impl From<&AuthTokens> for RefreshRequest {
    fn from(tokens: &AuthTokens) -> Self {
        Self {
            token: tokens.token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            expire_in: Some(tokens.expire_in),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Undefined,
}

/// Body of `POST /account/complete-registration`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub full_name: String,
    pub gender: Gender,
    pub preferred_gender: Gender,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AvatarUrls {
    pub small: String,
    pub medium: String,
    pub swipe: String,
    pub original: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Avatar {
    pub urls: AvatarUrls,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: u64,
    #[serde(rename = "accountID")]
    pub account_id: u64,
    pub is_adult: bool,
    pub created_at: i64,
    pub key: Avatar,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub id: u64,
    pub age: Option<u32>,
    pub country: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub description: Option<String>,
    pub work_description: Option<String>,
    pub last_seen: i64,
    pub is_registration_completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub id: u64,
    #[serde(rename = "accountID")]
    pub account_id: u64,
    pub gender: Option<Gender>,
    pub default_search_range: u32,
    pub gender_preferences: Option<Gender>,
    pub show_men_in_search: bool,
    pub show_women_in_search: bool,
    pub show_undefined_in_search: bool,
    pub push_notifications: bool,
    pub age_from: Option<u32>,
    pub age_to: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: u64,
    pub full_name: Option<String>,
    pub avatar: Option<Avatar>,
    pub online: bool,
    pub status: String,
    pub info: AccountInfo,
    pub preferences: Preferences,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: u64,
    pub gender: Option<Gender>,
    pub fullname: Option<String>,
    pub age: Option<u32>,
    pub country: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub description: Option<String>,
    pub work_description: Option<String>,
    pub last_seen: i64,
    pub is_registration_completed: bool,
    pub avatar: Option<Avatar>,
    pub photos: Vec<Photo>,
    pub tags: Vec<String>,
}

/// The backend's error envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorMessages>,
}

/// Error detail. Endpoints differ in whether a single failure is a bare
/// string or a one-element list; both shapes are kept as sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ErrorMessages {
    One(String),
    Many(Vec<String>),
}

impl ErrorMessages {
    pub fn one(message: &str) -> Self {
        ErrorMessages::One(message.to_string())
    }

    pub fn many(messages: &[&str]) -> Self {
        ErrorMessages::Many(messages.iter().map(|m| m.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_uses_backend_field_names() {
        let raw = serde_json::json!({
            "id": 7,
            "accountID": 3,
            "isAdult": false,
            "createdAt": 1_600_000_000_000i64,
            "key": {
                "urls": {"small": "s", "medium": "m", "swipe": "w", "original": "o"},
                "key": "abc"
            }
        });
        let photo: Photo = serde_json::from_value(raw).unwrap();
        assert_eq!(photo.account_id, 3);
        assert_eq!(photo.key.key.as_deref(), Some("abc"));
    }

    #[test]
    fn refresh_request_omits_missing_ttl() {
        let req = RefreshRequest {
            token: "a.b.c".to_string(),
            refresh_token: "d.e.f".to_string(),
            expire_in: None,
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body, serde_json::json!({"token": "a.b.c", "refreshToken": "d.e.f"}));
    }

    #[test]
    fn registration_serializes_lowercase_genders() {
        let req = Registration {
            full_name: "Ann Lee".to_string(),
            gender: Gender::Female,
            preferred_gender: Gender::Undefined,
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["fullName"], "Ann Lee");
        assert_eq!(body["gender"], "female");
        assert_eq!(body["preferredGender"], "undefined");
    }
}
