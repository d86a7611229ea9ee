//! JSON shapes served by the mock backend.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarUrls {
    pub small: String,
    pub medium: String,
    pub swipe: String,
    pub original: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    pub urls: AvatarUrls,
    pub key: String,
}

impl Avatar {
    pub fn for_key(account_id: u64, key: &str) -> Self {
        let url = |size: &str| format!("https://cdn.swipe.test/photos/{account_id}/{key}/{size}.jpg");
        Self {
            urls: AvatarUrls {
                small: url("small"),
                medium: url("medium"),
                swipe: url("swipe"),
                original: url("original"),
            },
            key: key.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: u64,
    #[serde(rename = "accountID")]
    pub account_id: u64,
    pub is_adult: bool,
    pub created_at: i64,
    pub key: Avatar,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
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

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub id: u64,
    #[serde(rename = "accountID")]
    pub account_id: u64,
    pub gender: Option<String>,
    pub default_search_range: u32,
    pub gender_preferences: Option<String>,
    pub show_men_in_search: bool,
    pub show_women_in_search: bool,
    pub show_undefined_in_search: bool,
    pub push_notifications: bool,
    pub age_from: Option<u32>,
    pub age_to: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
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

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: u64,
    pub gender: Option<String>,
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
