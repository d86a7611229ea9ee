//! In-memory backend state.
//!
//! One `Backend` behind a tokio `RwLock`, shared by every handler. Ids for
//! confirmations and photos start high enough that small random ids used as
//! "does not exist" probes never collide with real ones.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::jwt::Signer;
use crate::models::{Account, AccountInfo, Avatar, Photo, Preferences, Profile};

/// The SMS code every confirmation accepts.
pub const SMS_CODE: u64 = 1111;

/// Lifetime reported for every issued token, whatever the client asks for.
pub const TOKEN_TTL_SECS: u64 = 86_400;

/// Largest accepted photo.
pub const MAX_PHOTO_BYTES: usize = 2 * 1024 * 1024;

const FIRST_GENERATED_ID: u64 = 10_000;
const DEFAULT_SEARCH_RANGE: u32 = 50;

pub type Db = Arc<RwLock<Backend>>;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub signer: Arc<Signer>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            db: Arc::new(RwLock::new(Backend::default())),
            signer: Arc::new(Signer::random()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct PendingConfirmation {
    pub phone: String,
    pub used: bool,
}

#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub id: u64,
    pub phone: String,
    pub full_name: Option<String>,
    pub gender: Option<String>,
    pub preferred_gender: Option<String>,
    pub registration_completed: bool,
    pub avatar_photo: Option<u64>,
    pub last_seen: i64,
}

#[derive(Debug, Clone)]
pub struct PhotoRecord {
    pub id: u64,
    pub account_id: u64,
    pub created_at: i64,
    pub key: String,
}

/// Issued token pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Default)]
pub struct Backend {
    next_account: u64,
    next_generated: u64,
    accounts: HashMap<u64, AccountRecord>,
    phones: HashMap<String, u64>,
    confirmations: HashMap<u64, PendingConfirmation>,
    photos: BTreeMap<u64, PhotoRecord>,
    /// Current access token per account. Older tokens no longer authenticate.
    sessions: HashMap<u64, String>,
}

impl Backend {
    fn generated_id(&mut self) -> u64 {
        self.next_generated = self.next_generated.max(FIRST_GENERATED_ID) + 1;
        self.next_generated
    }

    pub fn create_confirmation(&mut self, phone: &str) -> u64 {
        let id = self.generated_id();
        self.confirmations.insert(
            id,
            PendingConfirmation {
                phone: phone.to_string(),
                used: false,
            },
        );
        id
    }

    /// Consumes a confirmation when the code matches; returns its phone.
    pub fn use_confirmation(&mut self, id: u64, code: u64) -> Option<String> {
        let pending = self.confirmations.get_mut(&id)?;
        if pending.used || code != SMS_CODE {
            return None;
        }
        pending.used = true;
        Some(pending.phone.clone())
    }

    /// Finds the account registered to `phone`, creating an empty one.
    pub fn account_for_phone(&mut self, phone: &str) -> u64 {
        if let Some(id) = self.phones.get(phone) {
            return *id;
        }
        self.next_account += 1;
        let id = self.next_account;
        self.accounts.insert(
            id,
            AccountRecord {
                id,
                phone: phone.to_string(),
                full_name: None,
                gender: None,
                preferred_gender: None,
                registration_completed: false,
                avatar_photo: None,
                last_seen: now_millis(),
            },
        );
        self.phones.insert(phone.to_string(), id);
        tracing::info!(account_id = id, "account created");
        id
    }

    pub fn account(&self, id: u64) -> Option<&AccountRecord> {
        self.accounts.get(&id)
    }

    pub fn account_mut(&mut self, id: u64) -> Option<&mut AccountRecord> {
        self.accounts.get_mut(&id)
    }

    pub fn delete_account(&mut self, id: u64) -> bool {
        let Some(record) = self.accounts.remove(&id) else {
            return false;
        };
        self.phones.remove(&record.phone);
        self.sessions.remove(&id);
        self.photos.retain(|_, photo| photo.account_id != id);
        tracing::info!(account_id = id, "account deleted");
        true
    }

    /// Signs a fresh token pair and makes its access token the current one.
    pub fn issue_tokens(&mut self, signer: &Signer, account_id: u64) -> TokenPair {
        let issued_at = now_millis() / 1000;
        let token = signer.sign(&json!({
            "id": account_id,
            "type": 0,
            "jti": Uuid::new_v4(),
            "iat": issued_at,
        }));
        let refresh_token = signer.sign(&json!({
            "id": account_id,
            "type": 1,
            "generalToken": token,
            "jti": Uuid::new_v4(),
            "iat": issued_at,
        }));
        self.sessions.insert(account_id, token.clone());
        TokenPair { token, refresh_token }
    }

    pub fn is_current_token(&self, account_id: u64, token: &str) -> bool {
        self.sessions.get(&account_id).is_some_and(|current| current == token)
    }

    pub fn add_photo(&mut self, account_id: u64) -> Photo {
        let id = self.generated_id();
        let record = PhotoRecord {
            id,
            account_id,
            created_at: now_millis(),
            key: Uuid::new_v4().simple().to_string(),
        };
        let photo = photo_view(&record);
        self.photos.insert(id, record);
        photo
    }

    pub fn photo(&self, id: u64) -> Option<Photo> {
        self.photos.get(&id).map(photo_view)
    }

    fn avatar_of(&self, record: &AccountRecord) -> Option<Avatar> {
        record
            .avatar_photo
            .and_then(|id| self.photos.get(&id))
            .map(|photo| photo_view(photo).key)
    }

    pub fn account_view(&self, id: u64) -> Option<Account> {
        let record = self.accounts.get(&id)?;
        let preferred = record.preferred_gender.as_deref();
        Some(Account {
            id,
            full_name: record.full_name.clone(),
            avatar: self.avatar_of(record),
            online: true,
            status: "active".to_string(),
            info: AccountInfo {
                id,
                age: None,
                country: None,
                location: None,
                city: None,
                description: None,
                work_description: None,
                last_seen: record.last_seen,
                is_registration_completed: record.registration_completed,
            },
            preferences: Preferences {
                id,
                account_id: id,
                gender: record.gender.clone(),
                default_search_range: DEFAULT_SEARCH_RANGE,
                gender_preferences: record.preferred_gender.clone(),
                show_men_in_search: matches!(preferred, None | Some("male") | Some("undefined")),
                show_women_in_search: matches!(preferred, None | Some("female") | Some("undefined")),
                show_undefined_in_search: matches!(preferred, None | Some("undefined")),
                push_notifications: true,
                age_from: None,
                age_to: None,
            },
        })
    }

    pub fn profile_view(&self, id: u64) -> Option<Profile> {
        let record = self.accounts.get(&id)?;
        Some(Profile {
            id,
            gender: record.gender.clone(),
            fullname: record.full_name.clone(),
            age: None,
            country: None,
            location: None,
            city: None,
            description: None,
            work_description: None,
            last_seen: record.last_seen,
            is_registration_completed: record.registration_completed,
            avatar: self.avatar_of(record),
            photos: self
                .photos
                .values()
                .filter(|photo| photo.account_id == id)
                .map(photo_view)
                .collect(),
            tags: Vec::new(),
        })
    }
}

fn photo_view(record: &PhotoRecord) -> Photo {
    Photo {
        id: record.id,
        account_id: record.account_id,
        is_adult: false,
        created_at: record.created_at,
        key: Avatar::for_key(record.account_id, &record.key),
    }
}

pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_is_single_use_and_code_checked() {
        let mut backend = Backend::default();
        let id = backend.create_confirmation("380968607970");
        assert!(id > FIRST_GENERATED_ID);
        assert_eq!(backend.use_confirmation(id, 1234), None);
        assert_eq!(backend.use_confirmation(id, SMS_CODE).as_deref(), Some("380968607970"));
        assert_eq!(backend.use_confirmation(id, SMS_CODE), None);
    }

    #[test]
    fn same_phone_maps_to_same_account_until_deleted() {
        let mut backend = Backend::default();
        let first = backend.account_for_phone("380968607970");
        assert_eq!(backend.account_for_phone("380968607970"), first);
        assert!(backend.delete_account(first));
        assert_ne!(backend.account_for_phone("380968607970"), first);
    }

    #[test]
    fn only_latest_token_is_current() {
        let mut backend = Backend::default();
        let signer = Signer::random();
        let id = backend.account_for_phone("380968607970");
        let old = backend.issue_tokens(&signer, id);
        let new = backend.issue_tokens(&signer, id);
        assert_ne!(old.token, new.token);
        assert!(!backend.is_current_token(id, &old.token));
        assert!(backend.is_current_token(id, &new.token));
    }

    #[test]
    fn profile_lists_photos_in_upload_order_and_avatar_key() {
        let mut backend = Backend::default();
        let id = backend.account_for_phone("380968607970");
        let first = backend.add_photo(id);
        let second = backend.add_photo(id);
        backend.account_mut(id).unwrap().avatar_photo = Some(second.id);

        let profile = backend.profile_view(id).unwrap();
        assert_eq!(profile.photos, vec![first, second.clone()]);
        assert_eq!(profile.avatar, Some(second.key));
    }

    #[test]
    fn deleting_account_drops_its_photos() {
        let mut backend = Backend::default();
        let id = backend.account_for_phone("380968607970");
        let photo = backend.add_photo(id);
        backend.delete_account(id);
        assert_eq!(backend.photo(photo.id), None);
    }
}
