//! Shared harness for the end-to-end suites.
//!
//! Every test spawns its own mock backend on `127.0.0.1:0` and builds a
//! session with a fresh token store, so tests never share state.

#![allow(dead_code)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use rand::distr::Alphanumeric;
use rand::Rng;
use swipe_core::{
    AccountClient, AuthClient, AuthTokens, ErrorMessages, HttpResponse, MemorySink, PhotoClient, ProfileClient,
    Report, ReportContext, Session, SessionConfig, TokenStore,
};
use tokio::net::TcpListener;

pub const PHONE: &str = "380968607970";
pub const OTHER_PHONE: &str = "380501234567";
pub const SMS_CODE: u32 = 1111;
pub const WRONG_CODE: u32 = 2222;

pub const INVALID_PHONE: &str = "phone must be a valid phone number";
pub const VERIFICATION_NOT_FOUND: &str = "verification_request_not_found";
pub const NON_JWT_TOKEN: &str = "token must be a jwt string";
pub const NON_JWT_REFRESH_TOKEN: &str = "refreshToken must be a jwt string";
pub const REFRESH_TOKEN_INVALID: &str = "refresh_token_is_not_valid";
pub const PHOTO_REQUIRED: &str = "photo_object_is_required";
pub const NON_IMAGE: &str = "non_image_uploading";
pub const NOT_YOUR_PHOTO: &str = "you_can_use_only_yours_photos";
pub const REGISTRATION_COMPLETED: &str = "registration_is_already_completed";

pub const WRONG_TYPE_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/wrong_type_file.txt");

/// Starts a fresh backend and returns a config pointing at it.
pub async fn spawn_backend() -> SessionConfig {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { swipe_mock::run(listener).await });
    SessionConfig::new(&format!("http://{addr}")).unwrap()
}

/// A session wired to an in-memory report sink, plus its resource clients.
pub struct Harness {
    pub session: Session,
    pub sink: MemorySink,
    pub auth: AuthClient,
    pub account: AccountClient,
    pub profile: ProfileClient,
    pub photo: PhotoClient,
}

impl Harness {
    pub fn new(config: SessionConfig, name: &str) -> Self {
        let sink = MemorySink::new();
        let report = Report::new(ReportContext::new(name), Arc::new(sink.clone()));
        let session = Session::new(config, TokenStore::new(), report).unwrap();
        Self {
            auth: AuthClient::new(&session),
            account: AccountClient::new(&session),
            profile: ProfileClient::new(&session),
            photo: PhotoClient::new(&session),
            session,
            sink,
        }
    }

    pub async fn start(name: &str) -> Self {
        Self::new(spawn_backend().await, name)
    }

    pub async fn login(&self) -> AuthTokens {
        self.login_as(PHONE).await
    }

    pub async fn login_as(&self, phone: &str) -> AuthTokens {
        self.auth.login(phone, SMS_CODE).await.unwrap()
    }

    pub async fn account_id(&self) -> u64 {
        self.account.fetch_my_account().await.unwrap().id
    }
}

pub fn assert_status(response: &HttpResponse, status: u16) {
    assert_eq!(response.status, status, "unexpected response body: {}", response.body);
}

/// Asserts a 400 with the given error detail, in the shape the server sent.
pub fn assert_bad_request(response: &HttpResponse, error: ErrorMessages) {
    assert_error(response, 400, "Bad Request", error);
}

pub fn assert_forbidden(response: &HttpResponse, error: &str) {
    assert_error(response, 403, "Forbidden", ErrorMessages::one(error));
}

fn assert_error(response: &HttpResponse, status: u16, message: &str, error: ErrorMessages) {
    assert_status(response, status);
    let body = response.error_body().expect("error envelope");
    assert_eq!(body.status_code, status);
    assert_eq!(body.message, message);
    assert_eq!(body.error, Some(error));
}

/// An id well below anything the backend generates.
pub fn missing_id() -> u64 {
    rand::rng().random_range(1_000..10_000)
}

pub fn random_string(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// A few bytes that start like a JPEG; the backend only checks the type.
pub fn jpeg_bytes() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];
    data.extend(std::iter::repeat_n(0x42, 512));
    data.extend([0xFF, 0xD9]);
    data
}

/// A JPEG-looking payload over the backend's 2 MiB limit.
pub fn oversized_jpeg() -> Vec<u8> {
    let mut data = jpeg_bytes();
    data.resize(3 * 1024 * 1024, 0x42);
    data
}
