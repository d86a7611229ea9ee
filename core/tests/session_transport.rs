//! Session behaviour that does not depend on a particular resource.

mod common;

use std::sync::Arc;

use common::*;
use pretty_assertions::assert_eq;
use swipe_core::config::BASE_URL_ENV;
use swipe_core::{
    ApiError, MemorySink, Report, ReportContext, ReqwestTransport, Session, SessionConfig, TokenStore,
    TransportErrorKind,
};

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = SessionConfig::new(&format!("http://{addr}")).unwrap();
    let h = Harness::new(config, "offline");
    let err = h.auth.send_phone(PHONE).await.unwrap_err();

    let ApiError::Transport(err) = err else {
        panic!("expected a transport error, got {err:?}");
    };
    assert_eq!(err.kind, TransportErrorKind::Connect);
    assert!(err.response.is_none());
    let request = err.request.expect("dispatched request");
    assert_eq!(request.url, format!("http://{addr}/auth/phone"));

    let errors = h.sink.values("Error");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["method"], "POST");
}

#[tokio::test]
async fn error_statuses_are_values() {
    let h = Harness::start("unauthorized").await;

    let response = h.account.my_account().await.unwrap();
    assert_status(&response, 401);
    assert_eq!(response.status_text, "Unauthorized");
    assert_eq!(h.sink.values("Error Response").len(), 1);
    assert!(h.sink.values("Response").is_empty());
}

#[tokio::test]
async fn every_request_carries_an_authorization_header() {
    let h = Harness::start("auth header").await;
    h.login().await;
    h.account.my_account().await.unwrap();

    let headers = h.sink.values("Request Headers");
    assert_eq!(headers.len(), 3);
    assert_eq!(headers[0]["authorization"], "");
    assert_eq!(headers[1]["authorization"], "");
    let token = h.session.tokens().get().unwrap();
    assert_eq!(headers[2]["authorization"], format!("Bearer {token}"));
}

#[tokio::test]
async fn sessions_do_not_share_tokens() {
    let config = spawn_backend().await;
    let alice = Harness::new(config.clone(), "alice");
    let bob = Harness::new(config, "bob");

    alice.login().await;
    assert_status(&alice.account.my_account().await.unwrap(), 200);
    assert_status(&bob.account.my_account().await.unwrap(), 401);
    assert!(bob.session.tokens().is_empty());
    assert!(bob.sink.entries_for("alice").is_empty());
}

#[tokio::test]
async fn shared_store_follows_login() {
    let config = spawn_backend().await;
    let tokens = TokenStore::new();
    let sink = MemorySink::new();
    let report = Report::new(ReportContext::new("shared"), Arc::new(sink.clone()));
    let session = Session::new(config, tokens.clone(), report).unwrap();

    swipe_core::AuthClient::new(&session).login(PHONE, SMS_CODE).await.unwrap();
    assert!(!tokens.is_empty());

    tokens.remove();
    let response = swipe_core::AccountClient::new(&session).my_account().await.unwrap();
    assert_status(&response, 401);
}

#[tokio::test]
async fn plain_transport_reports_error_statuses_as_responses() {
    let sink = MemorySink::new();
    let transport = ReqwestTransport::new().unwrap().status_as_error(false);
    let session = Session::builder(spawn_backend().await)
        .report(Report::new(ReportContext::new("plain"), Arc::new(sink.clone())))
        .transport(Arc::new(transport))
        .build()
        .unwrap();

    let response = swipe_core::AccountClient::new(&session).my_account().await.unwrap();

    assert_status(&response, 401);
    assert!(!response.is_success());
    assert_eq!(sink.values("Response").len(), 1);
    assert!(sink.values("Error Response").is_empty());
}

#[tokio::test]
async fn session_from_environment() {
    let config = spawn_backend().await;
    // The only test in this binary that touches the environment.
    std::env::set_var(BASE_URL_ENV, config.base_url());
    let from_env = SessionConfig::from_env().unwrap();
    std::env::remove_var(BASE_URL_ENV);
    assert_eq!(from_env, config);

    let session = Session::builder(from_env)
        .report(Report::tracing("from env"))
        .build()
        .unwrap();
    let response = swipe_core::AuthClient::new(&session).send_phone(PHONE).await.unwrap();
    assert_status(&response, 201);
    assert!(response.is_success());
}

#[test]
fn config_rejects_relative_urls() {
    assert!(matches!(SessionConfig::new("localhost"), Err(ApiError::InvalidUrl(_))));
}
