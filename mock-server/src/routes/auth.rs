//! Phone login, token refresh and the bearer-token extractor.

use std::sync::LazyLock;

use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::Json;
use regex::Regex;
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiFailure;
use crate::extract::JsonBody;
use crate::jwt::{is_jwt, Signer};
use crate::messages::{
    INVALID_PHONE, NON_JWT_REFRESH_TOKEN, NON_JWT_TOKEN, REFRESH_TOKEN_INVALID, VERIFICATION_NOT_FOUND,
};
use crate::state::{AppState, TokenPair, TOKEN_TTL_SECS};

/// Ukrainian mobile number, with or without a leading `+`.
static UA_PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?380\d{9}$").expect("Invalid regex"));

const ACCESS: u64 = 0;
const REFRESH: u64 = 1;

/// The account behind a valid, current bearer token.
pub struct CurrentAccount(pub u64);

impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = ApiFailure;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .filter(|token| !token.is_empty())
            .ok_or_else(ApiFailure::unauthorized)?;

        let claims = state.signer.verify(token).ok_or_else(ApiFailure::unauthorized)?;
        if claims["type"].as_u64() != Some(ACCESS) {
            return Err(ApiFailure::unauthorized());
        }
        let id = claims["id"].as_u64().ok_or_else(ApiFailure::unauthorized)?;

        if !state.db.read().await.is_current_token(id, token) {
            return Err(ApiFailure::unauthorized());
        }
        Ok(CurrentAccount(id))
    }
}

pub async fn send_phone(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<(StatusCode, Json<Value>), ApiFailure> {
    let phone = body
        .get("phone")
        .and_then(Value::as_str)
        .filter(|phone| UA_PHONE.is_match(phone))
        .ok_or_else(|| ApiFailure::invalid_fields(vec![INVALID_PHONE.to_string()]))?;

    let confirmation_id = state
        .db
        .write()
        .await
        .create_confirmation(phone.trim_start_matches('+'));
    info!(confirmation_id, "verification code sent");
    Ok((StatusCode::CREATED, Json(json!({ "confirmation_id": confirmation_id }))))
}

pub async fn confirm(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<(StatusCode, Json<Value>), ApiFailure> {
    let confirmation_id = body.get("confirmation_id").and_then(Value::as_u64);
    let code = body.get("code").and_then(Value::as_u64);

    let mut db = state.db.write().await;
    let phone = match (confirmation_id, code) {
        (Some(id), Some(code)) => db.use_confirmation(id, code),
        _ => None,
    }
    .ok_or_else(|| ApiFailure::bad_request(VERIFICATION_NOT_FOUND))?;

    let account_id = db.account_for_phone(&phone);
    let pair = db.issue_tokens(&state.signer, account_id);
    info!(account_id, "phone confirmed");
    Ok((StatusCode::CREATED, Json(tokens_json(&pair))))
}

/// Issues a new pair. Any `expireIn` in the body is ignored.
pub async fn refresh(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<(StatusCode, Json<Value>), ApiFailure> {
    let token = body.get("token").and_then(Value::as_str).filter(|t| is_jwt(t));
    let refresh_token = body
        .get("refreshToken")
        .and_then(Value::as_str)
        .filter(|t| is_jwt(t));

    let (Some(token), Some(refresh_token)) = (token, refresh_token) else {
        let mut errors = Vec::new();
        if token.is_none() {
            errors.push(NON_JWT_TOKEN.to_string());
        }
        if refresh_token.is_none() {
            errors.push(NON_JWT_REFRESH_TOKEN.to_string());
        }
        return Err(ApiFailure::invalid_fields(errors));
    };

    let account_id = verify_pair(&state.signer, token, refresh_token)
        .ok_or_else(|| ApiFailure::forbidden(REFRESH_TOKEN_INVALID))?;

    let mut db = state.db.write().await;
    if db.account(account_id).is_none() {
        return Err(ApiFailure::forbidden(REFRESH_TOKEN_INVALID));
    }
    let pair = db.issue_tokens(&state.signer, account_id);
    info!(account_id, "tokens refreshed");
    Ok((StatusCode::CREATED, Json(tokens_json(&pair))))
}

/// Both tokens must be ours, of the right type, for the same account, and
/// the refresh token must have been issued alongside `token`.
fn verify_pair(signer: &Signer, token: &str, refresh_token: &str) -> Option<u64> {
    let access = signer.verify(token)?;
    let refresh = signer.verify(refresh_token)?;
    let id = access["id"].as_u64()?;
    let paired = access["type"].as_u64() == Some(ACCESS)
        && refresh["type"].as_u64() == Some(REFRESH)
        && refresh["id"].as_u64() == Some(id)
        && refresh["generalToken"].as_str() == Some(token);
    paired.then_some(id)
}

fn tokens_json(pair: &TokenPair) -> Value {
    json!({
        "token": pair.token,
        "refreshToken": pair.refresh_token,
        "expireIn": TOKEN_TTL_SECS,
    })
}
