use tracing::info;

use super::expect_status;
use crate::error::ApiError;
use crate::http::HttpResponse;
use crate::session::Session;
use crate::types::{AuthTokens, ConfirmRequest, Confirmation, PhoneRequest, RefreshRequest};

pub const AUTH_ENDPOINT: &str = "/auth/phone";
pub const CONFIRM_ENDPOINT: &str = "/auth/phone/confirm";
pub const REFRESH_ENDPOINT: &str = "/auth/refresh";

/// Phone + SMS code authentication.
#[derive(Debug, Clone)]
pub struct AuthClient {
    session: Session,
}

impl AuthClient {
    pub fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
        }
    }

    /// Requests an SMS code for `phone`.
    pub async fn send_phone(&self, phone: &str) -> Result<HttpResponse, ApiError> {
        let body = PhoneRequest {
            phone: phone.to_string(),
        };
        self.session.post(AUTH_ENDPOINT, &body).await
    }

    /// Exchanges a confirmation id and code for a token pair.
    pub async fn confirm(&self, confirmation_id: u64, code: u32) -> Result<HttpResponse, ApiError> {
        let body = ConfirmRequest { confirmation_id, code };
        self.session.post(CONFIRM_ENDPOINT, &body).await
    }

    /// Full login: request a code, confirm it, store the access token.
    ///
    /// Each step completes before the next is built, so the token store holds
    /// the new token by the time this returns.
    pub async fn login(&self, phone: &str, code: u32) -> Result<AuthTokens, ApiError> {
        let response = expect_status(self.send_phone(phone).await?, 201)?;
        let confirmation: Confirmation = response.json()?;

        let response = expect_status(self.confirm(confirmation.confirmation_id, code).await?, 201)?;
        let tokens: AuthTokens = response.json()?;

        self.session.tokens().set(tokens.token.clone());
        info!(confirmation_id = confirmation.confirmation_id, "logged in");
        Ok(tokens)
    }

    pub async fn refresh(&self, body: &RefreshRequest) -> Result<HttpResponse, ApiError> {
        self.session.post(REFRESH_ENDPOINT, body).await
    }
}
