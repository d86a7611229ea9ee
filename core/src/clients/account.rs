use super::expect_status;
use crate::error::ApiError;
use crate::http::HttpResponse;
use crate::session::Session;
use crate::types::{Account, Registration};

pub const ACCOUNT_ENDPOINT: &str = "/account";
pub const REGISTRATION_ENDPOINT: &str = "/account/complete-registration";

#[derive(Debug, Clone)]
pub struct AccountClient {
    session: Session,
}

impl AccountClient {
    pub fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
        }
    }

    pub async fn my_account(&self) -> Result<HttpResponse, ApiError> {
        self.session.get(ACCOUNT_ENDPOINT, None).await
    }

    /// Fetches and decodes the caller's account, failing on any status but 200.
    pub async fn fetch_my_account(&self) -> Result<Account, ApiError> {
        expect_status(self.my_account().await?, 200)?.json()
    }

    /// Deletes the account and clears the stored token, whatever the status.
    pub async fn delete_account(&self, id: u64) -> Result<HttpResponse, ApiError> {
        let response = self.session.delete(ACCOUNT_ENDPOINT, id).await?;
        self.session.tokens().remove();
        Ok(response)
    }

    pub async fn complete_registration(&self, body: &Registration) -> Result<HttpResponse, ApiError> {
        self.session.post(REGISTRATION_ENDPOINT, body).await
    }
}
