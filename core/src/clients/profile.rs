use crate::error::ApiError;
use crate::http::HttpResponse;
use crate::session::Session;

pub const PROFILE_ENDPOINT: &str = "/profile";
pub const AVATAR_ENDPOINT: &str = "/profile/avatar";

#[derive(Debug, Clone)]
pub struct ProfileClient {
    session: Session,
}

impl ProfileClient {
    pub fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
        }
    }

    pub async fn profile(&self, id: u64) -> Result<HttpResponse, ApiError> {
        self.session.get(PROFILE_ENDPOINT, Some(id)).await
    }

    /// Makes one of the caller's photos the profile avatar.
    pub async fn set_avatar(&self, photo_id: u64) -> Result<HttpResponse, ApiError> {
        self.session
            .put::<serde_json::Value>(AVATAR_ENDPOINT, photo_id, None)
            .await
    }
}
