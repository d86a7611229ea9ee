use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::error::ApiError;
use crate::http::{FormBody, HttpMethod, HttpResponse, RequestBody};
use crate::session::Session;

pub const UPLOAD_ENDPOINT: &str = "/photo/upload";

/// Multipart field the backend reads the photo from.
pub const PHOTO_FIELD: &str = "photo";

/// Photo uploads. Large files can set a per-call timeout budget.
#[derive(Debug, Clone)]
pub struct PhotoClient {
    session: Session,
    timeout: Option<Duration>,
}

impl PhotoClient {
    pub fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Uploads `data` under `file_name`; the content type follows the extension.
    pub async fn upload(&self, file_name: &str, data: Vec<u8>) -> Result<HttpResponse, ApiError> {
        debug!(file_name, size = data.len(), "uploading photo");
        self.send(FormBody::new().file(PHOTO_FIELD, file_name, data))
            .await
    }

    /// Reads a file from disk and uploads it.
    pub async fn upload_file(&self, path: impl AsRef<Path>) -> Result<HttpResponse, ApiError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ApiError::Local(format!("{} has no file name", path.display())))?
            .to_string();
        let data = tokio::fs::read(path).await?;
        self.upload(&file_name, data).await
    }

    /// Sends the photo field with an empty value.
    pub async fn upload_empty(&self) -> Result<HttpResponse, ApiError> {
        self.send(FormBody::new().text(PHOTO_FIELD, "")).await
    }

    async fn send(&self, form: FormBody) -> Result<HttpResponse, ApiError> {
        match self.timeout {
            None => {
                self.session
                    .form_request(HttpMethod::Post, UPLOAD_ENDPOINT, form)
                    .await
            }
            Some(timeout) => {
                let request = self
                    .session
                    .descriptor(HttpMethod::Post, UPLOAD_ENDPOINT, RequestBody::Multipart(form))
                    .with_timeout(timeout);
                self.session.send(request).await
            }
        }
    }
}
