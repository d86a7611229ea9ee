//! The network seam of the session.
//!
//! A `Transport` takes a finished `HttpRequest` and performs the round-trip.
//! `ReqwestTransport` is the real one. Like most HTTP layers it can treat a
//! non-2xx status as an error; such errors still carry the response, and the
//! session's response hooks turn them back into values.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};

use crate::error::{ApiError, TransportError, TransportErrorKind};
use crate::http::{decode_body, FormBody, HttpMethod, HttpRequest, HttpResponse, RequestBody, CONTENT_TYPE};

/// Result of one transport call, as seen by the response hooks.
pub type Outcome = Result<HttpResponse, TransportError>;

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Outcome;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    status_as_error: bool,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ApiError> {
        Self::with_timeout(None)
    }

    /// Builds a client with an optional default timeout for every request.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder().user_agent(concat!("swipe-core/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Config(format!("cannot build http client: {e}")))?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            status_as_error: true,
        }
    }

    /// Whether a non-2xx status is reported as an error carrying the
    /// response. On by default.
    pub fn status_as_error(mut self, enabled: bool) -> Self {
        self.status_as_error = enabled;
        self
    }

    fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    fn build(&self, request: &HttpRequest) -> Result<reqwest::RequestBuilder, TransportError> {
        let multipart = matches!(request.body, RequestBody::Multipart(_));
        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), &request.url);

        for (name, value) in &request.headers {
            // reqwest writes the multipart content type itself, with the boundary.
            if multipart && name.eq_ignore_ascii_case(CONTENT_TYPE) {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(form) => builder.multipart(to_form(form)?),
        };

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Outcome {
        let builder = self.build(&request)?;

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                let kind = classify(&err);
                let failure = TransportError::new(kind, err.to_string());
                // A builder error means nothing left the process.
                return Err(if kind == TransportErrorKind::Build {
                    failure
                } else {
                    failure.with_request(request)
                });
            }
        };

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                return Err(TransportError::new(TransportErrorKind::Body, err.to_string()).with_request(request));
            }
        };

        let response = HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body: decode_body(&bytes),
        };

        if self.status_as_error && !status.is_success() {
            return Err(TransportError::new(
                TransportErrorKind::Status,
                format!("request failed with status code {}", status.as_u16()),
            )
            .with_request(request)
            .with_response(response));
        }
        Ok(response)
    }
}

fn to_form(form: &FormBody) -> Result<Form, TransportError> {
    let mut out = Form::new();
    for part in &form.parts {
        let mut encoded = Part::bytes(part.data.clone());
        if let Some(file_name) = &part.file_name {
            encoded = encoded.file_name(file_name.clone());
        }
        if let Some(content_type) = &part.content_type {
            encoded = encoded.mime_str(content_type).map_err(|e| {
                TransportError::new(
                    TransportErrorKind::Build,
                    format!("invalid content type {content_type:?} for part {}: {e}", part.name),
                )
            })?;
        }
        out = out.part(part.name.clone(), encoded);
    }
    Ok(out)
}

fn classify(err: &reqwest::Error) -> TransportErrorKind {
    if err.is_builder() {
        TransportErrorKind::Build
    } else if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() {
        TransportErrorKind::Connect
    } else if err.is_body() || err.is_decode() {
        TransportErrorKind::Body
    } else {
        TransportErrorKind::Other
    }
}
