//! Error types for the swipe API session.
//!
//! # Design
//! Server-originated failures (any response with a status code) are not
//! errors here: they come back as `HttpResponse` values. `ApiError` only
//! covers the two other outcomes of a call: a transport failure where no
//! response reached us, and a local fault where the request was never sent.

use std::fmt;

use thiserror::Error;

use crate::http::{HttpRequest, HttpResponse};

/// Errors returned by the session and the resource clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was dispatched but no response came back.
    #[error("transport failure: {0}")]
    Transport(TransportError),

    /// The request was never sent.
    #[error("request not sent: {0}")]
    Local(String),

    /// A multi-step flow got a status it cannot continue from.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: serde_json::Value },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err.kind {
            TransportErrorKind::Build => ApiError::Local(err.message),
            _ => ApiError::Transport(err),
        }
    }
}

/// What went wrong below the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection refused, DNS failure, reset.
    Connect,
    Timeout,
    /// The server answered with a status the transport treats as an error.
    Status,
    /// The response body could not be read.
    Body,
    /// The request could not be built, so it never left the process.
    Build,
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Status => "status",
            TransportErrorKind::Body => "body",
            TransportErrorKind::Build => "build",
            TransportErrorKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// A failed transport call.
///
/// `response` is set when the server did answer and the transport still
/// raised; the session folds those back into a normal response. `request`
/// is the descriptor that was dispatched, kept for diagnostics.
#[derive(Debug, Clone, Error)]
#[error("{kind} error: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
    pub request: Option<HttpRequest>,
    pub response: Option<HttpResponse>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            request: None,
            response: None,
        }
    }

    pub fn with_request(mut self, request: HttpRequest) -> Self {
        self.request = Some(request);
        self
    }

    pub fn with_response(mut self, response: HttpResponse) -> Self {
        self.response = Some(response);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_failures_are_local_faults() {
        let err: ApiError = TransportError::new(TransportErrorKind::Build, "bad mime").into();
        assert!(matches!(err, ApiError::Local(ref msg) if msg == "bad mime"));
    }

    #[test]
    fn connect_failures_stay_transport_errors() {
        let err: ApiError = TransportError::new(TransportErrorKind::Connect, "refused").into();
        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(err.to_string(), "transport failure: connect error: refused");
    }
}
