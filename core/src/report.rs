//! Report sinks: where the session records what it sent and what came back.
//!
//! # Design
//! The session calls a sink three ways: once per outbound request, once per
//! response and once per transport error. Sinks are fire-and-forget; they
//! return nothing and cannot change the outcome of a call. Each call carries
//! the `ReportContext` of the test execution that issued it.
//!
//! `TracingSink` turns the calls into `tracing` events with the bearer token
//! redacted. `MemorySink` keeps titled entries around so a test can inspect
//! exactly what went over the wire.

use std::sync::{Arc, Mutex, PoisonError};

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, AUTHORIZATION};

/// Names the test execution a request belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    name: String,
}

impl ReportContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

const DEFAULT_CONTEXT: &str = "default";

impl Default for ReportContext {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT)
    }
}

pub trait ReportSink: Send + Sync {
    fn log_request(&self, context: &ReportContext, request: &HttpRequest);

    fn log_response(&self, context: &ReportContext, response: &HttpResponse);

    /// Sinks must tell apart an error carrying a response, an error carrying
    /// only the request, and a bare message.
    fn log_error(&self, context: &ReportContext, error: &TransportError);
}

/// A sink bound to the context it reports under.
#[derive(Clone)]
pub struct Report {
    pub context: ReportContext,
    pub sink: Arc<dyn ReportSink>,
}

impl Report {
    pub fn new(context: ReportContext, sink: Arc<dyn ReportSink>) -> Self {
        Self { context, sink }
    }

    /// Reports through `tracing` under the given context name.
    pub fn tracing(name: impl Into<String>) -> Self {
        Self::new(ReportContext::new(name), Arc::new(TracingSink))
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::tracing(DEFAULT_CONTEXT)
    }
}

impl std::fmt::Debug for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Report")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// Emits one `tracing` event per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn log_request(&self, context: &ReportContext, request: &HttpRequest) {
        debug!(
            context = context.name(),
            method = %request.method,
            url = %request.url,
            headers = %headers_json(&request.headers, true),
            body = %request.body.summary(),
            "request"
        );
    }

    /// Non-2xx statuses only reach here when the transport does not raise
    /// them; they are logged at warn like error responses.
    fn log_response(&self, context: &ReportContext, response: &HttpResponse) {
        if response.is_success() {
            info!(
                context = context.name(),
                status = response.status,
                status_text = %response.status_text,
                body = %response.body,
                "response"
            );
        } else {
            warn!(
                context = context.name(),
                status = response.status,
                status_text = %response.status_text,
                body = %response.body,
                "unsuccessful response"
            );
        }
    }

    fn log_error(&self, context: &ReportContext, error: &TransportError) {
        match (&error.response, &error.request) {
            (Some(response), _) => warn!(
                context = context.name(),
                status = response.status,
                status_text = %response.status_text,
                body = %response.body,
                "error response"
            ),
            (None, Some(request)) => warn!(
                context = context.name(),
                kind = %error.kind,
                method = %request.method,
                url = %request.url,
                message = %error.message,
                "no response"
            ),
            (None, None) => warn!(context = context.name(), kind = %error.kind, message = %error.message, "error"),
        }
    }
}

/// One titled report record.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub context: String,
    pub title: String,
    pub value: Value,
}

/// Collects report entries in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<ReportEntry>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<ReportEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn entries_for(&self, context: &str) -> Vec<ReportEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.context == context)
            .collect()
    }

    /// Values recorded under `title`, oldest first.
    pub fn values(&self, title: &str) -> Vec<Value> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.title == title)
            .map(|entry| entry.value)
            .collect()
    }

    fn push(&self, context: &ReportContext, title: &str, value: Value) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ReportEntry {
                context: context.name().to_string(),
                title: title.to_string(),
                value,
            });
    }
}

impl ReportSink for MemorySink {
    fn log_request(&self, context: &ReportContext, request: &HttpRequest) {
        self.push(context, "URL", json!(format!("{} {}", request.method, request.url)));
        self.push(context, "Request Headers", headers_json(&request.headers, false));
        self.push(context, "Request", json!({ "body": request.body.summary() }));
    }

    fn log_response(&self, context: &ReportContext, response: &HttpResponse) {
        self.push(context, "Response", response_json(response));
    }

    fn log_error(&self, context: &ReportContext, error: &TransportError) {
        if let Some(response) = &error.response {
            self.push(context, "Error Response", response_json(response));
        } else if let Some(request) = &error.request {
            self.push(
                context,
                "Error",
                json!({
                    "method": request.method.as_str(),
                    "url": request.url,
                    "headers": headers_json(&request.headers, false),
                    "body": request.body.summary(),
                }),
            );
        } else {
            self.push(context, "Error", json!(error.message));
        }
    }
}

fn response_json(response: &HttpResponse) -> Value {
    json!({
        "status": response.status,
        "statusText": response.status_text,
        "body": response.body,
    })
}

fn headers_json(headers: &[(String, String)], redact: bool) -> Value {
    let map = headers
        .iter()
        .map(|(name, value)| {
            let value = if redact && name.eq_ignore_ascii_case(AUTHORIZATION) {
                redact_bearer(value)
            } else {
                value.clone()
            };
            (name.clone(), Value::String(value))
        })
        .collect();
    Value::Object(map)
}

/// Hides the credential part of an Authorization value.
pub fn redact_bearer(value: &str) -> String {
    match value.split_once(' ') {
        Some((scheme, _)) => format!("{scheme} <redacted>"),
        None if value.is_empty() => String::new(),
        None => "<redacted>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportErrorKind;
    use crate::http::{HttpMethod, RequestBody};

    fn request() -> HttpRequest {
        let mut req = HttpRequest::new(HttpMethod::Post, "http://localhost:3000/auth/phone")
            .with_body(RequestBody::Json(json!({"phone": "380968607970"})));
        req.set_header(AUTHORIZATION, "Bearer abc");
        req
    }

    #[test]
    fn request_is_recorded_with_url_headers_and_body() {
        let sink = MemorySink::new();
        let ctx = ReportContext::new("sends phone");
        sink.log_request(&ctx, &request());

        let titles: Vec<_> = sink.entries().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, ["URL", "Request Headers", "Request"]);
        assert_eq!(sink.values("URL")[0], "POST http://localhost:3000/auth/phone");
        assert_eq!(sink.values("Request Headers")[0][AUTHORIZATION], "Bearer abc");
        assert_eq!(sink.values("Request")[0]["body"]["phone"], "380968607970");
    }

    #[test]
    fn error_with_response_logs_status_and_body() {
        let sink = MemorySink::new();
        let err = TransportError::new(TransportErrorKind::Status, "400 Bad Request")
            .with_request(request())
            .with_response(HttpResponse::new(400, json!({"statusCode": 400})));
        sink.log_error(&ReportContext::default(), &err);

        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Error Response");
        assert_eq!(entries[0].value["status"], 400);
    }

    #[test]
    fn error_with_request_only_logs_raw_request() {
        let sink = MemorySink::new();
        let err = TransportError::new(TransportErrorKind::Connect, "refused").with_request(request());
        sink.log_error(&ReportContext::default(), &err);

        let value = &sink.values("Error")[0];
        assert_eq!(value["method"], "POST");
        assert_eq!(value["url"], "http://localhost:3000/auth/phone");
    }

    #[test]
    fn bare_error_logs_message() {
        let sink = MemorySink::new();
        let err = TransportError::new(TransportErrorKind::Build, "invalid mime type");
        sink.log_error(&ReportContext::default(), &err);
        assert_eq!(sink.values("Error"), vec![json!("invalid mime type")]);
    }

    #[test]
    fn entries_are_grouped_by_context() {
        let sink = MemorySink::new();
        sink.log_request(&ReportContext::new("a"), &request());
        sink.log_response(&ReportContext::new("b"), &HttpResponse::new(201, Value::Null));
        assert_eq!(sink.entries_for("a").len(), 3);
        assert_eq!(sink.entries_for("b").len(), 1);
    }

    #[test]
    fn tracing_report_uses_given_context() {
        assert_eq!(Report::tracing("upload flow").context.name(), "upload flow");
        assert_eq!(Report::default().context, ReportContext::default());
    }

    #[test]
    fn tracing_sink_accepts_every_outcome() {
        let report = Report::tracing("tracing sink");
        report.sink.log_request(&report.context, &request());
        report.sink.log_response(&report.context, &HttpResponse::new(200, json!(true)));
        report.sink.log_response(&report.context, &HttpResponse::new(401, json!({"statusCode": 401})));
        report.sink.log_error(
            &report.context,
            &TransportError::new(TransportErrorKind::Connect, "refused").with_request(request()),
        );
    }

    #[test]
    fn redact_bearer_keeps_scheme_only() {
        assert_eq!(redact_bearer("Bearer eyJhbGciOi"), "Bearer <redacted>");
        assert_eq!(redact_bearer(""), "");
        assert_eq!(redact_bearer("opaque"), "<redacted>");
    }
}
