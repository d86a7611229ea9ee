//! The HTTP session every API call goes through.
//!
//! # Design
//! A `Session` owns a base URL, a token store, a report and a transport,
//! plus the hook pipeline composed from them at construction. Building a
//! session does no I/O. `send` is the whole pipeline: request hooks, the
//! transport call, response hooks. Responses with any status code come back
//! as `Ok(HttpResponse)`; only a call that got no response at all, or was
//! never sent, is an `Err`.
//!
//! The session is a cheap `Clone` handle. Clones share the token store, so
//! a login through one resource client is seen by all the others.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::error::ApiError;
use crate::http::{FormBody, HttpMethod, HttpRequest, HttpResponse, RequestBody, CONTENT_TYPE};
use crate::pipeline::{Pipeline, RequestHook, ResponseHook};
use crate::report::Report;
use crate::token_store::TokenStore;
use crate::transport::{ReqwestTransport, Transport};

#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

struct Inner {
    config: SessionConfig,
    tokens: TokenStore,
    report: Report,
    transport: Arc<dyn Transport>,
    pipeline: Pipeline,
}

impl Session {
    /// Session with the reqwest transport and the standard hook chain.
    pub fn new(config: SessionConfig, tokens: TokenStore, report: Report) -> Result<Self, ApiError> {
        Self::builder(config).tokens(tokens).report(report).build()
    }

    pub fn builder(config: SessionConfig) -> SessionBuilder {
        SessionBuilder {
            config,
            tokens: None,
            report: None,
            transport: None,
            request_hooks: Vec::new(),
            response_hooks: Vec::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    pub fn report(&self) -> &Report {
        &self.inner.report
    }

    /// Builds the descriptor for `path` without running any hooks.
    pub fn descriptor(&self, method: HttpMethod, path: &str, body: RequestBody) -> HttpRequest {
        let mut request = HttpRequest::new(method, self.inner.config.url_for(path));
        // Multipart content types carry a boundary only the transport knows.
        if matches!(body, RequestBody::Json(_)) {
            request.set_header(CONTENT_TYPE, "application/json");
        }
        if let Some(timeout) = self.inner.config.timeout() {
            request.timeout = Some(timeout);
        }
        request.with_body(body)
    }

    /// Runs `request` through the pipeline.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let request = self.inner.pipeline.run_request(request);
        let (method, url) = (request.method, request.url.clone());
        let started = Instant::now();

        let outcome = self.inner.transport.execute(request).await;
        let outcome = self.inner.pipeline.run_outcome(outcome);

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match outcome {
            Ok(response) => {
                debug!(%method, %url, status = response.status, elapsed_ms, "request completed");
                Ok(response)
            }
            Err(err) => {
                warn!(%method, %url, kind = %err.kind, elapsed_ms, error = %err.message, "request failed");
                Err(err.into())
            }
        }
    }

    pub async fn request(&self, method: HttpMethod, path: &str, body: RequestBody) -> Result<HttpResponse, ApiError> {
        self.send(self.descriptor(method, path, body)).await
    }

    /// `GET path`, or `GET path/id` when an id is given.
    pub async fn get(&self, path: &str, id: Option<u64>) -> Result<HttpResponse, ApiError> {
        let path = match id {
            Some(id) => scoped(path, id),
            None => path.to_string(),
        };
        self.request(HttpMethod::Get, &path, RequestBody::Empty).await
    }

    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<HttpResponse, ApiError> {
        let body = json_body(body)?;
        self.request(HttpMethod::Post, path, body).await
    }

    /// `PUT path/id`, with a JSON body when one is given.
    pub async fn put<T: Serialize + ?Sized>(
        &self,
        path: &str,
        id: u64,
        body: Option<&T>,
    ) -> Result<HttpResponse, ApiError> {
        let body = match body {
            Some(body) => json_body(body)?,
            None => RequestBody::Empty,
        };
        self.request(HttpMethod::Put, &scoped(path, id), body).await
    }

    /// `DELETE path/id`.
    pub async fn delete(&self, path: &str, id: u64) -> Result<HttpResponse, ApiError> {
        self.request(HttpMethod::Delete, &scoped(path, id), RequestBody::Empty)
            .await
    }

    /// Sends `form` as multipart; the body is never JSON-encoded.
    pub async fn form_request(&self, method: HttpMethod, path: &str, form: FormBody) -> Result<HttpResponse, ApiError> {
        self.request(method, path, RequestBody::Multipart(form)).await
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.inner.config)
            .field("report", &self.inner.report)
            .field("pipeline", &self.inner.pipeline)
            .finish_non_exhaustive()
    }
}

/// Composes a `Session`. Anything not set falls back to a fresh token
/// store, a tracing report and the reqwest transport.
pub struct SessionBuilder {
    config: SessionConfig,
    tokens: Option<TokenStore>,
    report: Option<Report>,
    transport: Option<Arc<dyn Transport>>,
    request_hooks: Vec<Arc<dyn RequestHook>>,
    response_hooks: Vec<Arc<dyn ResponseHook>>,
}

impl SessionBuilder {
    pub fn tokens(mut self, tokens: TokenStore) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn report(mut self, report: Report) -> Self {
        self.report = Some(report);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Adds a request hook. It runs after auth injection and before the
    /// request is reported.
    pub fn request_hook(mut self, hook: Arc<dyn RequestHook>) -> Self {
        self.request_hooks.push(hook);
        self
    }

    /// Adds a response hook. It runs after errors carrying a response have
    /// been resolved.
    pub fn response_hook(mut self, hook: Arc<dyn ResponseHook>) -> Self {
        self.response_hooks.push(hook);
        self
    }

    pub fn build(self) -> Result<Session, ApiError> {
        let tokens = self.tokens.unwrap_or_default();
        let report = self.report.unwrap_or_default();
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::with_timeout(self.config.timeout())?),
        };
        let pipeline = Pipeline::standard(tokens.clone(), report.clone(), self.request_hooks, self.response_hooks);

        Ok(Session {
            inner: Arc::new(Inner {
                config: self.config,
                tokens,
                report,
                transport,
                pipeline,
            }),
        })
    }
}

fn scoped(path: &str, id: u64) -> String {
    format!("{}/{id}", path.trim_end_matches('/'))
}

fn json_body<T: Serialize + ?Sized>(body: &T) -> Result<RequestBody, ApiError> {
    serde_json::to_value(body)
        .map(RequestBody::Json)
        .map_err(ApiError::Serialization)
}
