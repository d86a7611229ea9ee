//! Request and response hooks.
//!
//! The session runs every outbound `HttpRequest` through an ordered list of
//! request hooks and every `Outcome` through an ordered list of response
//! hooks. The standard chain is:
//!
//! - request: [`BearerAuth`], then [`RequestReporter`]
//! - response: [`OutcomeReporter`], then [`ErrorAsResponse`]
//!
//! Each hook has one job. Hooks that need shared state hold a handle to it
//! (the token store, the report sink) rather than capturing the session.

use std::sync::Arc;

use tracing::debug;

use crate::error::TransportError;
use crate::http::{HttpRequest, AUTHORIZATION};
use crate::report::Report;
use crate::token_store::TokenStore;
use crate::transport::Outcome;

pub trait RequestHook: Send + Sync {
    fn on_request(&self, request: HttpRequest) -> HttpRequest;
}

pub trait ResponseHook: Send + Sync {
    fn on_outcome(&self, outcome: Outcome) -> Outcome;
}

/// Sets `Authorization: Bearer <token>` from the token store at dispatch
/// time, or an empty Authorization value when no token is stored. Never
/// holds a request back; the server decides what is authorized.
#[derive(Debug, Clone)]
pub struct BearerAuth {
    tokens: TokenStore,
}

impl BearerAuth {
    pub fn new(tokens: TokenStore) -> Self {
        Self { tokens }
    }
}

impl RequestHook for BearerAuth {
    fn on_request(&self, mut request: HttpRequest) -> HttpRequest {
        let value = self
            .tokens
            .get()
            .map(|token| format!("Bearer {token}"))
            .unwrap_or_default();
        request.set_header(AUTHORIZATION, value);
        request
    }
}

/// Forwards every outbound request to the report sink.
#[derive(Debug, Clone)]
pub struct RequestReporter {
    report: Report,
}

impl RequestReporter {
    pub fn new(report: Report) -> Self {
        Self { report }
    }
}

impl RequestHook for RequestReporter {
    fn on_request(&self, request: HttpRequest) -> HttpRequest {
        self.report.sink.log_request(&self.report.context, &request);
        request
    }
}

/// Forwards every outcome, success or failure, to the report sink.
#[derive(Debug, Clone)]
pub struct OutcomeReporter {
    report: Report,
}

impl OutcomeReporter {
    pub fn new(report: Report) -> Self {
        Self { report }
    }
}

impl ResponseHook for OutcomeReporter {
    fn on_outcome(&self, outcome: Outcome) -> Outcome {
        match &outcome {
            Ok(response) => self.report.sink.log_response(&self.report.context, response),
            Err(error) => self.report.sink.log_error(&self.report.context, error),
        }
        outcome
    }
}

/// Resolves an error that carries a response into that response. Errors
/// without one pass through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorAsResponse;

impl ResponseHook for ErrorAsResponse {
    fn on_outcome(&self, outcome: Outcome) -> Outcome {
        match outcome {
            Err(TransportError {
                response: Some(response),
                kind,
                ..
            }) => {
                debug!(status = response.status, %kind, "error carried a response");
                Ok(response)
            }
            other => other,
        }
    }
}

/// Ordered hook lists, composed once per session.
#[derive(Clone, Default)]
pub struct Pipeline {
    request_hooks: Vec<Arc<dyn RequestHook>>,
    response_hooks: Vec<Arc<dyn ResponseHook>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard chain, with `extra_request` hooks placed before the
    /// reporter (so the report shows the final descriptor) and
    /// `extra_response` hooks placed after normalization.
    pub fn standard(
        tokens: TokenStore,
        report: Report,
        extra_request: Vec<Arc<dyn RequestHook>>,
        extra_response: Vec<Arc<dyn ResponseHook>>,
    ) -> Self {
        let mut pipeline = Self::new().request_hook(Arc::new(BearerAuth::new(tokens)));
        for hook in extra_request {
            pipeline = pipeline.request_hook(hook);
        }
        pipeline = pipeline
            .request_hook(Arc::new(RequestReporter::new(report.clone())))
            .response_hook(Arc::new(OutcomeReporter::new(report)))
            .response_hook(Arc::new(ErrorAsResponse));
        for hook in extra_response {
            pipeline = pipeline.response_hook(hook);
        }
        pipeline
    }

    pub fn request_hook(mut self, hook: Arc<dyn RequestHook>) -> Self {
        self.request_hooks.push(hook);
        self
    }

    pub fn response_hook(mut self, hook: Arc<dyn ResponseHook>) -> Self {
        self.response_hooks.push(hook);
        self
    }

    pub fn run_request(&self, request: HttpRequest) -> HttpRequest {
        self.request_hooks
            .iter()
            .fold(request, |request, hook| hook.on_request(request))
    }

    pub fn run_outcome(&self, outcome: Outcome) -> Outcome {
        self.response_hooks
            .iter()
            .fold(outcome, |outcome, hook| hook.on_outcome(outcome))
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("request_hooks", &self.request_hooks.len())
            .field("response_hooks", &self.response_hooks.len())
            .finish()
    }
}
