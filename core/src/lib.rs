//! Async API session core for the swipe backend.
//!
//! # Overview
//! Every call to the backend goes through a [`Session`]: it builds an
//! [`HttpRequest`], runs it through the request hooks (bearer auth from the
//! [`TokenStore`], reporting), hands it to a [`Transport`], and runs the
//! outcome through the response hooks (reporting, error-as-response).
//! Resource clients in [`clients`] map backend actions onto session calls.
//!
//! # Design
//! - Responses with any status code are values. Callers always inspect
//!   `status` and `body`; only a missing response is an `Err`.
//! - The token store is injected, never global, so independent sessions can
//!   run side by side.
//! - Reporting is a trait object the session calls without waiting on it.
//! - DTOs are defined independently from the mock-server crate; the
//!   end-to-end suite catches schema drift.

pub mod clients;
pub mod config;
pub mod error;
pub mod http;
pub mod pipeline;
pub mod report;
pub mod session;
pub mod token_store;
pub mod transport;
pub mod types;

pub use clients::{AccountClient, AuthClient, PhotoClient, ProfileClient};
pub use config::SessionConfig;
pub use error::{ApiError, TransportError, TransportErrorKind};
pub use http::{FormBody, HttpMethod, HttpRequest, HttpResponse, RequestBody};
pub use pipeline::{Pipeline, RequestHook, ResponseHook};
pub use report::{MemorySink, Report, ReportContext, ReportSink, TracingSink};
pub use session::{Session, SessionBuilder};
pub use token_store::TokenStore;
pub use transport::{Outcome, ReqwestTransport, Transport};
pub use types::{
    Account, AuthTokens, Avatar, Confirmation, ErrorBody, ErrorMessages, Gender, Photo, Profile, RefreshRequest,
    Registration,
};
