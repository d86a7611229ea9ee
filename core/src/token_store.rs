//! Session-scoped storage for the current bearer token.
//!
//! One slot, keyed by [`TOKEN_KEY`]. Clones share the slot, so the session
//! and the resource clients all see the same value. Every read and write
//! goes through one lock, which keeps a login from exposing a half-updated
//! token to a concurrent request.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

/// Name of the single slot.
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    slot: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `token`, replacing any previous value.
    pub fn set(&self, token: impl Into<String>) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(token.into());
        debug!(key = TOKEN_KEY, "token stored");
    }

    pub fn get(&self) -> Option<String> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clears the slot and returns what was in it.
    pub fn remove(&self) -> Option<String> {
        let previous = self
            .slot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if previous.is_some() {
            debug!(key = TOKEN_KEY, "token removed");
        }
        previous
    }

    pub fn is_empty(&self) -> bool {
        self.slot.read().unwrap_or_else(PoisonError::into_inner).is_none()
    }
}
