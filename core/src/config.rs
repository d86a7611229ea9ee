//! Session configuration.

use std::time::Duration;

use url::Url;

use crate::error::ApiError;

/// Environment variable holding the backend base URL.
pub const BASE_URL_ENV: &str = "BASE_URL";

/// Optional default request timeout, in whole seconds.
pub const TIMEOUT_ENV: &str = "REQUEST_TIMEOUT_SECS";

/// Where the session sends requests. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    base_url: String,
    timeout: Option<Duration>,
}

impl SessionConfig {
    /// Validates `base_url` as an absolute URL. A trailing slash is dropped.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url)?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::Config(format!("{base_url} cannot be a base url")));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reads `BASE_URL` and `REQUEST_TIMEOUT_SECS` from the process environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let base_url = lookup(BASE_URL_ENV)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ApiError::Config(format!("{BASE_URL_ENV} is not set")))?;
        let mut config = Self::new(base_url.trim())?;

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ApiError::Config(format!("{TIMEOUT_ENV} must be whole seconds, got {raw:?}")))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Joins an endpoint path onto the base URL.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = SessionConfig::new("http://localhost:3000/").unwrap();
        assert_eq!(config.base_url(), "http://localhost:3000");
        assert_eq!(config.url_for("/account"), "http://localhost:3000/account");
        assert_eq!(config.url_for("account"), "http://localhost:3000/account");
    }

    #[test]
    fn base_path_is_kept() {
        let config = SessionConfig::new("https://api.example.com/v1").unwrap();
        assert_eq!(config.url_for("/auth/phone"), "https://api.example.com/v1/auth/phone");
    }

    #[test]
    fn relative_url_is_rejected() {
        let err = SessionConfig::new("/just/a/path").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn from_lookup_reads_base_url_and_timeout() {
        let config = SessionConfig::from_lookup(lookup(&[
            (BASE_URL_ENV, "http://127.0.0.1:8080"),
            (TIMEOUT_ENV, "5"),
        ]))
        .unwrap();
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn missing_base_url_is_a_config_error() {
        let err = SessionConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn bad_timeout_is_a_config_error() {
        let err = SessionConfig::from_lookup(lookup(&[
            (BASE_URL_ENV, "http://127.0.0.1:8080"),
            (TIMEOUT_ENV, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }
}
