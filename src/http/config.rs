//! ClientConfig - transport settings read from the environment.

use std::env;
use std::time::Duration;

use crate::error::ClientError;

/// Base URL used when `CAPO_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Transport settings for [`HttpApi`](super::HttpApi).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
    /// Sent as `Authorization: Bearer <token>` when set.
    pub bearer_token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: None,
            bearer_token: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Read `CAPO_API_URL`, `CAPO_API_TIMEOUT_MS` and `CAPO_API_TOKEN`.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut config =
            Self::new(present("CAPO_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into()));

        if let Some(raw) = present("CAPO_API_TIMEOUT_MS") {
            let millis: u64 = raw.trim().parse().map_err(|_| {
                ClientError::Validation(format!(
                    "CAPO_API_TIMEOUT_MS must be an integer, got {:?}",
                    raw
                ))
            })?;
            config.timeout = Some(Duration::from_millis(millis));
        }

        config.bearer_token = present("CAPO_API_TOKEN");
        Ok(config)
    }
}
