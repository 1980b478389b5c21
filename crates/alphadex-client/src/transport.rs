#![forbid(unsafe_code)]

//! Fetch transports.
//!
//! [`QueryClient`] is the seam between the view model and wherever names come
//! from. Implementations block; the view model runs them as background tasks.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use alphadex_core::{NameStore, Prefix, RESULT_CAP, ResultPage, filter};
use tracing::debug;

use crate::config::ClientConfig;

/// Why a fetch produced no page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection refused, reset, DNS failure and similar.
    Transport(String),
    /// No response within the configured timeout.
    Timeout,
    /// The gateway answered with a non-success status.
    Status(u16),
    /// The body was not a JSON array of names.
    Malformed(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(reason) => write!(f, "transport error: {reason}"),
            Self::Timeout => write!(f, "request timed out"),
            Self::Status(code) => write!(f, "unexpected status {code}"),
            Self::Malformed(reason) => write!(f, "malformed response: {reason}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Something that can answer "names starting with this prefix".
pub trait QueryClient: Send + Sync {
    fn fetch(&self, prefix: &Prefix) -> Result<ResultPage, FetchError>;
}

impl<T: QueryClient + ?Sized> QueryClient for Arc<T> {
    fn fetch(&self, prefix: &Prefix) -> Result<ResultPage, FetchError> {
        (**self).fetch(prefix)
    }
}

/// Blocking HTTP client for the `/users` endpoint.
#[derive(Debug, Clone)]
pub struct HttpQueryClient {
    http: reqwest::blocking::Client,
    users_url: String,
}

impl HttpQueryClient {
    /// Build a client from `config`.
    ///
    /// Do not construct or drop this inside an async runtime; the blocking
    /// client owns its own.
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout.min(Duration::from_secs(2)))
            .build()?;
        Ok(Self {
            http,
            users_url: format!("{}/users", config.base_url.trim_end_matches('/')),
        })
    }

    #[must_use]
    pub fn users_url(&self) -> &str {
        &self.users_url
    }
}

impl QueryClient for HttpQueryClient {
    fn fetch(&self, prefix: &Prefix) -> Result<ResultPage, FetchError> {
        let response = self
            .http
            .get(&self.users_url)
            .query(&[("startChar", prefix.as_str())])
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response.text()?;
        let page: ResultPage =
            serde_json::from_str(&body).map_err(|e| FetchError::Malformed(e.to_string()))?;
        debug!(prefix = %prefix, count = page.len(), "fetched page");
        Ok(page)
    }
}

/// Filters a local store directly, with the same cap as the gateway.
#[derive(Debug, Clone)]
pub struct InProcessClient {
    store: Arc<NameStore>,
}

impl InProcessClient {
    #[must_use]
    pub fn new(store: Arc<NameStore>) -> Self {
        Self { store }
    }
}

impl QueryClient for InProcessClient {
    fn fetch(&self, prefix: &Prefix) -> Result<ResultPage, FetchError> {
        Ok(filter(&self.store.snapshot(), prefix, RESULT_CAP))
    }
}
