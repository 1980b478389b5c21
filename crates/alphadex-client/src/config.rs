#![forbid(unsafe_code)]

//! Client configuration from environment variables.
//!
//! - `ALPHADEX_API_BASE_URL` - gateway root, default `http://localhost:5000`
//! - `ALPHADEX_FETCH_TIMEOUT_MS` - per-request timeout, default `5000`
//! - `ALPHADEX_CLIENT_LOG_FILE` - where the interactive client writes its
//!   tracing output; unset means no logging, since stderr shares the screen

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use alphadex_widgets::{DEFAULT_OVERSCAN, DEFAULT_ROW_HEIGHT, DEFAULT_VIEWPORT_HEIGHT};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { var, value, reason } => {
                write!(f, "invalid {var}={value:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Gateway root, without a trailing slash.
    pub base_url: String,
    /// Request timeout; expiry counts as a failed fetch.
    pub timeout: Duration,
    /// List viewport height in units.
    pub viewport_height: u32,
    /// List row height in units.
    pub row_height: u32,
    /// Rows rendered beyond each viewport edge.
    pub overscan: usize,
    /// Tracing output file for the interactive client.
    pub log_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            row_height: DEFAULT_ROW_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
            log_file: None,
        }
    }
}

impl ClientConfig {
    /// Point the config at another gateway.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup("ALPHADEX_API_BASE_URL").filter(|v| !v.trim().is_empty()) {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    var: "ALPHADEX_API_BASE_URL",
                    value: url,
                    reason: "expected an http:// or https:// URL".into(),
                });
            }
            config = config.with_base_url(url);
        }
        if let Some(raw) = lookup("ALPHADEX_FETCH_TIMEOUT_MS") {
            let ms = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    var: "ALPHADEX_FETCH_TIMEOUT_MS",
                    value: raw.clone(),
                    reason: "expected a positive integer".into(),
                })?;
            config.timeout = Duration::from_millis(ms);
        }
        config.log_file = lookup("ALPHADEX_CLIENT_LOG_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        Ok(config)
    }
}
