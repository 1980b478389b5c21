#![forbid(unsafe_code)]

//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `ALPHADEX_BIND_ADDR` | `127.0.0.1:5000` |
//! | `ALPHADEX_NAMES_FILE` | `usernames.txt` |
//! | `ALPHADEX_LOG_FORMAT` | `text` (`json` for structured output) |
//!
//! Log levels come from `RUST_LOG` (see [`crate::logging`]).

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_NAMES_FILE: &str = "usernames.txt";

/// Configuration value that could not be parsed.
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

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" | "" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub names_file: PathBuf,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            names_file: PathBuf::from(DEFAULT_NAMES_FILE),
            log_format: LogFormat::Text,
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup("ALPHADEX_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "ALPHADEX_BIND_ADDR",
                value: bind_raw.clone(),
                reason: e.to_string(),
            })?;

        let names_file = lookup("ALPHADEX_NAMES_FILE")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_NAMES_FILE), PathBuf::from);

        let log_format = match lookup("ALPHADEX_LOG_FORMAT") {
            None => LogFormat::default(),
            Some(raw) => LogFormat::parse(&raw).ok_or_else(|| ConfigError::Invalid {
                var: "ALPHADEX_LOG_FORMAT",
                value: raw.clone(),
                reason: "expected `text` or `json`".into(),
            })?,
        };

        Ok(Self {
            bind_addr,
            names_file,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("ALPHADEX_BIND_ADDR", "0.0.0.0:8080"),
            ("ALPHADEX_NAMES_FILE", "/data/names.txt"),
            ("ALPHADEX_LOG_FORMAT", "JSON"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.names_file, PathBuf::from("/data/names.txt"));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_bad_bind_addr() {
        let err = ServerConfig::from_lookup(lookup(&[("ALPHADEX_BIND_ADDR", "nope")])).unwrap_err();
        assert!(err.to_string().contains("ALPHADEX_BIND_ADDR"));
    }

    #[test]
    fn test_bad_log_format() {
        let err =
            ServerConfig::from_lookup(lookup(&[("ALPHADEX_LOG_FORMAT", "xml")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "ALPHADEX_LOG_FORMAT",
                ..
            }
        ));
    }
}
