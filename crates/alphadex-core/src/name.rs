#![forbid(unsafe_code)]

//! Canonical names and query prefixes.
//!
//! A [`Name`] is what the store holds: upper-cased, non-empty, single line.
//! A [`Prefix`] is what a query asks for: non-empty, upper-cased before any
//! comparison. Matching is ordinal (`str::starts_with` on the upper-cased
//! forms), never locale-aware.

use std::fmt;
use std::sync::Arc;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// A canonical, upper-cased name.
///
/// Cloning is cheap; the text is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(Arc<str>);

impl Name {
    /// Normalize one raw record into a name.
    ///
    /// A trailing `\r` record separator is stripped. Blank records (empty or
    /// whitespace only) and records containing a line break yield `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.trim().is_empty() || line.contains(['\n', '\r']) {
            return None;
        }
        Some(Self(Arc::from(line.to_uppercase())))
    }

    /// The canonical text.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Name::parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid name: {raw:?}")))
    }
}

/// Error returned when a prefix cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixError {
    /// The raw prefix was empty.
    Empty,
}

impl fmt::Display for PrefixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "prefix must not be empty"),
        }
    }
}

impl std::error::Error for PrefixError {}

/// A non-empty, upper-cased query prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Prefix(String);

impl Prefix {
    /// Build a prefix from raw user input.
    pub fn parse(raw: &str) -> Result<Self, PrefixError> {
        if raw.is_empty() {
            return Err(PrefixError::Empty);
        }
        Ok(Self(raw.to_uppercase()))
    }

    /// Prefix for a single alphabet selector.
    #[must_use]
    pub fn from_letter(letter: char) -> Self {
        Self(letter.to_uppercase().collect())
    }

    /// The upper-cased prefix text.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `name` begins with this prefix.
    #[inline]
    #[must_use]
    pub fn matches(&self, name: &Name) -> bool {
        name.as_str().starts_with(self.0.as_str())
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
