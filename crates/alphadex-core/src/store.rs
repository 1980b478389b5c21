#![forbid(unsafe_code)]

//! Loading and owning the name collection.
//!
//! The store reads a plain text resource with one name per line and keeps the
//! normalized result as an immutable [`NameCollection`] snapshot. Readers
//! clone the snapshot `Arc` and never see a partially built collection; a
//! [`NameStore::reload`] builds a fresh collection and swaps it in whole.
//!
//! # Invariants
//!
//! - Load order is preserved. No sorting, no deduplication.
//! - A source that cannot be read degrades to an empty collection; the
//!   failure is logged and never propagated to query callers.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use crate::name::Name;

/// Error raised while reading the backing source.
#[derive(Debug)]
pub enum StoreError {
    /// The backing file is missing, unreadable, or not valid UTF-8.
    SourceUnavailable {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceUnavailable { path, source } => {
                write!(f, "name source {} unavailable: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SourceUnavailable { source, .. } => Some(source),
        }
    }
}

/// Ordered, immutable sequence of names in load order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameCollection {
    names: Vec<Name>,
}

impl NameCollection {
    /// An empty collection.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of names.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the collection holds no names.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate names in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, Name> {
        self.names.iter()
    }

    /// Names as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Name] {
        &self.names
    }
}

impl FromIterator<Name> for NameCollection {
    fn from_iter<I: IntoIterator<Item = Name>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a NameCollection {
    type Item = &'a Name;
    type IntoIter = std::slice::Iter<'a, Name>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

/// Split raw text into normalized names.
///
/// Lines are split on `\n`; each record loses its trailing `\r`, blank
/// records are dropped and the rest are upper-cased.
#[must_use]
pub fn normalize_lines(raw: &str) -> NameCollection {
    raw.split('\n').filter_map(Name::parse).collect()
}

/// Read and normalize a source file.
pub fn read_source(path: &Path) -> Result<NameCollection, StoreError> {
    let raw = std::fs::read_to_string(path).map_err(|source| StoreError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(normalize_lines(&raw))
}

/// Owner of the current [`NameCollection`] snapshot.
#[derive(Debug)]
pub struct NameStore {
    /// Backing file, if the store was loaded from one.
    source: Option<PathBuf>,
    snapshot: RwLock<Arc<NameCollection>>,
}

impl NameStore {
    /// Load the store from a text file.
    ///
    /// An unreadable source yields an empty store and a warning.
    #[must_use]
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let collection = load_or_empty(&path);
        Self {
            source: Some(path),
            snapshot: RwLock::new(Arc::new(collection)),
        }
    }

    /// Build a store from in-memory raw lines.
    ///
    /// Lines go through the same normalization as file records.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let collection = lines
            .into_iter()
            .filter_map(|line| Name::parse(line.as_ref()))
            .collect();
        Self::from_collection(collection)
    }

    /// Wrap an already built collection.
    #[must_use]
    pub fn from_collection(collection: NameCollection) -> Self {
        Self {
            source: None,
            snapshot: RwLock::new(Arc::new(collection)),
        }
    }

    /// Path of the backing file, if any.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<NameCollection> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-read the backing file and swap the snapshot.
    ///
    /// Returns the new name count. On failure the snapshot becomes empty and
    /// the error is returned after being logged. Stores without a backing
    /// file keep their collection.
    pub fn reload(&self) -> Result<usize, StoreError> {
        let Some(path) = self.source.as_deref() else {
            return Ok(self.snapshot().len());
        };
        let (collection, result) = match read_source(path) {
            Ok(collection) => {
                let len = collection.len();
                (collection, Ok(len))
            }
            Err(err) => {
                tracing::warn!(error = %err, "reload failed, serving empty collection");
                (NameCollection::empty(), Err(err))
            }
        };
        self.replace(collection);
        result
    }

    /// Swap in a new collection atomically.
    pub fn replace(&self, collection: NameCollection) {
        let len = collection.len();
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(collection);
        tracing::debug!(count = len, "name snapshot replaced");
    }
}

fn load_or_empty(path: &Path) -> NameCollection {
    match read_source(path) {
        Ok(collection) => {
            tracing::info!(path = %path.display(), count = collection.len(), "loaded names");
            collection
        }
        Err(err) => {
            tracing::warn!(error = %err, "name source unavailable, serving empty collection");
            NameCollection::empty()
        }
    }
}
