#![forbid(unsafe_code)]

//! Prefix filtering with a fixed result cap.
//!
//! [`filter`] is a pure function of its inputs: the same collection, prefix
//! and cap always produce the same [`ResultPage`]. Nothing is cached.

use serde::{Deserialize, Serialize};

use crate::name::{Name, Prefix};
use crate::store::NameCollection;

/// Maximum number of names returned for one query.
pub const RESULT_CAP: usize = 100;

/// The leading matches of a query, in collection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultPage {
    names: Vec<Name>,
}

impl ResultPage {
    /// A page with no names.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap names that are already in result order.
    #[must_use]
    pub fn from_names(names: Vec<Name>) -> Self {
        Self { names }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&Name> {
        self.names.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Name> {
        self.names.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Name] {
        &self.names
    }
}

impl<'a> IntoIterator for &'a ResultPage {
    type Item = &'a Name;
    type IntoIter = std::slice::Iter<'a, Name>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

/// Return the first `cap` names of `collection` that begin with `prefix`.
///
/// Collection order is preserved. Collecting stops once `cap` matches are
/// found; fewer matches than `cap` returns all of them.
#[must_use]
pub fn filter(collection: &NameCollection, prefix: &Prefix, cap: usize) -> ResultPage {
    let names = collection
        .iter()
        .filter(|name| prefix.matches(name))
        .take(cap)
        .cloned()
        .collect();
    ResultPage { names }
}
