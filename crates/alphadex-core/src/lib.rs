#![forbid(unsafe_code)]

//! alphadex core
//!
//! The pieces of alphadex that have no I/O surface of their own: the
//! canonical [`Name`] type, the [`NameStore`] that owns the loaded
//! collection, and the pure [`filter`] function that turns a collection and a
//! [`Prefix`] into a bounded [`ResultPage`].
//!
//! # Role in alphadex
//! `alphadex-server` wraps these types in an HTTP gateway and
//! `alphadex-client` deserializes [`ResultPage`] values on the other side.
//! Nothing in this crate knows about either.

pub mod filter;
pub mod name;
pub mod store;

pub use filter::{RESULT_CAP, ResultPage, filter};
pub use name::{Name, Prefix, PrefixError};
pub use store::{NameCollection, NameStore, StoreError, normalize_lines};
