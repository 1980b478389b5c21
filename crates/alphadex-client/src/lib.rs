#![forbid(unsafe_code)]

//! alphadex client
//!
//! The client side of name browsing: a [`FilterViewModel`] that reconciles
//! the alphabet selector and the free-text input into one effective prefix,
//! fetches through a [`QueryClient`], and drives a virtualized result list.
//!
//! # Role in alphadex
//! The view model is an [`alphadex_runtime::Model`]; run it under
//! [`alphadex_runtime::Program`] for real use or
//! [`alphadex_runtime::ProgramSimulator`] in tests. Transports are pluggable:
//! [`HttpQueryClient`] talks to `alphadex-server`, [`InProcessClient`] filters
//! a local [`alphadex_core::NameStore`] directly.
//!
//! The `alphadex` binary runs the model in a terminal through
//! [`TerminalSession`].

pub mod config;
pub mod terminal;
pub mod transport;
pub mod view_model;

pub use config::{ClientConfig, ConfigError};
pub use transport::{FetchError, HttpQueryClient, InProcessClient, QueryClient};
pub use terminal::{Input, TerminalSession, map_event};
pub use view_model::{ALPHABET_ROW, FilterMsg, FilterViewModel, HEADER_ROWS, Phase, ViewState};
