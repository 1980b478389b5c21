#![forbid(unsafe_code)]

//! alphadex runtime
//!
//! Elm-style plumbing for the alphadex client.
//!
//! # Key Components
//!
//! - [`Model`] - Trait for application state and behavior
//! - [`Cmd`] - Commands for side effects
//! - [`Program`] - Threaded executor: runs `update` on the caller's thread,
//!   background tasks on spawned threads
//! - [`ProgramSimulator`] - Deterministic executor for tests
//! - [`Frame`] - Line-oriented text surface that `Model::view` draws into

pub mod frame;
pub mod program;
pub mod simulator;

pub use frame::Frame;
pub use program::{Cmd, Model, Program, TaskSpec};
pub use simulator::{CmdRecord, ProgramSimulator};
