#![forbid(unsafe_code)]

//! Elm-style runtime for the alphadex client.
//!
//! The program runtime owns a [`Model`], feeds it messages, and executes the
//! [`Cmd`]s it returns. State lives in the model; side effects are described
//! by commands and performed by the runtime.
//!
//! # Example
//!
//! ```ignore
//! use alphadex_runtime::{Cmd, Frame, Model, Program};
//!
//! struct Counter {
//!     count: i32,
//! }
//!
//! enum Msg {
//!     Increment,
//!     Decrement,
//! }
//!
//! impl Model for Counter {
//!     type Message = Msg;
//!
//!     fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message> {
//!         match msg {
//!             Msg::Increment => { self.count += 1; Cmd::none() }
//!             Msg::Decrement => { self.count -= 1; Cmd::none() }
//!         }
//!     }
//!
//!     fn view(&self, frame: &mut Frame) {
//!         frame.set_row(0, &self.count.to_string());
//!     }
//! }
//! ```
//!
//! # Threading
//!
//! `update` and `view` always run on the thread that owns the [`Program`].
//! `Cmd::Task` closures run on spawned threads; their result message is sent
//! back over a channel and applied on the next [`Program::pump`] or
//! [`Program::wait_next`]. Tasks are never cancelled; a model that no longer
//! wants a result must recognize and drop it in `update`.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::{debug, debug_span, info, warn};

use crate::frame::Frame;

/// The Model trait defines application state and behavior.
pub trait Model: Sized {
    /// The message type for this model.
    type Message: Send + 'static;

    /// Initialize the model with startup commands.
    ///
    /// Called once when the program starts.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// Update the model in response to a message.
    ///
    /// This is the core state transition function. Returns commands
    /// for any side effects that should be executed.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Render the current state to a frame.
    fn view(&self, frame: &mut Frame);
}

/// Scheduling metadata for background tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSpec {
    /// Optional task name, used for the worker thread and diagnostics.
    pub name: Option<String>,
}

impl TaskSpec {
    /// Attach a task name for diagnostics.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Commands represent side effects to be executed by the runtime.
#[derive(Default)]
pub enum Cmd<M> {
    /// No operation.
    #[default]
    None,
    /// Execute multiple commands in order.
    Batch(Vec<Cmd<M>>),
    /// Send a message to the model.
    Msg(M),
    /// Write a line to the program log.
    Log(String),
    /// Execute a blocking operation off the update thread.
    ///
    /// The return value is sent back as a message to the model.
    Task(TaskSpec, Box<dyn FnOnce() -> M + Send>),
}

impl<M: std::fmt::Debug> std::fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Self::Msg(m) => f.debug_tuple("Msg").field(m).finish(),
            Self::Log(s) => f.debug_tuple("Log").field(s).finish(),
            Self::Task(spec, _) => f.debug_struct("Task").field("spec", spec).finish(),
        }
    }
}

impl<M> Cmd<M> {
    /// Create a no-op command.
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    /// Create a message command.
    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    /// Create a log command.
    #[inline]
    pub fn log(msg: impl Into<String>) -> Self {
        Self::Log(msg.into())
    }

    /// Create a batch of commands.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Batch(cmds),
        }
    }

    /// Create a named background task command.
    pub fn task_named<F>(name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce() -> M + Send + 'static,
    {
        Self::Task(TaskSpec::default().with_name(name), Box::new(f))
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Return a stable name for tracing.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Batch(_) => "Batch",
            Self::Msg(_) => "Msg",
            Self::Log(_) => "Log",
            Self::Task(..) => "Task",
        }
    }
}

/// Maximum retained log lines.
const LOG_CAPACITY: usize = 256;

/// Threaded executor for a [`Model`].
pub struct Program<M: Model> {
    model: M,
    task_sender: mpsc::Sender<M::Message>,
    task_receiver: mpsc::Receiver<M::Message>,
    logs: Vec<String>,
}

impl<M: Model> Program<M> {
    /// Create a program. Call [`init`](Self::init) before dispatching.
    pub fn new(model: M) -> Self {
        let (task_sender, task_receiver) = mpsc::channel();
        Self {
            model,
            task_sender,
            task_receiver,
            logs: Vec::new(),
        }
    }

    /// Run `Model::init` and execute its commands.
    pub fn init(&mut self) {
        let cmd = self.model.init();
        self.execute_cmd(cmd);
    }

    /// Apply one message and execute the resulting commands.
    pub fn dispatch(&mut self, msg: M::Message) {
        let cmd = {
            let _span = debug_span!("alphadex.program.update").entered();
            self.model.update(msg)
        };
        debug!(cmd_type = cmd.type_name(), "update complete");
        self.execute_cmd(cmd);
    }

    /// A sender that feeds messages into this program from other threads.
    pub fn sender(&self) -> mpsc::Sender<M::Message> {
        self.task_sender.clone()
    }

    /// Apply every message that is already waiting, without blocking.
    ///
    /// Returns the number of messages applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(msg) = self.task_receiver.try_recv() {
            self.dispatch(msg);
            applied += 1;
        }
        applied
    }

    /// Block up to `timeout` for one message and apply it.
    ///
    /// Returns `false` if nothing arrived in time.
    pub fn wait_next(&mut self, timeout: Duration) -> bool {
        match self.task_receiver.recv_timeout(timeout) {
            Ok(msg) => {
                self.dispatch(msg);
                true
            }
            Err(_) => false,
        }
    }

    /// Render the model into a fresh frame.
    pub fn render(&self, width: u16, height: u16) -> Frame {
        let mut frame = Frame::new(width, height);
        self.model.view(&mut frame);
        frame
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Lines emitted via `Cmd::Log`, oldest first.
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Msg(m) => self.dispatch(m),
            Cmd::Batch(cmds) => {
                for c in cmds {
                    self.execute_cmd(c);
                }
            }
            Cmd::Log(text) => {
                info!(target: "alphadex::log", "{text}");
                if self.logs.len() == LOG_CAPACITY {
                    self.logs.remove(0);
                }
                self.logs.push(text);
            }
            Cmd::Task(spec, f) => {
                let sender = self.task_sender.clone();
                let mut builder = thread::Builder::new();
                if let Some(name) = &spec.name {
                    builder = builder.name(name.clone());
                }
                if let Err(e) = builder.spawn(move || {
                    let msg = f();
                    let _ = sender.send(msg);
                }) {
                    warn!(task = ?spec.name, error = %e, "failed to spawn task");
                }
            }
        }
    }
}
