#![forbid(unsafe_code)]

//! Deterministic program simulator for testing.
//!
//! `ProgramSimulator` runs a [`Model`] without threads or I/O. By default a
//! `Cmd::Task` runs inline and its message is applied immediately. With
//! [`ProgramSimulator::with_deferred_tasks`] tasks are queued instead, so a
//! test can complete them in any order and observe how the model treats
//! late or out-of-order results.
//!
//! # Example
//!
//! ```ignore
//! use alphadex_runtime::ProgramSimulator;
//!
//! let mut sim = ProgramSimulator::new(Counter { value: 0 });
//! sim.init();
//! sim.send(Msg::Increment);
//! assert_eq!(sim.model().value, 1);
//! ```

use std::collections::VecDeque;

use crate::frame::Frame;
use crate::program::{Cmd, Model, TaskSpec};

/// Record of a command that was executed during simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmdRecord {
    /// No-op command.
    None,
    /// Message sent to model.
    Msg,
    /// Batch of commands.
    Batch(usize),
    /// Log message emitted.
    Log(String),
    /// Background task executed or queued.
    Task(Option<String>),
}

struct PendingTask<M> {
    spec: TaskSpec,
    run: Box<dyn FnOnce() -> M + Send>,
}

/// Deterministic simulator for [`Model`] testing.
pub struct ProgramSimulator<M: Model> {
    model: M,
    frames: Vec<Frame>,
    command_log: Vec<CmdRecord>,
    logs: Vec<String>,
    defer_tasks: bool,
    pending: VecDeque<PendingTask<M::Message>>,
}

impl<M: Model> ProgramSimulator<M> {
    /// Create a simulator that runs tasks inline.
    pub fn new(model: M) -> Self {
        Self {
            model,
            frames: Vec::new(),
            command_log: Vec::new(),
            logs: Vec::new(),
            defer_tasks: false,
            pending: VecDeque::new(),
        }
    }

    /// Create a simulator that queues tasks until completed explicitly.
    pub fn with_deferred_tasks(model: M) -> Self {
        let mut sim = Self::new(model);
        sim.defer_tasks = true;
        sim
    }

    /// Initialize the model by calling `Model::init()` and executing returned commands.
    pub fn init(&mut self) {
        let cmd = self.model.init();
        self.execute_cmd(cmd);
    }

    /// Send a specific message to the model.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.execute_cmd(cmd);
    }

    /// Number of queued tasks.
    pub fn pending_tasks(&self) -> usize {
        self.pending.len()
    }

    /// Names of queued tasks, oldest first.
    pub fn pending_task_names(&self) -> Vec<Option<String>> {
        self.pending.iter().map(|t| t.spec.name.clone()).collect()
    }

    /// Run the queued task at `index` and apply its message.
    ///
    /// Returns `false` if there is no such task.
    pub fn complete_task(&mut self, index: usize) -> bool {
        let Some(task) = self.pending.remove(index) else {
            return false;
        };
        let msg = (task.run)();
        self.send(msg);
        true
    }

    /// Run every queued task in FIFO order, including tasks they spawn.
    pub fn complete_all_tasks(&mut self) -> usize {
        let mut completed = 0;
        while self.complete_task(0) {
            completed += 1;
        }
        completed
    }

    /// Render the model into a new frame and keep it.
    pub fn capture_frame(&mut self, width: u16, height: u16) -> &Frame {
        let mut frame = Frame::new(width, height);
        self.model.view(&mut frame);
        let idx = self.frames.len();
        self.frames.push(frame);
        &self.frames[idx]
    }

    /// Get all captured frames.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Get a reference to the model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Get a mutable reference to the model.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Get all log messages emitted via `Cmd::Log`.
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    /// Get the command execution log.
    pub fn command_log(&self) -> &[CmdRecord] {
        &self.command_log
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {
                self.command_log.push(CmdRecord::None);
            }
            Cmd::Msg(m) => {
                self.command_log.push(CmdRecord::Msg);
                self.send(m);
            }
            Cmd::Batch(cmds) => {
                self.command_log.push(CmdRecord::Batch(cmds.len()));
                for c in cmds {
                    self.execute_cmd(c);
                }
            }
            Cmd::Log(text) => {
                self.command_log.push(CmdRecord::Log(text.clone()));
                self.logs.push(text);
            }
            Cmd::Task(spec, run) => {
                self.command_log.push(CmdRecord::Task(spec.name.clone()));
                if self.defer_tasks {
                    self.pending.push_back(PendingTask { spec, run });
                } else {
                    let msg = run();
                    self.send(msg);
                }
            }
        }
    }
}
