use crate::{SubmissionRequest, TaskHandle};

/// Side effects requested by `update`; executed by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CreateTask(SubmissionRequest),
    /// Start the poll loop for `handle`, replacing any other loop.
    StartPolling { handle: TaskHandle },
    /// Stop the poll loop for `handle`. Safe to repeat.
    StopPolling { handle: TaskHandle },
}
