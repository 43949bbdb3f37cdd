//! Observable scheduler lifecycle.

use chrono::{DateTime, Local};

/// Where the scheduler loop currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerState {
    /// Created, loop not started.
    Idle,
    /// Waiting for the next firing.
    Armed { next_fire: DateTime<Local> },
    /// A reminder cycle is running.
    Firing,
    /// Loop exited after a stop request.
    Stopped,
}

impl SchedulerState {
    pub fn next_fire(&self) -> Option<DateTime<Local>> {
        match self {
            SchedulerState::Armed { next_fire } => Some(*next_fire),
            _ => None,
        }
    }
}
