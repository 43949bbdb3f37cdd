//! Time source for the scheduler.

use chrono::{DateTime, Local};

/// Provides the current local time.
///
/// The scheduler reads it once per firing to fix "today".
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
