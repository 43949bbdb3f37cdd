//! Daily review-session reminders.
//!
//! - [`engine`]: decides which reminders fire for a day and renders the message
//! - [`scheduler`]: the daily loop that fetches, decides and sends
//! - [`clock`]: time source

pub mod clock;
pub mod engine;
pub mod error;
pub mod scheduler;

pub use clock::{Clock, SystemClock};
pub use engine::{build_reminder, Reminder};
pub use error::SchedulerError;
pub use scheduler::{DailyScheduler, ReminderTarget, SchedulerHandle, SchedulerState};
