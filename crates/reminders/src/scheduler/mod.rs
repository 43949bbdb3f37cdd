//! Daily reminder scheduling.
//!
//! [`DailyScheduler`] owns its collaborators and runs one loop: wait for the
//! next local midnight, fire, then fire again every 24 hours until stopped.
//! A failing cycle is logged and reported; it never cancels later cycles.

mod core;
pub(crate) mod cron;
mod state;


pub use self::core::{DailyScheduler, ReminderTarget, SchedulerHandle};
pub use self::cron::{next_fire_after, normalize_cron, DAILY_CRON, FIRING_PERIOD};
pub use self::state::SchedulerState;
