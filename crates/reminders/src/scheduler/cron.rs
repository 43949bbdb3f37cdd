//! Cron normalization and next-fire computation.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, TimeZone};
use cron::Schedule;

use crate::error::SchedulerError;

/// Local midnight, in standard 5-field cron.
pub const DAILY_CRON: &str = "0 0 * * *";

/// Gap between firings; used when the schedule has no next tick.
pub const FIRING_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// Normalize a 5-field cron expression to 6-field by prepending "0 " for seconds.
///
/// The `cron` crate requires 6 fields: `sec min hour day-of-month month day-of-week`.
pub fn normalize_cron(cron_5field: &str) -> String {
    let trimmed = cron_5field.trim();
    let field_count = trimmed.split_whitespace().count();
    if field_count == 5 {
        format!("0 {}", trimmed)
    } else {
        // Already 6-field or non-standard; pass through as-is.
        trimmed.to_string()
    }
}

pub(crate) fn parse_schedule(expr: &str) -> Result<Schedule, SchedulerError> {
    Schedule::from_str(&normalize_cron(expr))
        .map_err(|e| SchedulerError::Schedule(format!("{expr}: {e}")))
}

/// First tick of `schedule` strictly after `now`, in `now`'s time zone.
pub fn next_fire_after<Tz: TimeZone>(schedule: &Schedule, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    schedule.after(now).next()
}
