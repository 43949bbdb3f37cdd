use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The professor a review session is organised with.
///
/// The sheet stores the email on the first physical row and the name on the
/// second, in the same column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professor {
    pub name: String,
    pub email: String,
}

/// One logical record of the schedule sheet (two physical rows).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEvent {
    /// Unique key within a snapshot. Never empty.
    pub name: String,
    pub professor: Professor,
    pub email_date: Option<NaiveDate>,
    pub email_done: Option<bool>,
    pub publicity_date: Option<NaiveDate>,
    pub publicity_done: Option<bool>,
    pub event_date: Option<NaiveDate>,
    pub test_date: Option<NaiveDate>,
    pub location: String,
    pub lead_hosts: Vec<String>,
    pub hosts: Vec<String>,
    pub backup_hosts: Vec<String>,
    pub expected_attendance: Option<u32>,
}

impl ReviewEvent {
    /// Lead hosts, hosts and backup hosts in that order.
    ///
    /// Names present in several lists are repeated.
    pub fn all_hosts(&self) -> impl Iterator<Item = &str> {
        self.lead_hosts
            .iter()
            .chain(&self.hosts)
            .chain(&self.backup_hosts)
            .map(String::as_str)
    }
}

/// Parsed records keyed by event name, in sheet order.
pub type Snapshot = IndexMap<String, ReviewEvent>;
