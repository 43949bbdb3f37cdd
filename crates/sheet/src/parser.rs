//! Merge pairs of physical rows into [`ReviewEvent`]s.
//!
//! Each logical record spans two consecutive rows. The same column carries
//! different data depending on the row: the first row holds the professor's
//! email, the second the professor's name. [`HeadRow`] and [`TailRow`] keep the
//! two views apart so a field can't be read from the wrong row.

use tracing::debug;

use reviewbot_core::{Professor, ReviewEvent, Snapshot};

use crate::dates::DateResolver;
use crate::row::{Column, RowError, RowSchema, ValidRow};

/// Checkbox cells export as this literal when ticked.
const CHECKED: &str = "TRUE";

/// First physical row of a record.
#[derive(Debug, Clone)]
pub struct HeadRow(ValidRow);

/// Second physical row of a record.
#[derive(Debug, Clone)]
pub struct TailRow(ValidRow);

impl HeadRow {
    pub fn parse(cells: &[String]) -> Result<Self, RowError> {
        RowSchema::head().validate(cells).map(Self)
    }

    fn cell(&self, column: Column) -> &str {
        self.0.get(column)
    }
}

impl TailRow {
    pub fn parse(cells: &[String]) -> Result<Self, RowError> {
        RowSchema::tail().validate(cells).map(Self)
    }

    fn cell(&self, column: Column) -> &str {
        self.0.get(column)
    }
}

/// Build a record from two validated rows. Blank optional fields are omitted.
pub fn merge(head: &HeadRow, tail: &TailRow, dates: &DateResolver) -> ReviewEvent {
    let hosts = |column| {
        [head.cell(column), tail.cell(column)]
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>()
    };

    ReviewEvent {
        name: head.cell(Column::Event).to_string(),
        professor: Professor {
            name: tail.cell(Column::Professor).to_string(),
            email: head.cell(Column::Professor).to_string(),
        },
        email_date: dates.resolve(head.cell(Column::EmailDate)),
        email_done: checkbox(head.cell(Column::EmailCheckbox), head.cell(Column::EmailDate)),
        publicity_date: dates.resolve(head.cell(Column::PublicityDate)),
        publicity_done: checkbox(
            head.cell(Column::PublicityCheckbox),
            head.cell(Column::PublicityDate),
        ),
        event_date: dates.resolve(head.cell(Column::EventDate)),
        test_date: dates.resolve(head.cell(Column::TestDate)),
        location: head.cell(Column::Location).to_string(),
        lead_hosts: hosts(Column::LeadHosts),
        hosts: hosts(Column::Hosts),
        backup_hosts: hosts(Column::BackupHosts),
        expected_attendance: count(head.cell(Column::ExpectedAttendance)),
    }
}

/// Plain non-negative integer: ASCII digits only, no sign.
fn count(cell: &str) -> Option<u32> {
    if cell.is_empty() || !cell.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    cell.parse().ok()
}

/// `Some(true)` iff ticked; unticked next to a blank date is `None`.
fn checkbox(cell: &str, date_cell: &str) -> Option<bool> {
    if cell == CHECKED {
        Some(true)
    } else if date_cell.is_empty() {
        None
    } else {
        Some(false)
    }
}

/// Validate both rows and merge them. `None` when either row is not a record row.
pub fn parse_record(
    first: &[String],
    second: &[String],
    dates: &DateResolver,
) -> Option<ReviewEvent> {
    let head = match HeadRow::parse(first) {
        Ok(h) => h,
        Err(e) => {
            debug!(error = %e, "skipping record: first row invalid");
            return None;
        }
    };
    let tail = match TailRow::parse(second) {
        Ok(t) => t,
        Err(e) => {
            debug!(error = %e, "skipping record: second row invalid");
            return None;
        }
    };
    Some(merge(&head, &tail, dates))
}

/// Parse the full sheet grid into a fresh snapshot.
///
/// Row 0 is the header. Records are read in pairs from row 1 until the first
/// row with no cells, which marks the start of the comments section; anything
/// below it is ignored. An unpaired last row is ignored too.
pub fn parse_snapshot(rows: &[Vec<String>], dates: &DateResolver) -> Snapshot {
    let mut snapshot = Snapshot::new();
    let body = rows.get(1..).unwrap_or_default();

    for (pair_index, pair) in body.chunks(2).enumerate() {
        let [first, second] = pair else {
            debug!(row = 1 + pair_index * 2, "ignoring unpaired trailing row");
            break;
        };
        if first.is_empty() || second.is_empty() {
            break;
        }
        if let Some(event) = parse_record(first, second, dates) {
            snapshot.insert(event.name.clone(), event);
        }
    }

    debug!(records = snapshot.len(), "parsed schedule snapshot");
    snapshot
}
