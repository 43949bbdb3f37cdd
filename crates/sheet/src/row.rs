//! Column layout of the schedule sheet and per-row validation.

use thiserror::Error;

/// Number of columns every physical row is validated against.
pub const FIELD_COUNT: usize = 13;

/// Schedule sheet columns, in sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Event,
    Professor,
    EmailDate,
    EmailCheckbox,
    PublicityDate,
    PublicityCheckbox,
    EventDate,
    TestDate,
    Location,
    LeadHosts,
    Hosts,
    BackupHosts,
    ExpectedAttendance,
}

impl Column {
    pub const ALL: [Column; FIELD_COUNT] = [
        Column::Event,
        Column::Professor,
        Column::EmailDate,
        Column::EmailCheckbox,
        Column::PublicityDate,
        Column::PublicityCheckbox,
        Column::EventDate,
        Column::TestDate,
        Column::Location,
        Column::LeadHosts,
        Column::Hosts,
        Column::BackupHosts,
        Column::ExpectedAttendance,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Why a physical row is not a record row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("column {0} must not be blank")]
    Blank(Column),
}

/// How a single cell is checked and normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRule {
    /// Trim whitespace, accept anything.
    Text,
    /// Trim whitespace, reject an empty result.
    Required,
}

impl ColumnRule {
    fn apply(self, column: Column, raw: &str) -> Result<String, RowError> {
        let trimmed = raw.trim();
        match self {
            ColumnRule::Text => Ok(trimmed.to_string()),
            ColumnRule::Required if trimmed.is_empty() => Err(RowError::Blank(column)),
            ColumnRule::Required => Ok(trimmed.to_string()),
        }
    }
}

/// One rule per column, applied positionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSchema {
    rules: [ColumnRule; FIELD_COUNT],
}

/// A row that passed its schema: exactly [`FIELD_COUNT`] trimmed cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRow {
    cells: Vec<String>,
}

impl ValidRow {
    pub fn get(&self, column: Column) -> &str {
        &self.cells[column.index()]
    }
}

impl RowSchema {
    /// Every column accepts any text.
    pub const fn text() -> Self {
        Self {
            rules: [ColumnRule::Text; FIELD_COUNT],
        }
    }

    /// Schema for the first physical row of a record: the event name is its key.
    pub const fn head() -> Self {
        let mut rules = [ColumnRule::Text; FIELD_COUNT];
        rules[Column::Event as usize] = ColumnRule::Required;
        Self { rules }
    }

    /// Schema for the second physical row of a record.
    pub const fn tail() -> Self {
        Self::text()
    }

    /// Pad `cells` to [`FIELD_COUNT`] and check the first [`FIELD_COUNT`] positions.
    ///
    /// Extra trailing cells are ignored. A failure is an ordinary outcome for
    /// header, footer and comment rows.
    pub fn validate(&self, cells: &[String]) -> Result<ValidRow, RowError> {
        let padded = pad_row(cells, FIELD_COUNT);
        let cells = Column::ALL
            .iter()
            .zip(&self.rules)
            .map(|(&column, rule)| rule.apply(column, &padded[column.index()]))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ValidRow { cells })
    }
}

impl Default for RowSchema {
    fn default() -> Self {
        Self::text()
    }
}

/// Pad with empty strings up to `len`. Never truncates.
pub fn pad_row(cells: &[String], len: usize) -> Vec<String> {
    let mut padded = cells.to_vec();
    if padded.len() < len {
        padded.resize(len, String::new());
    }
    padded
}
