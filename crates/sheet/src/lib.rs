//! Schedule sheet ingestion.
//!
//! Turns the raw cell grid of the review schedule into a [`Snapshot`] of
//! [`ReviewEvent`](reviewbot_core::ReviewEvent)s:
//! - [`row`]: column layout and per-row validation
//! - [`dates`]: free-text date resolution
//! - [`parser`]: two-row record merging and snapshot building
//! - [`source`]: fetch abstraction and the refresh-interval cache
//! - [`google`]: Google Sheets values API client

pub mod dates;
pub mod error;
pub mod google;
pub mod parser;
pub mod row;
pub mod source;

pub use dates::DateResolver;
pub use error::SheetError;
pub use google::GoogleSheetsSource;
pub use parser::{parse_record, parse_snapshot};
pub use reviewbot_core::Snapshot;
pub use row::{Column, RowError, RowSchema, ValidRow, FIELD_COUNT};
pub use source::{SheetCache, SheetSource, SnapshotSource};
