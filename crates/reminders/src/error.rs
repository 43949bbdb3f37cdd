use thiserror::Error;

use reviewbot_notify::NotifyError;
use reviewbot_sheet::SheetError;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("schedule sheet: {0}")]
    Sheet(#[from] SheetError),

    #[error("chat: {0}")]
    Chat(#[from] NotifyError),

    /// A collaborator required at startup is missing or unusable.
    #[error("{0}")]
    Unavailable(String),

    #[error("invalid schedule: {0}")]
    Schedule(String),

    #[error("reminder cycle panicked: {0}")]
    Panicked(String),
}
