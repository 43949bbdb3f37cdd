//! Sheet source error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sheets API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("unexpected response shape: {0}")]
    Decode(String),

    #[error("configuration error: {0}")]
    Config(String),
}
