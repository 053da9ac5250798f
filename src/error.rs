use crate::models::ArtifactKind;
use thiserror::Error;

/// Failures talking to the report API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Actions the history view refuses to perform.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Log {0} has no stored content")]
    NoContent(i64),

    #[error("Log {0} is not on the current page")]
    UnknownLog(i64),

    #[error("No {0} artifact for this run")]
    ArtifactMissing(ArtifactKind),

    #[error("Nothing selected")]
    NoSelection,
}
