use std::io;
use thiserror::Error;

use rearrscan_core::errors::RearrangementError;

/// Error type for rearrscan-io operations.
#[derive(Error, Debug)]
pub enum RearrscanIoError {
    /// IO error occurred during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The classification itself failed.
    #[error(transparent)]
    Rearrangement(#[from] RearrangementError),

    /// A BED line without chromosome, start and end columns.
    #[error("Invalid BED line {line}: {content}")]
    InvalidBedLine { line: usize, content: String },

    /// A SAM header built for an export that noodles refuses.
    #[error("Invalid SAM header: {0}")]
    InvalidSamHeader(String),

    /// The report could not be serialized.
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for rearrscan-io operations.
pub type Result<T> = std::result::Result<T, RearrscanIoError>;
