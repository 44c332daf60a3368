//! Error handling for the report extractor
//!
//! The parsing core never fails: bad lines are skipped. These errors cover
//! the adapters around it (reading files, configuration) and the "nothing
//! found" outcome for callers that want it as an error value.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("no sales records found in {source_name}")]
    NothingFound { source_name: String },

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("pdf text extraction failed: {0}")]
    PdfText(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error")]
    Io(#[from] std::io::Error),
}

/// Result type alias for adapter operations
pub type Result<T> = anyhow::Result<T>;
