//! Error types for extraction.

use std::path::PathBuf;

use thiserror::Error;

use dwca_ingest::ArchiveError;

/// Errors raised while configuring or running an extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    // === Setup Errors ===
    /// A record limit and a cherry-pick list were both given.
    #[error("a record limit ({limit}) cannot be combined with a cherry-pick list")]
    ConflictingSelection { limit: usize },

    /// The archive core is not an occurrence table.
    #[error("archive core at {path} has row type '{row_type}', expected an Occurrence core")]
    UnsupportedCore { path: PathBuf, row_type: String },

    /// Output file could not be created or opened.
    #[error("failed to open output {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Run Errors ===
    /// The record source failed mid-iteration.
    #[error("failed to read record: {0}")]
    Source(#[from] ArchiveError),

    /// Writing a row failed.
    #[error("failed to write row: {0}")]
    Write(#[from] csv::Error),

    /// Flushing output failed.
    #[error("failed to flush output: {0}")]
    Io(#[from] std::io::Error),

    /// Example metadata could not be serialised.
    #[error("failed to serialise example metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

impl From<std::convert::Infallible> for ExtractError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

impl ExtractError {
    /// True for errors detected before any record is processed.
    #[must_use]
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            Self::ConflictingSelection { .. } | Self::UnsupportedCore { .. } | Self::Output { .. }
        )
    }
}

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
