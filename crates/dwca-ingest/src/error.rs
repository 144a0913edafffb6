//! Error types for archive ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while opening or reading a Darwin Core Archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    // === File System Errors ===
    /// Input path does not exist.
    #[error("archive not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read or write a file or directory.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file is not a readable zip package.
    #[error("failed to unzip {path}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    // === Archive Structure Errors ===
    /// Directory is not laid out as an archive.
    #[error("unsupported archive at {path}: {reason}")]
    UnsupportedArchive { path: PathBuf, reason: String },

    /// meta.xml is malformed or incomplete.
    #[error("invalid archive descriptor {path}: {message}")]
    Descriptor { path: PathBuf, message: String },

    /// A data file named by the descriptor is missing.
    #[error("data file not found: {path}")]
    MissingDataFile { path: PathBuf },

    /// Declared character encoding is not recognised.
    #[error("unknown encoding '{label}' declared for {path}")]
    UnknownEncoding { path: PathBuf, label: String },

    // === Data Errors ===
    /// Failed to parse a delimited data file.
    #[error("failed to read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl ArchiveError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn descriptor(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::Descriptor {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// True when the directory was not recognised as an archive at all,
    /// as opposed to an archive that was recognised but could not be read.
    #[must_use]
    pub fn is_unrecognized(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedArchive { .. } | Self::Descriptor { .. }
        )
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ArchiveError::NotFound {
            path: PathBuf::from("/data/dwca.zip"),
        };
        assert_eq!(err.to_string(), "archive not found: /data/dwca.zip");
    }

    #[test]
    fn test_unrecognized_classification() {
        let unsupported = ArchiveError::UnsupportedArchive {
            path: PathBuf::from("dir"),
            reason: "no meta.xml".to_string(),
        };
        assert!(unsupported.is_unrecognized());

        let missing = ArchiveError::MissingDataFile {
            path: PathBuf::from("dir/occurrence.txt"),
        };
        assert!(!missing.is_unrecognized());
    }
}
