use std::path::PathBuf;

use dwca_extract::{ExtractSummary, WriteMode};
use dwca_model::DwcTerm;

#[derive(Debug)]
pub struct RunResult {
    pub input: PathBuf,
    /// Directory the archive was read from, after unzip and fallback.
    pub archive_dir: PathBuf,
    pub output: PathBuf,
    pub mode: WriteMode,
    pub extensions: usize,
    pub missing_terms: Vec<DwcTerm>,
    pub summary: ExtractSummary,
}

/// Stage a failed run stopped in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    /// Before any record was read.
    Setup,
    Extract,
}

impl RunStage {
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Setup => 1,
            Self::Extract => 2,
        }
    }
}

#[derive(Debug)]
pub struct RunFailure {
    pub stage: RunStage,
    pub error: anyhow::Error,
}

impl RunFailure {
    pub fn setup(error: anyhow::Error) -> Self {
        Self {
            stage: RunStage::Setup,
            error,
        }
    }

    pub fn extract(error: anyhow::Error) -> Self {
        Self {
            stage: RunStage::Extract,
            error,
        }
    }
}
