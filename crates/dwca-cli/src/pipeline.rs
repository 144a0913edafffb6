//! Extraction pipeline: resolve and check the archive, then run the extraction.
//!
//! Setup opens everything a run needs, output file last, so a rejected
//! archive never truncates an existing output.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use dwca_extract::{
    CsvRowWriter, ExtractError, ExtractOptions, WriteMode, check_archive, extract,
};
use dwca_ingest::{Archive, StarRecords, default_work_dir, resolve_archive_dir};
use dwca_model::DwcTerm;

use crate::types::{RunFailure, RunResult};

/// Everything needed to run one extraction.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Where zip archives are unpacked.
    pub work_dir: PathBuf,
    pub mode: WriteMode,
    pub options: ExtractOptions,
}

impl PipelineConfig {
    #[must_use]
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            work_dir: default_work_dir(),
            mode: WriteMode::Truncate,
            options: ExtractOptions::default(),
        }
    }

    /// Set the write mode; appending also suppresses the header row.
    #[must_use]
    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self.options.write_header = mode.writes_header();
        self
    }

    #[must_use]
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        let write_header = self.mode.writes_header();
        self.options = ExtractOptions {
            write_header,
            ..options
        };
        self
    }
}

/// A run whose archive and output are open and checked.
#[derive(Debug)]
pub struct PreparedRun {
    archive_dir: PathBuf,
    extensions: usize,
    missing_terms: Vec<DwcTerm>,
    records: StarRecords,
    writer: CsvRowWriter<File>,
}

impl PreparedRun {
    #[must_use]
    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    #[must_use]
    pub fn missing_terms(&self) -> &[DwcTerm] {
        &self.missing_terms
    }
}

/// Resolve, open and check the archive, then open the output file.
pub fn prepare(config: &PipelineConfig) -> Result<PreparedRun> {
    let span = info_span!("setup", input = %config.input.display());
    let _guard = span.enter();

    let archive_dir = resolve_archive_dir(&config.input, &config.work_dir)
        .with_context(|| format!("unpack archive {}", config.input.display()))?;
    let archive = Archive::open_with_fallback(&archive_dir)
        .with_context(|| format!("open archive {}", archive_dir.display()))?;
    let check = check_archive(&archive).context("check archive")?;
    let records = archive
        .star_records()
        .with_context(|| format!("read archive {}", archive.location().display()))?;
    let writer = CsvRowWriter::create(&config.output, config.mode)
        .with_context(|| format!("create output {}", config.output.display()))?;

    info!(
        archive = %archive.location().display(),
        output = %config.output.display(),
        append = matches!(config.mode, WriteMode::Append),
        "setup complete"
    );
    Ok(PreparedRun {
        archive_dir: archive.location().to_path_buf(),
        extensions: archive.extensions().len(),
        missing_terms: check.missing_terms,
        records,
        writer,
    })
}

/// Run the extraction of a prepared run.
pub fn execute(config: &PipelineConfig, run: PreparedRun) -> Result<RunResult> {
    let span = info_span!("extract", output = %config.output.display());
    let _guard = span.enter();

    let PreparedRun {
        archive_dir,
        extensions,
        missing_terms,
        records,
        mut writer,
    } = run;
    let summary = extract(records, &config.options, &mut writer)
        .with_context(|| format!("extract records into {}", config.output.display()))?;

    Ok(RunResult {
        input: config.input.clone(),
        archive_dir,
        output: config.output.clone(),
        mode: config.mode,
        extensions,
        missing_terms,
        summary,
    })
}

/// Prepare and execute, tagging a failure with the stage it happened in.
pub fn run_pipeline(config: &PipelineConfig) -> std::result::Result<RunResult, RunFailure> {
    let prepared = prepare(config).map_err(RunFailure::setup)?;
    execute(config, prepared).map_err(|error| {
        let setup = error
            .downcast_ref::<ExtractError>()
            .is_some_and(ExtractError::is_setup);
        if setup {
            RunFailure::setup(error)
        } else {
            RunFailure::extract(error)
        }
    })
}
