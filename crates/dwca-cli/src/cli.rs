//! CLI argument definitions for the Darwin Core Archive extractor.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "dwca-extractor",
    version,
    about = "Extract flat Darwin Core occurrence records from a Darwin Core Archive",
    long_about = "Extract flat Darwin Core occurrence records from a Darwin Core Archive.\n\n\
                  Reads an Occurrence-core archive (zip file or unpacked directory) and\n\
                  writes one CSV row per occurrence using the flat Darwin Core terms."
)]
pub struct Cli {
    /// Darwin Core Archive zip file or unpacked archive directory.
    #[arg(
        short = 'i',
        long = "input",
        value_name = "ARCHIVE",
        required_unless_present = "list_terms"
    )]
    pub input: Option<PathBuf>,

    /// CSV file to write.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        default_value = "output.csv"
    )]
    pub output: PathBuf,

    /// Append rows to the output file without writing a header.
    #[arg(short = 'a', long = "append")]
    pub append: bool,

    /// Extract at most this many records (0 for all).
    #[arg(
        short = 'l',
        long = "limit",
        value_name = "N",
        conflicts_with = "cherry_pick"
    )]
    pub limit: Option<usize>,

    /// Extract only these occurrenceID values, separated by '|'.
    #[arg(short = 'c', long = "cherry-pick", value_name = "IDS")]
    pub cherry_pick: Option<String>,

    /// DOI of the source dataset, stamped into empty datasetID values.
    #[arg(short = 'd', long = "doi", value_name = "DOI")]
    pub doi: Option<String>,

    /// Follow each record with a modified example copy linked to its source.
    #[arg(short = 'e', long = "create-example-copies")]
    pub create_example_copies: bool,

    /// Directory zip archives are unpacked into (default: $DWCA_WORK_DIR or the current directory).
    #[arg(long = "work-dir", value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Print the flat Darwin Core columns and exit.
    #[arg(long = "list-terms")]
    pub list_terms: bool,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
