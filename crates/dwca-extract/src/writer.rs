//! Output rows.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use csv::{QuoteStyle, WriterBuilder};

use crate::error::{ExtractError, Result};

/// Destination for extracted rows.
pub trait RowSink {
    fn write_header(&mut self, headers: &[&str]) -> Result<()>;

    fn write_row(&mut self, values: &[String]) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// In-memory capture, header included as the first row.
impl RowSink for Vec<Vec<String>> {
    fn write_header(&mut self, headers: &[&str]) -> Result<()> {
        self.push(headers.iter().map(|header| (*header).to_string()).collect());
        Ok(())
    }

    fn write_row(&mut self, values: &[String]) -> Result<()> {
        self.push(values.to_vec());
        Ok(())
    }
}

/// How an existing output file is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the file and write a header row.
    #[default]
    Truncate,
    /// Add rows to the end of the file, never writing a header.
    Append,
}

impl WriteMode {
    #[must_use]
    pub fn from_append(append: bool) -> Self {
        if append { Self::Append } else { Self::Truncate }
    }

    #[must_use]
    pub fn writes_header(self) -> bool {
        matches!(self, Self::Truncate)
    }
}

/// CSV sink quoting every field.
pub struct CsvRowWriter<W: Write> {
    inner: csv::Writer<W>,
}

impl<W: Write> std::fmt::Debug for CsvRowWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvRowWriter").finish_non_exhaustive()
    }
}

impl CsvRowWriter<File> {
    /// Open `path` for writing in `mode`, creating it if needed.
    pub fn create(path: &Path, mode: WriteMode) -> Result<Self> {
        let mut options = OpenOptions::new();
        match mode {
            WriteMode::Truncate => options.write(true).create(true).truncate(true),
            WriteMode::Append => options.append(true).create(true),
        };
        let file = options.open(path).map_err(|source| ExtractError::Output {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> CsvRowWriter<W> {
    pub fn from_writer(writer: W) -> Self {
        let inner = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .flexible(true)
            .from_writer(writer);
        Self { inner }
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.inner
            .into_inner()
            .map_err(|error| ExtractError::Io(error.into_error()))
    }
}

impl<W: Write> RowSink for CsvRowWriter<W> {
    fn write_header(&mut self, headers: &[&str]) -> Result<()> {
        self.inner.write_record(headers)?;
        Ok(())
    }

    fn write_row(&mut self, values: &[String]) -> Result<()> {
        self.inner.write_record(values)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}
