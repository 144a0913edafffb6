//! The extraction loop.

use tracing::{debug, info, trace};

use dwca_model::RecordValues;

use crate::error::{ExtractError, Result};
use crate::example::derive_example;
use crate::flatten::flatten;
use crate::schema::FlatSchema;
use crate::selector::Selection;
use crate::writer::RowSink;

/// Options for one extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub selection: Selection,
    /// Stamped into blank `datasetID` values and recorded in example payloads.
    pub dataset_doi: Option<String>,
    /// Follow every emitted row with a derived example row.
    pub create_examples: bool,
    /// Write the header row first. Off when appending.
    pub write_header: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            selection: Selection::Unlimited,
            dataset_doi: None,
            create_examples: false,
            write_header: true,
        }
    }
}

impl ExtractOptions {
    #[must_use]
    pub fn schema(&self) -> FlatSchema {
        FlatSchema::new(self.create_examples)
    }

    fn doi(&self) -> Option<&str> {
        self.dataset_doi.as_deref().filter(|doi| !doi.is_empty())
    }
}

/// Counts from a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Records pulled from the source.
    pub records_read: usize,
    /// Records written as flat rows.
    pub records_extracted: usize,
    /// Example rows written alongside them.
    pub example_rows: usize,
}

/// Flatten the selected `records` into `sink`.
///
/// Rows are written in source order, each example row directly after its
/// source row. With a record limit the source is not read past the last
/// record emitted. Any source error stops the run.
pub fn extract<I, R, E, S>(
    records: I,
    options: &ExtractOptions,
    sink: &mut S,
) -> Result<ExtractSummary>
where
    I: IntoIterator<Item = std::result::Result<R, E>>,
    R: RecordValues,
    E: Into<ExtractError>,
    S: RowSink + ?Sized,
{
    let schema = options.schema();
    let doi = options.doi();
    if options.write_header {
        sink.write_header(&schema.headers())?;
    }

    let mut summary = ExtractSummary::default();
    let mut records = records.into_iter();
    while !options.selection.is_exhausted(summary.records_extracted) {
        let Some(record) = records.next() else {
            break;
        };
        let record = record.map_err(Into::<ExtractError>::into)?;
        summary.records_read += 1;

        let id = record.occurrence_id();
        if !options
            .selection
            .should_include(id, summary.records_extracted)
        {
            trace!(occurrence_id = id.unwrap_or_default(), "record not selected");
            continue;
        }

        let row = flatten(&record, &schema, doi);
        sink.write_row(&row.values)?;
        if options.create_examples {
            let example = derive_example(&record, &schema, row.source_id.as_deref(), doi)?;
            sink.write_row(&example.values)?;
            summary.example_rows += 1;
        }
        summary.records_extracted += 1;
        debug!(
            occurrence_id = row.source_id.as_deref().unwrap_or_default(),
            extracted = summary.records_extracted,
            "extracted record"
        );
    }
    sink.flush()?;

    info!(
        read = summary.records_read,
        extracted = summary.records_extracted,
        examples = summary.example_rows,
        "extraction finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;
    use std::convert::Infallible;

    use dwca_model::DwcTerm;

    fn record(id: &str) -> std::result::Result<BTreeMap<DwcTerm, String>, Infallible> {
        let mut values = BTreeMap::new();
        values.insert(DwcTerm::OccurrenceId, id.to_string());
        Ok(values)
    }

    #[test]
    fn test_header_then_rows() {
        let mut rows: Vec<Vec<String>> = Vec::new();
        let summary = extract(
            vec![record("A"), record("B")],
            &ExtractOptions::default(),
            &mut rows,
        )
        .unwrap();

        assert_eq!(summary.records_extracted, 2);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], "institutionID");
        assert!(rows.iter().all(|row| row.len() == rows[0].len()));
    }

    #[test]
    fn test_source_error_stops_run() {
        let records = vec![
            Ok(BTreeMap::<DwcTerm, String>::new()),
            Err(ExtractError::ConflictingSelection { limit: 1 }),
            Ok(BTreeMap::new()),
        ];
        let mut rows: Vec<Vec<String>> = Vec::new();
        let options = ExtractOptions {
            write_header: false,
            ..ExtractOptions::default()
        };
        let result = extract(records, &options, &mut rows);
        assert!(result.is_err());
        assert_eq!(rows.len(), 1);
    }
}
