//! Turning one record into one output row.

use dwca_model::{DwcTerm, RecordValues};

use crate::schema::FlatSchema;

/// A flattened primary row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRow {
    /// One value per schema column.
    pub values: Vec<String>,
    /// The record's own `occurrenceID`, before any substitution.
    pub source_id: Option<String>,
}

/// Flatten `record` into a row matching `schema`.
///
/// Missing values become empty strings. A blank `datasetID` is stamped
/// with `dataset_id_override` when one is given. In example mode the
/// relationship columns are left empty.
pub fn flatten<R: RecordValues + ?Sized>(
    record: &R,
    schema: &FlatSchema,
    dataset_id_override: Option<&str>,
) -> FlatRow {
    let stamp = dataset_id_override.filter(|doi| !doi.is_empty());

    let mut values = Vec::with_capacity(schema.len());
    for &term in schema.value_terms() {
        let value = match (term, record.value(term)) {
            (DwcTerm::DatasetId, None) => stamp,
            (_, value) => value,
        };
        values.push(value.unwrap_or_default().to_string());
    }
    values.resize(schema.len(), String::new());

    FlatRow {
        values,
        source_id: record.occurrence_id().map(str::to_string),
    }
}
