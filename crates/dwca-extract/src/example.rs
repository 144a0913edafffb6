//! Synthetic example rows.
//!
//! An example row is a copy of a selected record with its identity fields
//! replaced, so it can be published as test data without colliding with the
//! source. The trailing relationship columns point back at the source record
//! and carry a JSON payload of the replaced values.

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use dwca_model::{DwcTerm, RecordValues};

use crate::error::Result;
use crate::schema::FlatSchema;

/// Collection identifier stamped on every example row.
pub const EXAMPLE_COLLECTION_ID: &str = "urn:uuid:1887c794-7291-4005-8eee-1afbe9d7814e";

/// `relationshipOfResource` of an example row.
pub const EXAMPLE_RELATIONSHIP: &str = "source for modified example record";

/// Payload key for the source record's `occurrenceID`.
pub const SOURCE_OCCURRENCE_KEY: &str = "sourceOccurrenceID";
/// Payload key for the source dataset DOI.
pub const SOURCE_DATASET_KEY: &str = "sourceDatasetID";
/// Payload keys left empty for later hand annotation.
pub const ANNOTATION_KEYS: [&str; 2] = ["Modifications", "Tests"];

/// Replacement value for one field of an example row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Substitution {
    Fixed(&'static str),
    /// A fresh `urn:uuid:` identifier per row.
    UrnUuid,
}

impl Substitution {
    #[must_use]
    pub fn generate(self) -> String {
        match self {
            Self::Fixed(value) => value.to_string(),
            Self::UrnUuid => Uuid::new_v4().urn().to_string(),
        }
    }
}

/// Fields replaced in every example row.
pub const EXAMPLE_SUBSTITUTIONS: &[(DwcTerm, Substitution)] = &[
    (DwcTerm::OccurrenceId, Substitution::UrnUuid),
    (DwcTerm::InstitutionCode, Substitution::Fixed("example.org")),
    (DwcTerm::InstitutionId, Substitution::Fixed("http://example.org/")),
    (DwcTerm::CollectionCode, Substitution::Fixed("Modified Example")),
    (DwcTerm::CollectionId, Substitution::Fixed(EXAMPLE_COLLECTION_ID)),
];

fn substitution(term: DwcTerm) -> Option<Substitution> {
    EXAMPLE_SUBSTITUTIONS
        .iter()
        .find(|(candidate, _)| *candidate == term)
        .map(|(_, substitution)| *substitution)
}

/// Provenance payload written to `relationshipRemarks`.
///
/// Absent values serialise as JSON `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExampleMetadata(BTreeMap<String, Option<String>>);

impl ExampleMetadata {
    pub fn insert(&mut self, key: impl Into<String>, value: Option<&str>) {
        self.0.insert(key.into(), value.map(str::to_string));
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.0.get(key).map(Option::as_deref)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A derived example row and the payload embedded in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleRow {
    pub values: Vec<String>,
    pub metadata: ExampleMetadata,
}

/// Derive the example row for `record`.
///
/// `source_id` is the source row's `occurrenceID`; when it is absent the
/// relationship target is left empty and the payload records `null`.
/// `doi` is recorded in the payload only. The row always carries the
/// three relationship columns.
pub fn derive_example<R: RecordValues + ?Sized>(
    record: &R,
    schema: &FlatSchema,
    source_id: Option<&str>,
    doi: Option<&str>,
) -> Result<ExampleRow> {
    let mut metadata = ExampleMetadata::default();
    let mut values = Vec::with_capacity(schema.value_terms().len() + 3);

    for &term in schema.value_terms() {
        let original = record.value(term);
        let value = match substitution(term) {
            Some(substitution) => {
                metadata.insert(term.simple_name(), original);
                substitution.generate()
            }
            None => original.unwrap_or_default().to_string(),
        };
        values.push(value);
    }

    metadata.insert(SOURCE_OCCURRENCE_KEY, source_id);
    if let Some(doi) = doi.filter(|doi| !doi.is_empty()) {
        metadata.insert(SOURCE_DATASET_KEY, Some(doi));
    }
    for key in ANNOTATION_KEYS {
        metadata.insert(key, Some(""));
    }

    values.push(source_id.unwrap_or_default().to_string());
    values.push(EXAMPLE_RELATIONSHIP.to_string());
    values.push(metadata.to_json()?);

    Ok(ExampleRow { values, metadata })
}
