//! Records read from archive data files.

use std::collections::BTreeMap;

use dwca_model::{DwcTerm, RecordValues};

use crate::meta::FileDescriptor;

/// Where a term's value comes from in a data row.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnSource {
    term: DwcTerm,
    index: Option<usize>,
    default: Option<String>,
}

/// Column mapping for one data file, built from its descriptor.
///
/// Terms outside the Darwin Core vocabulary are ignored. When a term is
/// mapped twice the first mapping wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLayout {
    row_type: String,
    id_index: Option<usize>,
    columns: Vec<ColumnSource>,
}

impl RecordLayout {
    #[must_use]
    pub fn new(file: &FileDescriptor) -> Self {
        let mut columns: Vec<ColumnSource> = Vec::with_capacity(file.fields.len());
        for field in &file.fields {
            let Some(term) = field.dwc_term() else {
                continue;
            };
            if columns.iter().any(|column| column.term == term) {
                continue;
            }
            columns.push(ColumnSource {
                term,
                index: field.index,
                default: field.default.clone(),
            });
        }
        Self {
            row_type: file.row_type.clone(),
            id_index: file.id_index,
            columns,
        }
    }

    /// Build a record from the cells of one row.
    ///
    /// Cells past the end of a short row read as blank, so the
    /// column's default applies. Non-blank cells are kept as read.
    #[must_use]
    pub fn record(&self, cells: &[String]) -> Record {
        let cell = |index: Option<usize>| {
            index
                .and_then(|index| cells.get(index))
                .map(String::as_str)
                .filter(|value| !value.trim().is_empty())
        };

        let mut values = BTreeMap::new();
        for column in &self.columns {
            let value = cell(column.index).or(column.default.as_deref());
            if let Some(value) = value {
                values.insert(column.term, value.to_string());
            }
        }
        Record {
            row_type: self.row_type.clone(),
            id: cell(self.id_index).map(str::to_string),
            values,
        }
    }
}

/// One row of a core or extension file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    row_type: String,
    id: Option<String>,
    values: BTreeMap<DwcTerm, String>,
}

impl Record {
    /// Row type URI of the file this record came from.
    #[must_use]
    pub fn row_type(&self) -> &str {
        &self.row_type
    }

    /// Value of the id column (`<id>` or `<coreid>`).
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

}

impl RecordValues for Record {
    fn value(&self, term: DwcTerm) -> Option<&str> {
        self.values.value(term)
    }
}

/// A core record together with the extension rows that reference it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarRecord {
    core: Record,
    extensions: Vec<Record>,
}

impl StarRecord {
    #[must_use]
    pub fn new(core: Record, extensions: Vec<Record>) -> Self {
        Self { core, extensions }
    }

    #[must_use]
    pub fn core(&self) -> &Record {
        &self.core
    }

    /// All extension rows, in extension declaration order.
    #[must_use]
    pub fn extensions(&self) -> &[Record] {
        &self.extensions
    }

    /// Extension rows of one row type.
    pub fn extension(&self, row_type: DwcTerm) -> impl Iterator<Item = &Record> {
        self.extensions
            .iter()
            .filter(move |record| DwcTerm::from_qualified_name(&record.row_type) == Some(row_type))
    }
}

/// Field values of a star record are those of its core row.
impl RecordValues for StarRecord {
    fn value(&self, term: DwcTerm) -> Option<&str> {
        self.core.value(term)
    }
}
