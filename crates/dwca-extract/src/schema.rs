//! The flat output schema.

use dwca_model::{DwcTerm, RELATIONSHIP_TERMS, flat_terms};

/// Ordered output columns for one run.
///
/// Value columns come from [`flat_terms`]; example mode appends the three
/// relationship columns that link an example row to its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatSchema {
    value_terms: Vec<DwcTerm>,
    example_mode: bool,
}

impl FlatSchema {
    #[must_use]
    pub fn new(example_mode: bool) -> Self {
        Self {
            value_terms: flat_terms(),
            example_mode,
        }
    }

    /// Columns filled from record values.
    #[must_use]
    pub fn value_terms(&self) -> &[DwcTerm] {
        &self.value_terms
    }

    /// Every output column, relationship columns included.
    pub fn terms(&self) -> impl Iterator<Item = DwcTerm> + '_ {
        let trailing: &[DwcTerm] = if self.example_mode {
            &RELATIONSHIP_TERMS
        } else {
            &[]
        };
        self.value_terms.iter().chain(trailing).copied()
    }

    /// Header names, one per output column.
    #[must_use]
    pub fn headers(&self) -> Vec<&'static str> {
        self.terms().map(DwcTerm::simple_name).collect()
    }

    /// Width of every output row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.value_terms.len() + self.trailing_len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn example_mode(&self) -> bool {
        self.example_mode
    }

    pub(crate) fn trailing_len(&self) -> usize {
        if self.example_mode {
            RELATIONSHIP_TERMS.len()
        } else {
            0
        }
    }
}
