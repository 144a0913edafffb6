//! Value lookup over a single data record.

use std::collections::BTreeMap;

use crate::terms::DwcTerm;

/// Read access to the values of one primary-table row.
///
/// Missing columns and blank cells both read as `None`; callers treat
/// absence as an ordinary empty value.
pub trait RecordValues {
    fn value(&self, term: DwcTerm) -> Option<&str>;

    /// The record's `occurrenceID`, used as its primary identifier.
    fn occurrence_id(&self) -> Option<&str> {
        self.value(DwcTerm::OccurrenceId)
    }
}

impl RecordValues for BTreeMap<DwcTerm, String> {
    fn value(&self, term: DwcTerm) -> Option<&str> {
        self.get(&term)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

impl<T: RecordValues + ?Sized> RecordValues for &T {
    fn value(&self, term: DwcTerm) -> Option<&str> {
        (**self).value(term)
    }
}
