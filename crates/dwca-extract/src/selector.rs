//! Record selection.

use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use crate::error::{ExtractError, Result};

/// Separator between identifiers in a cherry-pick list.
pub const ALLOW_SET_SEPARATOR: char = '|';

/// Which source records are emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    /// Every record.
    #[default]
    Unlimited,
    /// The first `n` records in source order.
    MaxCount(NonZeroUsize),
    /// Records whose `occurrenceID` is in the set, in source order.
    AllowSet(BTreeSet<String>),
}

impl Selection {
    /// Build a selection from command-line style options.
    ///
    /// A limit of zero means no limit. A cherry-pick list with no usable
    /// identifiers counts as absent. Supplying both a limit and identifiers
    /// is rejected.
    pub fn from_options(limit: Option<usize>, cherry_pick: Option<&str>) -> Result<Self> {
        let allow = cherry_pick.map(parse_allow_set).unwrap_or_default();
        let limit = limit.and_then(NonZeroUsize::new);
        match (limit, allow.is_empty()) {
            (Some(limit), false) => Err(ExtractError::ConflictingSelection {
                limit: limit.get(),
            }),
            (Some(limit), true) => Ok(Self::MaxCount(limit)),
            (None, false) => Ok(Self::AllowSet(allow)),
            (None, true) => Ok(Self::Unlimited),
        }
    }

    /// Whether a record with `id` should be emitted, given `emitted` records so far.
    ///
    /// Identifiers match exactly and case-sensitively.
    #[must_use]
    pub fn should_include(&self, id: Option<&str>, emitted: usize) -> bool {
        match self {
            Self::Unlimited => true,
            Self::MaxCount(max) => emitted < max.get(),
            Self::AllowSet(allow) => id.is_some_and(|id| allow.contains(id)),
        }
    }

    /// True once no further record can be emitted, so the source need not
    /// be read any further.
    #[must_use]
    pub fn is_exhausted(&self, emitted: usize) -> bool {
        match self {
            Self::MaxCount(max) => emitted >= max.get(),
            Self::Unlimited | Self::AllowSet(_) => false,
        }
    }
}

/// Split a `|`-delimited identifier list, dropping empty segments.
#[must_use]
pub fn parse_allow_set(raw: &str) -> BTreeSet<String> {
    raw.split(ALLOW_SET_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
