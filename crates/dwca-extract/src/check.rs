//! Pre-extraction archive checks.

use tracing::{debug, warn};

use dwca_ingest::Archive;
use dwca_model::{DwcTerm, EXPECTED_CORE_TERMS};

use crate::error::{ExtractError, Result};

/// Outcome of a successful archive check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveCheck {
    /// Expected core terms the archive does not declare.
    pub missing_terms: Vec<DwcTerm>,
}

/// Confirm the archive has an Occurrence core.
///
/// Expected terms the core lacks are logged and returned; they do not
/// fail the check.
pub fn check_archive(archive: &Archive) -> Result<ArchiveCheck> {
    let core = archive.core();
    debug!(
        location = %core.location.display(),
        row_type = %core.row_type,
        "core data file"
    );
    if archive.core_row_type() != Some(DwcTerm::Occurrence) {
        return Err(ExtractError::UnsupportedCore {
            path: archive.location().to_path_buf(),
            row_type: core.row_type.clone(),
        });
    }

    let missing_terms: Vec<DwcTerm> = EXPECTED_CORE_TERMS
        .iter()
        .copied()
        .filter(|term| !archive.has_core_term(*term))
        .collect();
    for term in &missing_terms {
        warn!(term = %term, "expected term not found in archive core");
    }
    Ok(ArchiveCheck { missing_terms })
}
