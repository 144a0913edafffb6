//! Darwin Core vocabulary shared by the archive reader and the extraction engine.

pub mod error;
pub mod record;
pub mod terms;

pub use error::{ModelError, Result};
pub use record::RecordValues;
pub use terms::{
    DWC_NAMESPACE, DwcTerm, EXPECTED_CORE_TERMS, RELATIONSHIP_TERMS, TermGroup, flat_terms,
};
