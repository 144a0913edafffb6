//! Flat Darwin Core extraction.
//!
//! Reads the star records of an occurrence archive and writes one flat row
//! per selected record, optionally followed by a synthetic example copy.

pub mod check;
pub mod error;
pub mod example;
pub mod extract;
pub mod flatten;
pub mod schema;
pub mod selector;
pub mod writer;

pub use check::{ArchiveCheck, check_archive};
pub use error::{ExtractError, Result};
pub use example::{
    EXAMPLE_COLLECTION_ID, EXAMPLE_RELATIONSHIP, EXAMPLE_SUBSTITUTIONS, ExampleMetadata,
    ExampleRow, Substitution, derive_example,
};
pub use extract::{ExtractOptions, ExtractSummary, extract};
pub use flatten::{FlatRow, flatten};
pub use schema::FlatSchema;
pub use selector::{Selection, parse_allow_set};
pub use writer::{CsvRowWriter, RowSink, WriteMode};
