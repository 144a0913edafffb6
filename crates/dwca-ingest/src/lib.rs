//! Darwin Core Archive reading.
//!
//! An archive is a directory (usually shipped as a zip package) holding a
//! core data file, optional extension files keyed to core rows, and a
//! `meta.xml` descriptor mapping columns to terms.

pub mod archive;
pub mod error;
pub mod meta;
pub mod reader;
pub mod record;
pub mod unpack;

pub use archive::{Archive, StarRecords};
pub use error::{ArchiveError, Result};
pub use meta::{
    ArchiveDescriptor, FieldDescriptor, FileDescriptor, META_FILE, parse_descriptor,
    read_descriptor,
};
pub use reader::DataFileReader;
pub use record::{Record, RecordLayout, StarRecord};
pub use unpack::{
    WORK_DIR_ENV_VAR, default_work_dir, extraction_dir, resolve_archive_dir, unzip_archive,
};
