//! Opening archive directories and iterating star records.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use dwca_model::DwcTerm;

use crate::error::{ArchiveError, Result};
use crate::meta::{ArchiveDescriptor, FieldDescriptor, FileDescriptor, META_FILE, read_descriptor};
use crate::reader::DataFileReader;
use crate::record::{Record, RecordLayout, StarRecord};

/// Data file extensions considered when an archive has no descriptor.
const DATA_FILE_EXTENSIONS: &[&str] = &["txt", "csv", "tab", "tsv"];

/// Id terms that identify the row type of a descriptor-less data file.
const ROW_TYPE_ID_TERMS: [(DwcTerm, DwcTerm); 3] = [
    (DwcTerm::OccurrenceId, DwcTerm::Occurrence),
    (DwcTerm::TaxonId, DwcTerm::Taxon),
    (DwcTerm::EventId, DwcTerm::Event),
];

/// An opened Darwin Core Archive directory.
#[derive(Debug, Clone)]
pub struct Archive {
    root: PathBuf,
    descriptor: ArchiveDescriptor,
}

impl Archive {
    /// Open an archive laid out in `dir`.
    ///
    /// Uses `meta.xml` when present. Without one, a directory holding a
    /// single delimited file is read as a core-only archive whose header
    /// row names the terms.
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(ArchiveError::UnsupportedArchive {
                path: dir.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }

        let meta = dir.join(META_FILE);
        let descriptor = if meta.is_file() {
            read_descriptor(&meta)?
        } else {
            infer_descriptor(dir)?
        };
        debug!(
            path = %dir.display(),
            core = %descriptor.core.row_type,
            extensions = descriptor.extensions.len(),
            "opened archive"
        );
        Ok(Self {
            root: dir.to_path_buf(),
            descriptor,
        })
    }

    /// Open `dir`, or the first subdirectory (by name) that opens, when
    /// `dir` itself is not laid out as an archive.
    ///
    /// Zip packages often wrap the archive in a single top-level folder.
    /// If no subdirectory opens either, the error for `dir` is returned.
    pub fn open_with_fallback(dir: &Path) -> Result<Self> {
        let error = match Self::open(dir) {
            Ok(archive) => return Ok(archive),
            Err(error) if error.is_unrecognized() => error,
            Err(error) => return Err(error),
        };
        warn!(path = %dir.display(), %error, "not an archive, trying subdirectories");

        let mut children: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|e| ArchiveError::io(dir, e))?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        children.sort();

        for child in children {
            match Self::open(&child) {
                Ok(archive) => {
                    info!(path = %child.display(), "opened archive in subdirectory");
                    return Ok(archive);
                }
                Err(child_error) => {
                    debug!(path = %child.display(), error = %child_error, "subdirectory is not an archive");
                }
            }
        }
        Err(error)
    }

    /// Directory the archive was opened from.
    #[must_use]
    pub fn location(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn descriptor(&self) -> &ArchiveDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn core(&self) -> &FileDescriptor {
        &self.descriptor.core
    }

    #[must_use]
    pub fn extensions(&self) -> &[FileDescriptor] {
        &self.descriptor.extensions
    }

    /// Row type of the core file, when it is a Darwin Core class.
    #[must_use]
    pub fn core_row_type(&self) -> Option<DwcTerm> {
        self.descriptor.core.row_type_term()
    }

    #[must_use]
    pub fn has_core_term(&self, term: DwcTerm) -> bool {
        self.descriptor.core.has_term(term)
    }

    /// Iterate core records in file order, each joined with its extension rows.
    ///
    /// Extension files are read up front and indexed by core id.
    pub fn star_records(&self) -> Result<StarRecords> {
        let mut extensions = Vec::with_capacity(self.descriptor.extensions.len());
        for file in &self.descriptor.extensions {
            extensions.push(ExtensionIndex::load(&self.root, file)?);
        }
        Ok(StarRecords {
            core: DataFileReader::open(&self.root, &self.descriptor.core)?,
            layout: RecordLayout::new(&self.descriptor.core),
            extensions,
        })
    }
}

/// Extension rows grouped by the core id they reference.
#[derive(Debug)]
struct ExtensionIndex {
    rows: HashMap<String, Vec<Record>>,
}

impl ExtensionIndex {
    fn load(root: &Path, file: &FileDescriptor) -> Result<Self> {
        let layout = RecordLayout::new(file);
        let mut rows: HashMap<String, Vec<Record>> = HashMap::new();
        let mut orphans = 0usize;
        for cells in DataFileReader::open(root, file)? {
            let record = layout.record(&cells?);
            match record.id() {
                Some(id) => rows.entry(id.to_string()).or_default().push(record),
                None => orphans += 1,
            }
        }
        if orphans > 0 {
            warn!(
                file = %file.location.display(),
                count = orphans,
                "extension rows without a core id were skipped"
            );
        }
        Ok(Self { rows })
    }

    /// Rows for `id`. Each group is handed out once.
    fn take(&mut self, id: &str) -> Vec<Record> {
        self.rows.remove(id).unwrap_or_default()
    }
}

/// Iterator over the star records of an archive.
#[derive(Debug)]
pub struct StarRecords {
    core: DataFileReader,
    layout: RecordLayout,
    extensions: Vec<ExtensionIndex>,
}

impl Iterator for StarRecords {
    type Item = Result<StarRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let cells = match self.core.next()? {
            Ok(cells) => cells,
            Err(error) => return Some(Err(error)),
        };
        let core = self.layout.record(&cells);
        let extensions = match core.id() {
            Some(id) => self
                .extensions
                .iter_mut()
                .flat_map(|index| index.take(id))
                .collect(),
            None => Vec::new(),
        };
        Some(Ok(StarRecord::new(core, extensions)))
    }
}

/// Build a descriptor for a directory holding exactly one delimited file.
fn infer_descriptor(dir: &Path) -> Result<ArchiveDescriptor> {
    let unsupported = |reason: String| ArchiveError::UnsupportedArchive {
        path: dir.to_path_buf(),
        reason,
    };

    let mut candidates: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| ArchiveError::io(dir, e))?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_data_file(path))
        .collect();
    candidates.sort();

    let data_file = match candidates.as_slice() {
        [single] => single.clone(),
        [] => return Err(unsupported(format!("no {META_FILE} and no data file"))),
        _ => {
            return Err(unsupported(format!(
                "no {META_FILE} and {} candidate data files",
                candidates.len()
            )));
        }
    };
    let location = PathBuf::from(data_file.file_name().unwrap_or_default());

    let mut core = FileDescriptor {
        row_type: String::new(),
        location,
        encoding: "UTF-8".to_string(),
        field_delimiter: sniff_delimiter(&data_file)?,
        quote: Some(b'"'),
        ignore_header_lines: 0,
        id_index: None,
        fields: Vec::new(),
    };
    let header = DataFileReader::open(dir, &core)?
        .next()
        .transpose()?
        .ok_or_else(|| unsupported(format!("{} is empty", data_file.display())))?;

    core.fields = header
        .iter()
        .enumerate()
        .map(|(index, name)| FieldDescriptor {
            term: DwcTerm::from_qualified_name(name)
                .map_or_else(|| name.trim().to_string(), DwcTerm::qualified_name),
            index: Some(index),
            default: None,
        })
        .collect();

    let (id_term, row_type) = ROW_TYPE_ID_TERMS
        .iter()
        .copied()
        .find(|(id_term, _)| core.has_term(*id_term))
        .ok_or_else(|| {
            unsupported(format!(
                "cannot infer row type of {} from its header",
                data_file.display()
            ))
        })?;
    core.id_index = core.field(id_term).and_then(|field| field.index);
    core.row_type = row_type.qualified_name();
    core.ignore_header_lines = 1;

    info!(
        file = %core.location.display(),
        row_type = %row_type,
        "no descriptor, inferred core from header"
    );
    Ok(ArchiveDescriptor {
        core,
        extensions: Vec::new(),
        metadata: None,
    })
}

fn is_data_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            DATA_FILE_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
}

/// Tab when the first line contains one, otherwise comma.
fn sniff_delimiter(path: &Path) -> Result<u8> {
    let file = File::open(path).map_err(|e| ArchiveError::io(path, e))?;
    let mut line = String::new();
    BufReader::new(file)
        .read_line(&mut line)
        .map_err(|e| ArchiveError::io(path, e))?;
    Ok(if line.contains('\t') { b'\t' } else { b',' })
}
