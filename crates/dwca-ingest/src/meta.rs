//! `meta.xml` descriptor parsing.
//!
//! The descriptor names the core data file, its extensions, and how the
//! columns of each file map onto terms:
//!
//! ```xml
//! <archive metadata="eml.xml">
//!   <core rowType="http://rs.tdwg.org/dwc/terms/Occurrence"
//!         fieldsTerminatedBy="\t" fieldsEnclosedBy="" ignoreHeaderLines="1">
//!     <files><location>occurrence.txt</location></files>
//!     <id index="0"/>
//!     <field index="1" term="http://rs.tdwg.org/dwc/terms/occurrenceID"/>
//!     <field term="http://rs.tdwg.org/dwc/terms/basisOfRecord" default="PreservedSpecimen"/>
//!   </core>
//! </archive>
//! ```

use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use dwca_model::DwcTerm;

use crate::error::{ArchiveError, Result};

/// Descriptor file name at the archive root.
pub const META_FILE: &str = "meta.xml";

const DEFAULT_ENCODING: &str = "UTF-8";

/// One `<field>` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Term URI as written in the descriptor.
    pub term: String,
    /// Zero-based column, absent for constant fields.
    pub index: Option<usize>,
    /// Value used when the column is absent or blank.
    pub default: Option<String>,
}

impl FieldDescriptor {
    #[must_use]
    pub fn dwc_term(&self) -> Option<DwcTerm> {
        DwcTerm::from_qualified_name(&self.term)
    }
}

/// A `<core>` or `<extension>` data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub row_type: String,
    /// Path relative to the archive root.
    pub location: PathBuf,
    pub encoding: String,
    pub field_delimiter: u8,
    /// Quote character, `None` when fields are never enclosed.
    pub quote: Option<u8>,
    pub ignore_header_lines: usize,
    /// Column holding the record id (`<id>` for the core, `<coreid>` for extensions).
    pub id_index: Option<usize>,
    pub fields: Vec<FieldDescriptor>,
}

impl FileDescriptor {
    #[must_use]
    pub fn row_type_term(&self) -> Option<DwcTerm> {
        DwcTerm::from_qualified_name(&self.row_type)
    }

    #[must_use]
    pub fn field(&self, term: DwcTerm) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|field| field.dwc_term() == Some(term))
    }

    #[must_use]
    pub fn has_term(&self, term: DwcTerm) -> bool {
        self.field(term).is_some()
    }
}

/// Parsed `meta.xml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveDescriptor {
    pub core: FileDescriptor,
    pub extensions: Vec<FileDescriptor>,
    /// Metadata document (usually `eml.xml`), relative to the archive root.
    pub metadata: Option<String>,
}

/// Read and parse a descriptor file.
pub fn read_descriptor(path: &Path) -> Result<ArchiveDescriptor> {
    let xml = std::fs::read_to_string(path).map_err(|e| ArchiveError::io(path, e))?;
    parse_descriptor(&xml, path)
}

/// Parse descriptor XML. `path` is only used in error messages.
pub fn parse_descriptor(xml: &str, path: &Path) -> Result<ArchiveDescriptor> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut metadata = None;
    let mut core = None;
    let mut extensions = Vec::new();
    let mut current: Option<PartialFile> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ArchiveError::descriptor(path, e))?;
        match event {
            Event::Start(element) => match element.local_name().as_ref() {
                b"archive" => metadata = attribute(&reader, &element, "metadata", path)?,
                b"core" | b"extension" => {
                    current = Some(PartialFile::start(&reader, &element, path)?);
                }
                b"location" => {
                    let raw = reader
                        .read_text(element.name())
                        .map_err(|e| ArchiveError::descriptor(path, e))?;
                    let text = unescape(&raw).map_err(|e| ArchiveError::descriptor(path, e))?;
                    if let Some(file) = current.as_mut() {
                        file.locations.push(text.trim().to_string());
                    }
                }
                _ => column_element(&reader, &element, current.as_mut(), path)?,
            },
            Event::Empty(element) => match element.local_name().as_ref() {
                b"core" | b"extension" => {
                    return Err(ArchiveError::descriptor(
                        path,
                        "data file element has no <files> location",
                    ));
                }
                _ => column_element(&reader, &element, current.as_mut(), path)?,
            },
            Event::End(element) => match element.local_name().as_ref() {
                b"core" => {
                    if core.is_some() {
                        return Err(ArchiveError::descriptor(path, "more than one <core>"));
                    }
                    core = current.take().map(|file| file.finish(path)).transpose()?;
                }
                b"extension" => {
                    if let Some(file) = current.take() {
                        extensions.push(file.finish(path)?);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    let core = core.ok_or_else(|| ArchiveError::descriptor(path, "no <core> element"))?;
    Ok(ArchiveDescriptor {
        core,
        extensions,
        metadata,
    })
}

/// Handle `<id>`, `<coreid>` and `<field>` whether written self-closing or not.
fn column_element(
    reader: &Reader<&[u8]>,
    element: &BytesStart<'_>,
    current: Option<&mut PartialFile>,
    path: &Path,
) -> Result<()> {
    let Some(file) = current else {
        return Ok(());
    };
    match element.local_name().as_ref() {
        b"id" | b"coreid" => {
            file.id_index = attribute(reader, element, "index", path)?
                .map(|raw| parse_index(&raw, path))
                .transpose()?;
        }
        b"field" => {
            let term = attribute(reader, element, "term", path)?
                .ok_or_else(|| ArchiveError::descriptor(path, "<field> without term"))?;
            let index = attribute(reader, element, "index", path)?
                .map(|raw| parse_index(&raw, path))
                .transpose()?;
            let default = attribute(reader, element, "default", path)?;
            file.fields.push(FieldDescriptor {
                term,
                index,
                default,
            });
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Default)]
struct PartialFile {
    row_type: Option<String>,
    encoding: Option<String>,
    field_delimiter: Option<String>,
    quote: Option<String>,
    ignore_header_lines: Option<String>,
    locations: Vec<String>,
    id_index: Option<usize>,
    fields: Vec<FieldDescriptor>,
}

impl PartialFile {
    fn start(reader: &Reader<&[u8]>, element: &BytesStart<'_>, path: &Path) -> Result<Self> {
        Ok(Self {
            row_type: attribute(reader, element, "rowType", path)?,
            encoding: attribute(reader, element, "encoding", path)?,
            field_delimiter: attribute(reader, element, "fieldsTerminatedBy", path)?,
            quote: attribute(reader, element, "fieldsEnclosedBy", path)?,
            ignore_header_lines: attribute(reader, element, "ignoreHeaderLines", path)?,
            ..Self::default()
        })
    }

    fn finish(self, path: &Path) -> Result<FileDescriptor> {
        let row_type = self
            .row_type
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ArchiveError::descriptor(path, "data file without rowType"))?;
        let location = self
            .locations
            .into_iter()
            .find(|value| !value.is_empty())
            .ok_or_else(|| {
                ArchiveError::descriptor(path, format!("no file location for {row_type}"))
            })?;

        let field_delimiter = match self.field_delimiter.as_deref() {
            None => b',',
            Some(raw) => single_byte(raw, path)?.ok_or_else(|| {
                ArchiveError::descriptor(path, "fieldsTerminatedBy must not be empty")
            })?,
        };
        let quote = match self.quote.as_deref() {
            None => Some(b'"'),
            Some(raw) => single_byte(raw, path)?,
        };
        let ignore_header_lines = self
            .ignore_header_lines
            .as_deref()
            .map(|raw| parse_index(raw, path))
            .transpose()?
            .unwrap_or(0);

        Ok(FileDescriptor {
            row_type: row_type.trim().to_string(),
            location: PathBuf::from(location),
            encoding: self
                .encoding
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ENCODING.to_string()),
            field_delimiter,
            quote,
            ignore_header_lines,
            id_index: self.id_index,
            fields: self.fields,
        })
    }
}

fn attribute(
    reader: &Reader<&[u8]>,
    element: &BytesStart<'_>,
    name: &str,
    path: &Path,
) -> Result<Option<String>> {
    let Some(attr) = element
        .try_get_attribute(name)
        .map_err(|e| ArchiveError::descriptor(path, e))?
    else {
        return Ok(None);
    };
    let value = attr
        .decode_and_unescape_value(reader.decoder())
        .map_err(|e| ArchiveError::descriptor(path, e))?;
    Ok(Some(value.into_owned()))
}

fn parse_index(raw: &str, path: &Path) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| ArchiveError::descriptor(path, format!("invalid index '{raw}'")))
}

/// Decode a delimiter attribute written with backslash escapes (`\t`, `\n`).
///
/// Returns `None` for an empty attribute.
fn single_byte(raw: &str, path: &Path) -> Result<Option<u8>> {
    let decoded = unescape_delimiter(raw);
    match decoded.as_bytes() {
        [] => Ok(None),
        [byte] => Ok(Some(*byte)),
        _ => Err(ArchiveError::descriptor(
            path,
            format!("delimiter '{raw}' is not a single byte"),
        )),
    }
}

fn unescape_delimiter(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
