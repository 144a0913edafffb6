//! Delimited data file reading.

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

use csv::{ByteRecord, ReaderBuilder};
use encoding_rs::{Encoding, UTF_8};

use crate::error::{ArchiveError, Result};
use crate::meta::FileDescriptor;

/// Streams the rows of one data file as decoded cells.
///
/// Header lines are skipped, blank lines are dropped, and a leading
/// byte order mark is removed from the first cell.
pub struct DataFileReader {
    path: PathBuf,
    inner: csv::Reader<Box<dyn Read>>,
    encoding: &'static Encoding,
    record: ByteRecord,
    to_skip: usize,
    first: bool,
}

impl std::fmt::Debug for DataFileReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataFileReader")
            .field("path", &self.path)
            .field("encoding", &self.encoding.name())
            .finish_non_exhaustive()
    }
}

impl DataFileReader {
    /// Open the data file described by `file`, resolved against `root`.
    pub fn open(root: &Path, file: &FileDescriptor) -> Result<Self> {
        let path = root.join(&file.location);
        if !path.is_file() {
            return Err(ArchiveError::MissingDataFile { path });
        }
        let encoding = resolve_encoding(&file.encoding, &path)?;

        let handle = File::open(&path).map_err(|e| ArchiveError::io(&path, e))?;
        // Cells are decoded one at a time, which only holds when the
        // delimiters are plain ASCII bytes in the source encoding.
        let (source, encoding): (Box<dyn Read>, &'static Encoding) =
            if encoding.is_ascii_compatible() {
                (Box::new(BufReader::new(handle)), encoding)
            } else {
                let mut bytes = Vec::new();
                BufReader::new(handle)
                    .read_to_end(&mut bytes)
                    .map_err(|e| ArchiveError::io(&path, e))?;
                let (text, _, _) = encoding.decode(&bytes);
                (Box::new(Cursor::new(text.into_owned().into_bytes())), UTF_8)
            };

        let mut builder = ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .delimiter(file.field_delimiter);
        match file.quote {
            Some(quote) => builder.quote(quote),
            None => builder.quoting(false),
        };

        Ok(Self {
            path,
            inner: builder.from_reader(source),
            encoding,
            record: ByteRecord::new(),
            to_skip: file.ignore_header_lines,
            first: true,
        })
    }

    fn next_row(&mut self) -> Result<Option<Vec<String>>> {
        loop {
            let more = self
                .inner
                .read_byte_record(&mut self.record)
                .map_err(|source| ArchiveError::Csv {
                    path: self.path.clone(),
                    source,
                })?;
            if !more {
                return Ok(None);
            }

            let mut cells: Vec<String> = self
                .record
                .iter()
                .map(|bytes| {
                    let (text, _) = self.encoding.decode_without_bom_handling(bytes);
                    text.into_owned()
                })
                .collect();
            if self.first {
                self.first = false;
                if let Some(cell) = cells.first_mut()
                    && let Some(stripped) = cell.strip_prefix('\u{feff}')
                {
                    *cell = stripped.to_string();
                }
            }

            if self.to_skip > 0 {
                self.to_skip -= 1;
                continue;
            }
            if cells.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            return Ok(Some(cells));
        }
    }
}

impl Iterator for DataFileReader {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

fn resolve_encoding(label: &str, path: &Path) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| ArchiveError::UnknownEncoding {
        path: path.to_path_buf(),
        label: label.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    fn descriptor(location: &str, delimiter: u8, header_lines: usize) -> FileDescriptor {
        FileDescriptor {
            row_type: "http://rs.tdwg.org/dwc/terms/Occurrence".to_string(),
            location: PathBuf::from(location),
            encoding: "UTF-8".to_string(),
            field_delimiter: delimiter,
            quote: Some(b'"'),
            ignore_header_lines: header_lines,
            id_index: Some(0),
            fields: Vec::new(),
        }
    }

    fn rows(reader: DataFileReader) -> Vec<Vec<String>> {
        reader.map(|row| row.unwrap()).collect()
    }

    #[test]
    fn test_skips_header_and_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("occurrence.txt"),
            "\u{feff}id\toccurrenceID\n1\tocc-1\n\n2\tocc-2\n",
        )
        .unwrap();

        let reader = DataFileReader::open(dir.path(), &descriptor("occurrence.txt", b'\t', 1))
            .unwrap();
        assert_eq!(
            rows(reader),
            vec![
                vec!["1".to_string(), "occ-1".to_string()],
                vec!["2".to_string(), "occ-2".to_string()],
            ]
        );
    }

    #[test]
    fn test_bom_removed_from_first_cell() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("data.csv"), "\u{feff}1,a\n").unwrap();

        let reader = DataFileReader::open(dir.path(), &descriptor("data.csv", b',', 0)).unwrap();
        assert_eq!(rows(reader), vec![vec!["1".to_string(), "a".to_string()]]);
    }

    #[test]
    fn test_quoted_cells_keep_delimiters() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("data.csv"), "1,\"Smith, J.\"\n").unwrap();

        let reader = DataFileReader::open(dir.path(), &descriptor("data.csv", b',', 0)).unwrap();
        assert_eq!(
            rows(reader),
            vec![vec!["1".to_string(), "Smith, J.".to_string()]]
        );
    }

    #[test]
    fn test_latin1_cells_are_decoded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("data.txt"), b"1\tS\xe3o Paulo\n").unwrap();

        let mut file = descriptor("data.txt", b'\t', 0);
        file.encoding = "ISO-8859-1".to_string();
        let reader = DataFileReader::open(dir.path(), &file).unwrap();
        assert_eq!(
            rows(reader),
            vec![vec!["1".to_string(), "São Paulo".to_string()]]
        );
    }

    #[test]
    fn test_missing_file_and_unknown_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let err = DataFileReader::open(dir.path(), &descriptor("absent.txt", b'\t', 0)).unwrap_err();
        assert!(matches!(err, ArchiveError::MissingDataFile { .. }));

        fs::write(dir.path().join("data.txt"), "1\n").unwrap();
        let mut file = descriptor("data.txt", b'\t', 0);
        file.encoding = "klingon".to_string();
        let err = DataFileReader::open(dir.path(), &file).unwrap_err();
        assert!(matches!(err, ArchiveError::UnknownEncoding { .. }));
    }
}
