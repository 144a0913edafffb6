//! Archive unpacking.
//!
//! A Darwin Core Archive arrives either as a directory that is already laid
//! out or as a zip package. Zip packages are expanded once into a sibling
//! `<name>_content` directory under the work directory and reused afterwards.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ArchiveError, Result};

/// Environment variable for overriding the unzip work directory.
pub const WORK_DIR_ENV_VAR: &str = "DWCA_WORK_DIR";

/// Get the default work directory for expanded archives.
///
/// Checks the `DWCA_WORK_DIR` environment variable first, then falls back
/// to the current directory.
pub fn default_work_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(WORK_DIR_ENV_VAR) {
        return PathBuf::from(dir);
    }
    PathBuf::from(".")
}

/// Directory a zip package expands into: `dwca.zip` becomes `dwca_zip_content`.
pub fn extraction_dir(archive: &Path, work_dir: &Path) -> PathBuf {
    let name = archive
        .file_name()
        .map(|name| name.to_string_lossy().replace('.', "_"))
        .unwrap_or_else(|| "archive".to_string());
    work_dir.join(format!("{name}_content"))
}

/// Resolve an input path to a directory ready to be opened as an archive.
///
/// Directories are returned unchanged. Files are unzipped, unless the
/// extraction directory already exists from an earlier run.
pub fn resolve_archive_dir(input: &Path, work_dir: &Path) -> Result<PathBuf> {
    if !input.exists() {
        return Err(ArchiveError::NotFound {
            path: input.to_path_buf(),
        });
    }
    if input.is_dir() {
        return Ok(input.to_path_buf());
    }

    let target = extraction_dir(input, work_dir);
    if target.exists() {
        debug!(path = %target.display(), "reusing expanded archive");
        return Ok(target);
    }

    match unzip_archive(input, &target) {
        Ok(count) => {
            info!(
                archive = %input.display(),
                path = %target.display(),
                file_count = count,
                "unzipped archive"
            );
            Ok(target)
        }
        Err(error) => {
            // A half-written directory would be reused by the next run.
            let _ = fs::remove_dir_all(&target);
            Err(error)
        }
    }
}

/// Expand a zip package into `target`, returning the number of files written.
///
/// Entries whose names would escape `target` are skipped.
pub fn unzip_archive(archive: &Path, target: &Path) -> Result<usize> {
    let file = File::open(archive).map_err(|e| ArchiveError::io(archive, e))?;
    let mut zip = zip::ZipArchive::new(file).map_err(|source| ArchiveError::Zip {
        path: archive.to_path_buf(),
        source,
    })?;
    fs::create_dir_all(target).map_err(|e| ArchiveError::io(target, e))?;

    let mut written = 0usize;
    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(|source| ArchiveError::Zip {
            path: archive.to_path_buf(),
            source,
        })?;
        let Some(relative) = entry.enclosed_name() else {
            warn!(entry = entry.name(), "skipping zip entry outside archive root");
            continue;
        };
        let dest = target.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&dest).map_err(|e| ArchiveError::io(&dest, e))?;
            continue;
        }
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| ArchiveError::io(parent, e))?;
        }
        let mut out = File::create(&dest).map_err(|e| ArchiveError::io(&dest, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| ArchiveError::io(&dest, e))?;
        written += 1;
    }
    Ok(written)
}
