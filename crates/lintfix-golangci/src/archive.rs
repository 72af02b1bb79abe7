//! Extracting the analyzer executable from a release archive.

use crate::error::ProvisionError;
use crate::provision::{CopyOutcome, ProvisionListener, copy_with_progress};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Release archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// `.zip` (Windows releases).
    Zip,
    /// `.tar.gz` (everything else).
    TarGz,
}

impl ArchiveFormat {
    /// File suffix without the leading dot.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
        }
    }
}

/// Extract the entry named `executable` (any directory) from `archive` into `target`.
///
/// Progress is reported as the fraction of the entry written. The entry is staged next to
/// `target` and moved over it once complete, so a cancelled or failed extraction leaves any
/// existing `target` as it was.
pub(crate) fn extract_executable(
    format: ArchiveFormat,
    archive: &Path,
    executable: &str,
    target: &Path,
    chunk_size: usize,
    listener: &mut dyn ProvisionListener,
) -> Result<CopyOutcome, ProvisionError> {
    let reader = BufReader::new(File::open(archive)?);
    match format {
        ArchiveFormat::TarGz => extract_tar_gz(reader, executable, target, chunk_size, listener),
        ArchiveFormat::Zip => extract_zip(reader, executable, target, chunk_size, listener),
    }
}

fn is_executable_entry(path: &Path, executable: &str) -> bool {
    path.file_name().is_some_and(|name| name == executable)
}

fn extract_tar_gz<R: Read>(
    reader: R,
    executable: &str,
    target: &Path,
    chunk_size: usize,
    listener: &mut dyn ProvisionListener,
) -> Result<CopyOutcome, ProvisionError> {
    let mut archive = tar::Archive::new(GzDecoder::new(reader));
    for entry in archive.entries()? {
        if listener.is_cancelled() {
            return Ok(CopyOutcome::Cancelled(0));
        }
        let mut entry = entry?;
        if !entry.header().entry_type().is_file()
            || !is_executable_entry(&entry.path()?, executable)
        {
            continue;
        }
        let size = entry.size();
        return write_target(&mut entry, size, target, chunk_size, listener);
    }
    Err(ProvisionError::MissingExecutable(executable.to_string()))
}

fn extract_zip<R: Read + io::Seek>(
    reader: R,
    executable: &str,
    target: &Path,
    chunk_size: usize,
    listener: &mut dyn ProvisionListener,
) -> Result<CopyOutcome, ProvisionError> {
    let mut archive = zip::ZipArchive::new(reader)?;
    for index in 0..archive.len() {
        if listener.is_cancelled() {
            return Ok(CopyOutcome::Cancelled(0));
        }
        let mut entry = archive.by_index(index)?;
        if !entry.is_file() || !is_executable_entry(Path::new(entry.name()), executable) {
            continue;
        }
        let size = entry.size();
        return write_target(&mut entry, size, target, chunk_size, listener);
    }
    Err(ProvisionError::MissingExecutable(executable.to_string()))
}

fn write_target(
    entry: &mut dyn Read,
    size: u64,
    target: &Path,
    chunk_size: usize,
    listener: &mut dyn ProvisionListener,
) -> Result<CopyOutcome, ProvisionError> {
    let dir = ensure_parent(target)?;
    let staged = NamedTempFile::new_in(&dir).map_err(|err| permission_error(&dir, err))?;
    let mut out = BufWriter::new(staged);
    let outcome = copy_with_progress(entry, &mut out, size, chunk_size, listener)?;
    let staged = out.into_inner().map_err(io::IntoInnerError::into_error)?;

    // Dropping the staged file removes it; `target` is only replaced by a complete entry.
    match outcome {
        CopyOutcome::Completed(_) => {
            staged
                .persist(target)
                .map_err(|err| permission_error(target, err.error))?;
        }
        CopyOutcome::Cancelled(bytes) => {
            tracing::debug!(bytes, target = %target.display(), "extraction cancelled");
        }
    }
    Ok(outcome)
}

/// Create (or truncate) the destination file, creating parent directories.
pub(crate) fn create_target(path: &Path) -> Result<File, ProvisionError> {
    ensure_parent(path)?;
    File::create(path).map_err(|err| permission_error(path, err))
}

/// Create the directory `path` will live in and return it.
fn ensure_parent(path: &Path) -> Result<PathBuf, ProvisionError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|err| permission_error(&parent, err))?;
    Ok(parent)
}

fn permission_error(path: &Path, err: io::Error) -> ProvisionError {
    if err.kind() == io::ErrorKind::PermissionDenied {
        ProvisionError::PermissionDenied {
            path: path.to_path_buf(),
        }
    } else {
        ProvisionError::Io(err)
    }
}
