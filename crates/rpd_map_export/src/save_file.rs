//! Atomic file writes
//!
//! Output is staged in a temporary file next to the destination and renamed
//! over it on [`SaveFile::commit`]. Dropping a `SaveFile` without committing
//! deletes the temporary file and leaves the destination untouched.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::ExportError;

/// A file that only replaces its destination when committed
#[derive(Debug)]
pub struct SaveFile {
    path: PathBuf,
    temp: NamedTempFile,
}

impl SaveFile {
    /// Stage a new file for `path`
    pub fn create(path: &Path) -> Result<Self, ExportError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let temp = tempfile::Builder::new()
            .prefix(".rpd_save")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(ExportError::Open)?;

        // Keep the permissions of a file we are about to replace
        if let Ok(metadata) = fs::metadata(path) {
            if metadata.is_file() {
                temp.as_file()
                    .set_permissions(metadata.permissions())
                    .map_err(ExportError::Open)?;
            }
        }

        debug!("Staging {:?} in {:?}", path, temp.path());
        Ok(Self {
            path: path.to_path_buf(),
            temp,
        })
    }

    /// Destination path
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_all(&mut self, bytes: &[u8]) -> Result<(), ExportError> {
        self.temp.write_all(bytes).map_err(ExportError::Write)
    }

    /// Flush, sync and move the staged file over the destination
    pub fn commit(self) -> Result<(), ExportError> {
        let SaveFile { path, mut temp } = self;

        temp.flush().map_err(ExportError::Write)?;
        temp.as_file().sync_all().map_err(ExportError::Write)?;
        temp.persist(&path).map_err(|e| ExportError::Commit(e.error))?;

        debug!("Committed {:?}", path);
        Ok(())
    }
}
