//! Temp file that becomes the destination only once fully written.

use crate::error::VendError;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Open `.part` file for one asset. Consumed by `finalize` or `discard`.
pub struct PartFile {
    file: File,
    temp_path: PathBuf,
}

impl PartFile {
    /// Create (or truncate) the temp file at `temp_path`.
    pub fn create(temp_path: &Path) -> Result<Self, VendError> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)
            .map_err(|e| VendError::fs(temp_path, e))?;
        Ok(PartFile {
            file,
            temp_path: temp_path.to_path_buf(),
        })
    }

    /// Write the whole body. Hands the file back on error so the caller can discard it.
    pub fn write_all(mut self, data: &[u8]) -> Result<Self, (Self, VendError)> {
        match self.file.write_all(data).and_then(|()| self.file.sync_all()) {
            Ok(()) => Ok(self),
            Err(e) => {
                let err = VendError::fs(&self.temp_path, e);
                Err((self, err))
            }
        }
    }

    /// Atomically rename the temp file onto `final_path`. Removes the temp file if the rename fails.
    pub fn finalize(self, final_path: &Path) -> Result<(), VendError> {
        let PartFile { file, temp_path } = self;
        drop(file);
        if let Err(e) = std::fs::rename(&temp_path, final_path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(VendError::fs(final_path, e));
        }
        Ok(())
    }

    /// Close and delete the temp file.
    pub fn discard(self) {
        let PartFile { file, temp_path } = self;
        drop(file);
        if let Err(e) = std::fs::remove_file(&temp_path) {
            tracing::debug!(path = %temp_path.display(), "could not remove temp file: {}", e);
        }
    }
}
