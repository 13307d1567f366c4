//! Destination file lifecycle.
//!
//! Presence checks for the idempotency short-circuit, parent directory
//! creation, and whole-file writes that land via a `.part` temp file and an
//! atomic rename so a destination is never left truncated.

mod writer;

use crate::error::VendError;
use std::io;
use std::path::{Path, PathBuf};

pub use writer::PartFile;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.css` → `a.css.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// State of a destination path on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Nothing there, or not a regular file.
    Missing,
    /// Zero-byte file, left behind by an interrupted run. Must be refetched.
    Empty,
    /// Regular file with the given non-zero size.
    Present(u64),
}

impl Presence {
    /// True when the destination satisfies the idempotency check.
    pub fn is_satisfied(self) -> bool {
        matches!(self, Presence::Present(_))
    }
}

/// Inspect `path`. `NotFound` maps to `Missing`; other metadata errors are returned.
pub fn presence(path: &Path) -> io::Result<Presence> {
    match std::fs::metadata(path) {
        Ok(m) if !m.is_file() => Ok(Presence::Missing),
        Ok(m) if m.len() == 0 => Ok(Presence::Empty),
        Ok(m) => Ok(Presence::Present(m.len())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Presence::Missing),
        Err(e) => Err(e),
    }
}

/// Create every missing parent directory of `path`. Succeeds if they already exist.
pub fn ensure_parent(path: &Path) -> Result<(), VendError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::fs::create_dir_all(dir).map_err(|e| VendError::fs(dir, e))
        }
        _ => Ok(()),
    }
}

/// Write `data` to `final_path` in one piece: temp file, fsync, rename.
/// On failure the temp file is removed and `final_path` is left untouched.
pub fn write_atomic(final_path: &Path, data: &[u8]) -> Result<(), VendError> {
    let part = PartFile::create(&temp_path(final_path))?;
    match part.write_all(data) {
        Ok(part) => part.finalize(final_path),
        Err((part, e)) => {
            part.discard();
            Err(e)
        }
    }
}
