//! Manifest load and validation errors. Any of these aborts the run at startup.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid manifest: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("manifest lists no assets")]
    Empty,
    #[error("invalid library name {0:?}")]
    LibraryName(String),
    #[error("library {library}: invalid URL {url:?}: {reason}")]
    Url {
        library: String,
        url: String,
        reason: String,
    },
    #[error("library {library}: invalid destination path {path:?}")]
    Path { library: String, path: String },
    #[error("duplicate destination {}", .0.display())]
    Duplicate(PathBuf),
}
