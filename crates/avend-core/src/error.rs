//! Per-asset error type and its coarse classification for log fields.

use std::path::PathBuf;
use thiserror::Error;

/// Coarse class of a per-asset failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection failure, timeout, non-2xx or empty response.
    Network,
    /// Directory creation, temp write or rename failed.
    Filesystem,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::Filesystem => "filesystem",
        }
    }
}

/// Error produced while vendoring a single asset. Always recovered at the
/// per-asset boundary and turned into a `Failed` result.
#[derive(Debug, Error)]
pub enum VendError {
    /// Curl reported an error (resolve, connect, TLS, timeout).
    #[error("{0}")]
    Network(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// 2xx response without any body bytes.
    #[error("empty response body")]
    EmptyBody,
    /// Local filesystem operation failed.
    #[error("{}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl VendError {
    pub(crate) fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VendError::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            VendError::Network(_) | VendError::Http(_) | VendError::EmptyBody => ErrorKind::Network,
            VendError::Filesystem { .. } => ErrorKind::Filesystem,
        }
    }
}
