//! Per-asset outcome and run totals.

use crate::error::ErrorKind;
use crate::manifest::AssetDescriptor;
use std::fmt;

/// Terminal state of one descriptor. Each descriptor reaches exactly one per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// Destination already held a non-empty file; no request was made.
    Skipped,
    /// Downloaded and written. `digest_prefix` is for the audit log only.
    Fetched { digest_prefix: String, bytes: u64 },
    /// Network or filesystem error; the destination was not written.
    Failed { kind: ErrorKind, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub descriptor: AssetDescriptor,
    pub status: FetchStatus,
}

impl FetchResult {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, FetchStatus::Failed { .. })
    }
}

/// Human audit line for the result.
impl fmt::Display for FetchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.descriptor;
        match &self.status {
            FetchStatus::Skipped => write!(f, "skipped {} (already present)", d.destination.display()),
            FetchStatus::Fetched { digest_prefix, .. } => write!(
                f,
                "fetched {} -> {} sha256:{}",
                d.source_url,
                d.destination.display(),
                digest_prefix
            ),
            FetchStatus::Failed { error, .. } => {
                write!(f, "WARN: failed to fetch {}: {}", d.source_url, error)
            }
        }
    }
}

/// Totals for one vendoring pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub fetched: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_results(results: &[FetchResult]) -> Self {
        results.iter().fold(Self::default(), |mut s, r| {
            match r.status {
                FetchStatus::Skipped => s.skipped += 1,
                FetchStatus::Fetched { .. } => s.fetched += 1,
                FetchStatus::Failed { .. } => s.failed += 1,
            }
            s
        })
    }

    pub fn total(&self) -> usize {
        self.fetched + self.skipped + self.failed
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fetched, {} skipped, {} failed",
            self.fetched, self.skipped, self.failed
        )
    }
}
