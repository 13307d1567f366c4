//! Resolve a single descriptor: ensure-dir, presence check, fetch, write, digest.

use crate::checksum;
use crate::error::VendError;
use crate::fetch::Fetch;
use crate::manifest::AssetDescriptor;
use crate::storage::{self, Presence};

use super::result::{FetchResult, FetchStatus};

/// Process one descriptor. Every error is caught here and becomes `Failed`.
pub(crate) fn vend_one<F: Fetch + ?Sized>(desc: &AssetDescriptor, fetcher: &F) -> FetchResult {
    let status = match try_vend_one(desc, fetcher) {
        Ok(status) => status,
        Err(e) => {
            tracing::warn!(
                url = %desc.source_url,
                path = %desc.destination.display(),
                kind = e.kind().as_str(),
                "fetch failed: {}",
                e
            );
            FetchStatus::Failed {
                kind: e.kind(),
                error: e.to_string(),
            }
        }
    };
    FetchResult {
        descriptor: desc.clone(),
        status,
    }
}

fn try_vend_one<F: Fetch + ?Sized>(
    desc: &AssetDescriptor,
    fetcher: &F,
) -> Result<FetchStatus, VendError> {
    let dest = &desc.destination;
    storage::ensure_parent(dest)?;

    let presence = storage::presence(dest).map_err(|e| VendError::fs(dest, e))?;
    if presence.is_satisfied() {
        tracing::debug!(path = %dest.display(), ?presence, "already present, skipping");
        return Ok(FetchStatus::Skipped);
    }
    if presence == Presence::Empty {
        tracing::debug!(path = %dest.display(), "zero-byte file at destination, refetching");
    }

    let body = fetcher.fetch(&desc.source_url)?;
    storage::write_atomic(dest, &body)?;

    let digest_prefix = checksum::digest_prefix(&body);
    tracing::info!(
        url = %desc.source_url,
        path = %dest.display(),
        bytes = body.len(),
        sha256 = %digest_prefix,
        "fetched"
    );
    Ok(FetchStatus::Fetched {
        digest_prefix,
        bytes: body.len() as u64,
    })
}
