//! SHA-256 helpers: the short audit digest logged for each fetched asset,
//! and a full-file digest for the `checksum` command.
//!
//! Digests are informational. Nothing here compares against a pinned value.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Number of hex characters kept in the audit digest.
pub const DIGEST_PREFIX_LEN: usize = 12;

/// SHA-256 of `data` as lowercase hex.
pub fn sha256_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// First `DIGEST_PREFIX_LEN` hex chars of the SHA-256 of `data`.
pub fn digest_prefix(data: &[u8]) -> String {
    let mut hex = sha256_bytes(data);
    hex.truncate(DIGEST_PREFIX_LEN);
    hex
}

/// Compute SHA-256 of a file and return the digest as lowercase hex.
/// Reads in chunks so large vendored bundles don't need to fit in memory.
pub fn sha256_path(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
