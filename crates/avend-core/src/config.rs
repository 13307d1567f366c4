use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::engine::VendOptions;
use crate::fetch::FetchOptions;

/// Global configuration loaded from `~/.config/avend/config.toml`.
/// Every field is optional in the file; missing ones take the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvendConfig {
    /// Root of the vendored tree; each library gets a subdirectory.
    pub vendor_root: PathBuf,
    /// Manifest file. When unset the built-in manifest is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PathBuf>,
    /// Concurrent fetches (1 = sequential, in manifest order).
    pub jobs: usize,
    /// Total timeout per asset request, in seconds.
    pub timeout_secs: u64,
    /// Connect timeout per asset request, in seconds.
    pub connect_timeout_secs: u64,
    /// Exit non-zero when any asset fails. Off by default: vendoring is best-effort.
    pub strict: bool,
}

impl Default for AvendConfig {
    fn default() -> Self {
        Self {
            vendor_root: PathBuf::from("static/vendor"),
            manifest: None,
            jobs: 1,
            timeout_secs: 30,
            connect_timeout_secs: 15,
            strict: false,
        }
    }
}

impl AvendConfig {
    /// Timeouts are clamped to at least one second: libcurl reads 0 as "no timeout".
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs.max(1)),
            ..FetchOptions::default()
        }
    }

    pub fn vend_options(&self) -> VendOptions {
        VendOptions {
            jobs: self.jobs.max(1),
        }
    }
}

/// Default config location. Only computes the path; nothing is created.
pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("avend")?;
    Ok(xdg_dirs.get_config_home().join("avend").join("config.toml"))
}

/// Load configuration from the XDG config path, creating a default file if none exists.
/// An unusable config directory (unset HOME, read-only HOME) is not fatal: defaults are used.
pub fn load_or_init() -> Result<AvendConfig> {
    match config_path() {
        Ok(path) => load_or_init_at(&path),
        Err(e) => {
            tracing::warn!("no config directory ({:#}), using defaults", e);
            Ok(AvendConfig::default())
        }
    }
}

/// Like `load_or_init` for an explicit default location. An existing file that
/// cannot be read or parsed is still an error.
pub fn load_or_init_at(path: &Path) -> Result<AvendConfig> {
    if path.exists() {
        return load_from_path(path);
    }
    let default_cfg = AvendConfig::default();
    match write_default(path, &default_cfg) {
        Ok(()) => tracing::info!("created default config at {}", path.display()),
        Err(e) => tracing::warn!("{:#}; using defaults", e),
    }
    Ok(default_cfg)
}

fn write_default(path: &Path, cfg: &AvendConfig) -> Result<()> {
    let toml = toml::to_string_pretty(cfg)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create default config {}", path.display()))?;
    }
    fs::write(path, toml).with_context(|| format!("create default config {}", path.display()))?;
    Ok(())
}

/// Load an explicit config file. The file must exist.
pub fn load_from_path(path: &Path) -> Result<AvendConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: AvendConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
