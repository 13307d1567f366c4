//! Asset manifest: which files to vendor and where they land.
//!
//! A manifest is a list of libraries. Each library owns the subdirectory
//! `<root>/<name>/` and contributes explicit assets (`[[library.asset]]`) and
//! file sets sharing a base URL and directory (`[[library.set]]`). Relative
//! URLs are joined onto the library's `base_url`.
//!
//! Loading and resolving never touch the network or the vendor tree; a bad
//! entry is a programming mistake and is reported before any fetch starts.

mod error;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use url::Url;

pub use error::ManifestError;

const BUILTIN_TOML: &str = include_str!("builtin.toml");

/// Top-level manifest document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "library", default)]
    pub libraries: Vec<Library>,
}

/// One vendored library (bootstrap, leaflet, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    /// Subdirectory name under the vendor root.
    pub name: String,
    /// Base for relative asset URLs. A trailing `/` is implied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(rename = "asset", default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<AssetEntry>,
    #[serde(rename = "set", default, skip_serializing_if = "Vec::is_empty")]
    pub sets: Vec<FileSet>,
}

/// Single (url, path) pair. `path` is relative to the library directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub url: String,
    pub path: String,
}

/// Several files fetched from `<base_url>/<dir>/<file>` into `<library>/<dir>/<file>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    pub files: Vec<String>,
}

/// Resolved unit of work: fetch `source_url` into `destination`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDescriptor {
    pub library: String,
    pub source_url: String,
    pub destination: PathBuf,
}

impl AssetDescriptor {
    pub fn new(
        library: impl Into<String>,
        source_url: impl Into<String>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            library: library.into(),
            source_url: source_url.into(),
            destination: destination.into(),
        }
    }
}

impl Manifest {
    /// The manifest compiled into the binary.
    pub fn builtin() -> Result<Manifest, ManifestError> {
        Self::from_toml_str(BUILTIN_TOML)
    }

    pub fn from_toml_str(s: &str) -> Result<Manifest, ManifestError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> Result<Manifest, ManifestError> {
        let data = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&data)
    }

    pub fn to_toml_string(&self) -> Result<String, ManifestError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Expand every library into descriptors under `vendor_root`, in manifest
    /// order (assets, then sets), validating names, URLs and paths.
    pub fn resolve(&self, vendor_root: &Path) -> Result<Vec<AssetDescriptor>, ManifestError> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();

        for lib in &self.libraries {
            check_library_name(&lib.name)?;
            let base = lib
                .base_url
                .as_deref()
                .map(|b| parse_base(&lib.name, b))
                .transpose()?;
            let lib_dir = vendor_root.join(&lib.name);

            let mut push = |url: String, rel: PathBuf| -> Result<(), ManifestError> {
                let destination = lib_dir.join(rel);
                if !seen.insert(destination.clone()) {
                    return Err(ManifestError::Duplicate(destination));
                }
                out.push(AssetDescriptor::new(lib.name.clone(), url, destination));
                Ok(())
            };

            for asset in &lib.assets {
                let url = resolve_url(&lib.name, base.as_ref(), &asset.url)?;
                let rel = relative_path(&lib.name, &asset.path)?;
                push(url, rel)?;
            }

            for set in &lib.sets {
                let dir = match set.dir.as_deref() {
                    Some(d) => Some((d.trim_end_matches('/'), relative_path(&lib.name, d)?)),
                    None => None,
                };
                for file in &set.files {
                    let (raw_url, rel) = match &dir {
                        Some((d, dir_path)) => {
                            (format!("{}/{}", d, file), dir_path.join(relative_path(&lib.name, file)?))
                        }
                        None => (file.clone(), relative_path(&lib.name, file)?),
                    };
                    let url = resolve_url(&lib.name, base.as_ref(), &raw_url)?;
                    push(url, rel)?;
                }
            }
        }

        if out.is_empty() {
            return Err(ManifestError::Empty);
        }
        Ok(out)
    }
}

fn check_library_name(name: &str) -> Result<(), ManifestError> {
    let ok = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && name.trim() == name;
    if ok {
        Ok(())
    } else {
        Err(ManifestError::LibraryName(name.to_string()))
    }
}

fn url_error(library: &str, url: &str, reason: impl ToString) -> ManifestError {
    ManifestError::Url {
        library: library.to_string(),
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

fn check_scheme(library: &str, raw: &str, url: &Url) -> Result<(), ManifestError> {
    match url.scheme() {
        "http" | "https" if url.host().is_some() => Ok(()),
        "http" | "https" => Err(url_error(library, raw, "missing host")),
        other => Err(url_error(library, raw, format!("unsupported scheme {:?}", other))),
    }
}

fn parse_base(library: &str, raw: &str) -> Result<Url, ManifestError> {
    // Without the trailing slash `join` would drop the last path segment.
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    let url = Url::parse(&with_slash).map_err(|e| url_error(library, raw, e))?;
    check_scheme(library, raw, &url)?;
    Ok(url)
}

fn resolve_url(library: &str, base: Option<&Url>, raw: &str) -> Result<String, ManifestError> {
    let url = match Url::parse(raw) {
        Ok(u) => u,
        Err(url::ParseError::RelativeUrlWithoutBase) => match base {
            Some(b) => b.join(raw).map_err(|e| url_error(library, raw, e))?,
            None => return Err(url_error(library, raw, "relative URL and no base_url")),
        },
        Err(e) => return Err(url_error(library, raw, e)),
    };
    check_scheme(library, raw, &url)?;
    Ok(url.to_string())
}

/// Accepts only plain relative paths: no root, no `.`/`..`, not empty.
fn relative_path(library: &str, raw: &str) -> Result<PathBuf, ManifestError> {
    let path = Path::new(raw);
    let plain = !raw.is_empty() && path.components().all(|c| matches!(c, Component::Normal(_)));
    if plain {
        Ok(path.to_path_buf())
    } else {
        Err(ManifestError::Path {
            library: library.to_string(),
            path: raw.to_string(),
        })
    }
}
