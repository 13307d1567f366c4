//! `avend manifest` – print the effective manifest, e.g. to seed a custom one.

use anyhow::Result;
use avend_core::manifest::Manifest;

pub fn run_manifest(manifest: &Manifest) -> Result<()> {
    print!("{}", manifest.to_toml_string()?);
    Ok(())
}
