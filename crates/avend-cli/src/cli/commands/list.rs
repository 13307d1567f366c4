//! `avend list` – show each asset and its state on disk without fetching.

use anyhow::Result;
use avend_core::config::AvendConfig;
use avend_core::manifest::Manifest;
use avend_core::storage::{self, Presence};

pub fn run_list(cfg: &AvendConfig, manifest: &Manifest) -> Result<()> {
    let descriptors = manifest.resolve(&cfg.vendor_root)?;
    let mut present = 0usize;
    for d in &descriptors {
        let state = match storage::presence(&d.destination) {
            Ok(p) if p.is_satisfied() => {
                present += 1;
                match p {
                    Presence::Present(size) => size.to_string(),
                    _ => "present".to_string(),
                }
            }
            Ok(Presence::Empty) => "empty".to_string(),
            Ok(_) => "missing".to_string(),
            Err(e) => format!("error: {}", e),
        };
        println!("{:>10}  {}  {}", state, d.destination.display(), d.source_url);
    }
    println!(
        "{} asset(s), {} present, {} to fetch",
        descriptors.len(),
        present,
        descriptors.len() - present
    );
    Ok(())
}
