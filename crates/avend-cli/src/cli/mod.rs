//! CLI for avend. With no subcommand it runs a full vendoring pass.

mod commands;

use anyhow::{Context, Result};
use avend_core::config::{self, AvendConfig};
use avend_core::manifest::Manifest;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use commands::{run_checksum, run_list, run_manifest, run_sync};

/// Top-level CLI for avend.
#[derive(Debug, Parser)]
#[command(name = "avend", version)]
#[command(about = "avend: vendor third-party static assets into the build tree", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub opts: GlobalOpts,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

/// Overrides for values that otherwise come from the config file.
#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (default: ~/.config/avend/config.toml, created if missing).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Vendor root directory; each library is placed in a subdirectory.
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Manifest TOML file (default: built-in manifest).
    #[arg(long, global = true, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Fetch up to N assets concurrently (default 1, in manifest order).
    #[arg(short, long, global = true, value_name = "N")]
    pub jobs: Option<usize>,

    /// Per-request timeout in seconds.
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Exit with status 2 if any asset failed to vendor.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Also print a line for skipped assets and a final summary.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch every missing asset (the default when no subcommand is given).
    Sync,

    /// Show each asset's destination and whether it is already present. No network.
    List,

    /// Print the effective manifest as TOML.
    Manifest,

    /// Compute SHA-256 of a file (e.g. to audit a vendored asset).
    Checksum {
        /// Path to the file.
        path: String,
    },
}

impl GlobalOpts {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply(&self, cfg: &mut AvendConfig) {
        if let Some(root) = &self.root {
            cfg.vendor_root = root.clone();
        }
        if let Some(manifest) = &self.manifest {
            cfg.manifest = Some(manifest.clone());
        }
        if let Some(jobs) = self.jobs {
            cfg.jobs = jobs;
        }
        if let Some(timeout) = self.timeout {
            cfg.timeout_secs = timeout;
        }
        if self.strict {
            cfg.strict = true;
        }
    }

    /// Config file (explicit or XDG default) with overrides applied, plus its manifest.
    pub fn load(&self) -> Result<(AvendConfig, Manifest)> {
        let mut cfg = match &self.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        self.apply(&mut cfg);
        tracing::debug!("effective config: {:?}", cfg);
        let manifest = load_manifest(&cfg)?;
        Ok((cfg, manifest))
    }
}

/// Built-in manifest unless the config names a file.
pub fn load_manifest(cfg: &AvendConfig) -> Result<Manifest> {
    match &cfg.manifest {
        Some(path) => {
            Manifest::load(path).with_context(|| format!("load manifest {}", path.display()))
        }
        None => Manifest::builtin().context("built-in manifest"),
    }
}

impl Cli {
    pub async fn run_from_args() -> Result<ExitCode> {
        Cli::parse().run().await
    }

    pub async fn run(self) -> Result<ExitCode> {
        match self.command.unwrap_or(CliCommand::Sync) {
            CliCommand::Sync => {
                let (cfg, manifest) = self.opts.load()?;
                run_sync(&cfg, &manifest, self.opts.verbose).await
            }
            CliCommand::List => {
                let (cfg, manifest) = self.opts.load()?;
                run_list(&cfg, &manifest)?;
                Ok(ExitCode::SUCCESS)
            }
            CliCommand::Manifest => {
                let (_, manifest) = self.opts.load()?;
                run_manifest(&manifest)?;
                Ok(ExitCode::SUCCESS)
            }
            CliCommand::Checksum { path } => {
                run_checksum(Path::new(&path)).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

#[cfg(test)]
mod tests;
