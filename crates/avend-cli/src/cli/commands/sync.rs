//! `avend sync` (default) – run the vendoring pass and print one line per asset.

use anyhow::{Context, Result};
use avend_core::config::AvendConfig;
use avend_core::engine::{self, FetchResult, FetchStatus, RunSummary};
use avend_core::fetch::CurlFetcher;
use avend_core::manifest::Manifest;
use std::process::ExitCode;
use std::sync::mpsc;

/// Exit status when strict mode is on and at least one asset failed.
const STRICT_FAILURE: u8 = 2;

pub async fn run_sync(cfg: &AvendConfig, manifest: &Manifest, verbose: bool) -> Result<ExitCode> {
    let root = cfg.vendor_root.clone();
    let descriptors = manifest.resolve(&root)?;
    std::fs::create_dir_all(&root)
        .with_context(|| format!("create vendor root {}", root.display()))?;

    let fetcher = CurlFetcher::new(cfg.fetch_options());
    let opts = cfg.vend_options();

    // Print each result as it lands; one println per result keeps lines whole.
    let (tx, rx) = mpsc::channel::<FetchResult>();
    let printer = std::thread::spawn(move || {
        for res in rx {
            print_result(&res, verbose);
        }
    });

    let results = tokio::task::spawn_blocking(move || {
        engine::vend(&descriptors, &fetcher, &opts, Some(&tx))
    })
    .await
    .context("vendoring task")?;
    let _ = printer.join();

    let summary = RunSummary::from_results(&results);
    if summary.failed > 0 {
        tracing::warn!(
            "vendoring finished with failures: {} assets, {} (root {})",
            summary.total(),
            summary,
            root.display()
        );
    } else {
        tracing::info!(
            "vendoring finished: {} assets, {} (root {})",
            summary.total(),
            summary,
            root.display()
        );
    }
    if verbose {
        println!("{}", summary);
    }

    Ok(ExitCode::from(exit_status(&summary, cfg.strict)))
}

fn print_result(res: &FetchResult, verbose: bool) {
    match res.status {
        FetchStatus::Fetched { .. } => println!("{}", res),
        FetchStatus::Failed { .. } => eprintln!("{}", res),
        FetchStatus::Skipped if verbose => println!("{}", res),
        FetchStatus::Skipped => {}
    }
}

/// Process exit status for a finished pass. Failures are advisory unless `strict`.
pub(crate) fn exit_status(summary: &RunSummary, strict: bool) -> u8 {
    if strict && summary.failed > 0 {
        STRICT_FAILURE
    } else {
        0
    }
}
