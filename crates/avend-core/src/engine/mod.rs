//! Vendoring engine.
//!
//! Walks the resolved descriptors and brings each destination to a terminal
//! state (`Skipped`, `Fetched` or `Failed`). Failures are isolated per asset:
//! they are logged, recorded and never stop the remaining descriptors.
//!
//! With `jobs > 1` a fixed pool of worker threads pulls descriptors from a
//! shared queue and sends results back over a channel. Destinations are unique
//! per manifest, so workers never touch the same path.

mod asset;
mod result;

use crate::fetch::Fetch;
use crate::manifest::AssetDescriptor;
use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::{Mutex, PoisonError};

pub use result::{FetchResult, FetchStatus, RunSummary};

/// Engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendOptions {
    /// Worker threads. `1` processes the manifest strictly in order.
    pub jobs: usize,
}

impl Default for VendOptions {
    fn default() -> Self {
        Self { jobs: 1 }
    }
}

/// Vendor every descriptor and return one result per descriptor, in manifest order.
///
/// If `report` is `Some`, each result is also sent as soon as it is known so
/// the caller can print progress while the pass is still running. Send errors
/// (receiver dropped) are ignored.
pub fn vend<F: Fetch + ?Sized>(
    descriptors: &[AssetDescriptor],
    fetcher: &F,
    opts: &VendOptions,
    report: Option<&mpsc::Sender<FetchResult>>,
) -> Vec<FetchResult> {
    let workers = opts.jobs.max(1).min(descriptors.len());
    tracing::debug!(assets = descriptors.len(), workers, "starting vendoring pass");

    if workers <= 1 {
        return descriptors
            .iter()
            .map(|desc| {
                let res = asset::vend_one(desc, fetcher);
                if let Some(tx) = report {
                    let _ = tx.send(res.clone());
                }
                res
            })
            .collect();
    }

    let work: Mutex<VecDeque<(usize, &AssetDescriptor)>> =
        Mutex::new(descriptors.iter().enumerate().collect());
    let mut slots: Vec<Option<FetchResult>> = (0..descriptors.len()).map(|_| None).collect();

    std::thread::scope(|s| {
        let (tx, rx) = mpsc::channel::<(usize, FetchResult)>();
        for _ in 0..workers {
            let tx = tx.clone();
            let work = &work;
            s.spawn(move || loop {
                let next = work
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .pop_front();
                let Some((index, desc)) = next else {
                    break;
                };
                let res = asset::vend_one(desc, fetcher);
                if tx.send((index, res)).is_err() {
                    break;
                }
            });
        }
        drop(tx);

        for (index, res) in rx {
            if let Some(report) = report {
                let _ = report.send(res.clone());
            }
            slots[index] = Some(res);
        }
    });

    slots.into_iter().flatten().collect()
}
