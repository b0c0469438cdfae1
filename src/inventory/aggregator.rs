//! Fleet-wide fan-out of the region scanner.

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::{mpsc, Semaphore};
use tracing::{info, warn};

use super::scanner::RegionScanner;
use super::state::{RegionScan, ScanOutcome};

/// Progress event emitted while the fleet scan runs. The CLI prints one
/// status line per event.
#[derive(Debug)]
pub struct ScanProgress {
    pub region: String,
    pub status: ScanStatus,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    Started,
    Completed,
    IndexAbsent,
    Failed,
}

impl ScanProgress {
    pub fn started(region: &str) -> Self {
        Self {
            region: region.to_string(),
            status: ScanStatus::Started,
            message: format!("Processing {}...", region),
        }
    }

    pub fn finished(scan: &RegionScan) -> Self {
        let status = match &scan.outcome {
            ScanOutcome::Indexed(_) => ScanStatus::Completed,
            ScanOutcome::IndexAbsent => ScanStatus::IndexAbsent,
            ScanOutcome::Failed { .. } => ScanStatus::Failed,
        };
        Self {
            region: scan.region.clone(),
            status,
            message: scan.summary(),
        }
    }
}

impl std::fmt::Display for ScanProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Scan every region concurrently, at most `max_concurrent` at a time, and
/// return the per-region outcomes in completion order.
///
/// The call waits for every scan; there is no timeout and no cancellation,
/// and a failed region neither aborts nor delays the others. Results from
/// different regions interleave arbitrarily; within one region the provider
/// order is preserved.
pub async fn scan_regions(
    scanner: Arc<dyn RegionScanner + Send + Sync>,
    regions: Vec<String>,
    max_concurrent: usize,
    progress: Option<mpsc::Sender<ScanProgress>>,
) -> Vec<RegionScan> {
    info!(
        "starting resource scan across {} regions ({} concurrent)",
        regions.len(),
        max_concurrent
    );

    let semaphore = Arc::new(Semaphore::new(max_concurrent));

    let mut scans: FuturesUnordered<_> = regions
        .into_iter()
        .map(|region| {
            let scanner = Arc::clone(&scanner);
            let semaphore = Arc::clone(&semaphore);
            let progress = progress.clone();
            async move {
                let _permit = match semaphore.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        warn!("scan pool closed, skipping {}", region);
                        return RegionScan::failed(&region, "scan pool shut down");
                    }
                };

                if let Some(sender) = &progress {
                    let _ = sender.send(ScanProgress::started(&region)).await;
                }

                let scan = scanner.scan_region(&region).await;

                if let Some(sender) = &progress {
                    let _ = sender.send(ScanProgress::finished(&scan)).await;
                }

                scan
            }
        })
        .collect();

    // The clones moved into the futures keep the channel open; release the
    // original so it closes once the last scan reports.
    drop(progress);

    let mut results = Vec::with_capacity(scans.len());
    while let Some(scan) = scans.next().await {
        results.push(scan);
    }

    info!(
        "scan complete: {} resources across {} regions",
        results.iter().map(RegionScan::record_count).sum::<usize>(),
        results.len()
    );
    results
}
