use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Normalized representation of one discovered resource.
///
/// Every field defaults to the empty string rather than an absent marker,
/// so exporters never encounter missing keys. Records are built once during
/// a scan and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    #[serde(rename = "Service")]
    pub service: String,
    #[serde(rename = "ResourceType")]
    pub resource_type: String,
    /// Short name derived from the ARN tail.
    #[serde(rename = "Identifier")]
    pub identifier: String,
    #[serde(rename = "ARN")]
    pub arn: String,
    /// Application label inferred from tag data, possibly empty.
    #[serde(rename = "Application")]
    pub application: String,
    #[serde(rename = "AWSAccount")]
    pub aws_account: String,
    #[serde(rename = "Region")]
    pub region: String,
    /// RFC 3339 timestamp, or empty when the provider did not report one.
    #[serde(rename = "LastReportedAt")]
    pub last_reported_at: String,
}

/// Aggregated output of one inventory run.
///
/// Resource order is aggregation order: regions complete concurrently, so
/// it is not stable across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryReport {
    pub timestamp: String,
    pub total_resources: usize,
    pub resources: Vec<ResourceRecord>,
}

impl InventoryReport {
    pub fn new(resources: Vec<ResourceRecord>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            total_resources: resources.len(),
            resources,
        }
    }
}

/// Result of scanning a single region.
#[derive(Debug)]
pub struct RegionScan {
    pub region: String,
    pub outcome: ScanOutcome,
}

/// Typed per-region outcome. A region never aborts the fleet-wide scan:
/// the scanner downgrades every failure into one of these variants.
#[derive(Debug)]
pub enum ScanOutcome {
    /// The region had a resource index and the search ran.
    Indexed(Vec<ResourceRecord>),
    /// Resource Explorer has no index in this region.
    IndexAbsent,
    /// The scan failed for any other reason (auth, throttling, network).
    Failed { reason: String },
}

impl RegionScan {
    pub fn indexed(region: impl Into<String>, records: Vec<ResourceRecord>) -> Self {
        Self {
            region: region.into(),
            outcome: ScanOutcome::Indexed(records),
        }
    }

    pub fn index_absent(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            outcome: ScanOutcome::IndexAbsent,
        }
    }

    pub fn failed(region: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            outcome: ScanOutcome::Failed {
                reason: reason.into(),
            },
        }
    }

    pub fn record_count(&self) -> usize {
        match &self.outcome {
            ScanOutcome::Indexed(records) => records.len(),
            ScanOutcome::IndexAbsent | ScanOutcome::Failed { .. } => 0,
        }
    }

    pub fn into_records(self) -> Vec<ResourceRecord> {
        match self.outcome {
            ScanOutcome::Indexed(records) => records,
            ScanOutcome::IndexAbsent | ScanOutcome::Failed { .. } => Vec::new(),
        }
    }

    /// User-visible status line for this region.
    pub fn summary(&self) -> String {
        match &self.outcome {
            ScanOutcome::Indexed(records) => {
                format!("✓ Found {} resources in {}", records.len(), self.region)
            }
            ScanOutcome::IndexAbsent => {
                format!("✗ Resource Explorer not enabled in {}", self.region)
            }
            ScanOutcome::Failed { reason } => format!("✗ Error in {}: {}", self.region, reason),
        }
    }
}
