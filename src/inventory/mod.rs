//! Scan core: per-region scanner, bounded-concurrency fleet aggregator,
//! resource normalization, and the region catalog.

pub mod aggregator;
pub mod credentials;
pub mod normalizers;
pub mod regions;
pub mod scanner;
pub mod sdk_errors;
pub mod state;

pub use aggregator::{scan_regions, ScanProgress, ScanStatus};
pub use credentials::AwsConfigProvider;
pub use normalizers::{extract_identifier, infer_application, normalize_resource, RawResource};
pub use regions::{list_enabled_regions, DEFAULT_REGION};
pub use scanner::{RegionScanner, ResourceExplorerService, ScanLimits};
pub use state::{InventoryReport, RegionScan, ResourceRecord, ScanOutcome};
