//! Single-region resource scan against the Resource Explorer search API.

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use aws_sdk_resourceexplorer2 as resourceexplorer2;
use aws_smithy_types::Document;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use super::credentials::AwsConfigProvider;
use super::normalizers::{normalize_resource, RawResource};
use super::sdk_errors;
use super::state::{RegionScan, ScanOutcome};

/// Caps for the per-region search and the fleet-wide fan-out.
#[derive(Debug, Clone)]
pub struct ScanLimits {
    /// Upper bound on results returned by one search. Only one page is
    /// fetched; resources beyond the cap are omitted.
    pub max_results: i32,
    /// Number of regions scanned concurrently.
    pub max_concurrent_scans: usize,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            max_results: 1000,
            max_concurrent_scans: 5,
        }
    }
}

/// Seam between the aggregator and the provider-backed scanner.
#[async_trait]
pub trait RegionScanner {
    /// Scan one region. Infallible by contract: every failure is downgraded
    /// into the returned outcome so a single region can never abort the
    /// fleet-wide scan.
    async fn scan_region(&self, region: &str) -> RegionScan;
}

/// Region scanner backed by AWS Resource Explorer.
pub struct ResourceExplorerService {
    config_provider: AwsConfigProvider,
    limits: ScanLimits,
}

impl ResourceExplorerService {
    pub fn new(config_provider: AwsConfigProvider, limits: ScanLimits) -> Self {
        Self {
            config_provider,
            limits,
        }
    }

    async fn try_scan(&self, region: &str) -> Result<ScanOutcome> {
        let config = self.config_provider.config_for_region(region).await;
        let client = resourceexplorer2::Client::new(&config);

        // Index probe. A region without an index answers with an empty
        // index list or ResourceNotFoundException depending on the endpoint.
        match client.list_indexes().send().await {
            Ok(output) if output.indexes().is_empty() => return Ok(ScanOutcome::IndexAbsent),
            Ok(_) => {}
            Err(err) => {
                let err = anyhow::Error::from(err);
                if sdk_errors::is_index_not_found(&err) {
                    return Ok(ScanOutcome::IndexAbsent);
                }
                return Err(err.context(format!("failed to probe resource index in {region}")));
            }
        }

        let output = client
            .search()
            .query_string("*")
            .max_results(self.limits.max_results)
            .send()
            .await
            .with_context(|| format!("resource search failed in {region}"))?;

        let records: Vec<_> = output
            .resources()
            .iter()
            .map(|resource| normalize_resource(&raw_resource_from_sdk(resource, region)))
            .collect();

        if records.len() == self.limits.max_results as usize {
            warn!(
                "search in {} returned exactly {} results; the single-page cap may have truncated the inventory",
                region, self.limits.max_results
            );
        }
        debug!("search in {} returned {} resources", region, records.len());

        Ok(ScanOutcome::Indexed(records))
    }
}

#[async_trait]
impl RegionScanner for ResourceExplorerService {
    async fn scan_region(&self, region: &str) -> RegionScan {
        match self.try_scan(region).await {
            Ok(outcome) => RegionScan {
                region: region.to_string(),
                outcome,
            },
            Err(err) => {
                warn!("scan failed in {}: {:#}", region, err);
                let reason = sdk_errors::categorize_error(&err, "Resource Explorer", "Search")
                    .user_message();
                RegionScan::failed(region, reason)
            }
        }
    }
}

/// Flatten one search hit into the normalizer's boundary type, merging each
/// property payload into a single JSON mapping keyed by property name.
fn raw_resource_from_sdk(
    resource: &resourceexplorer2::types::Resource,
    fallback_region: &str,
) -> RawResource {
    let mut properties = serde_json::Map::new();
    for property in resource.properties() {
        if let (Some(name), Some(data)) = (property.name(), property.data()) {
            properties.insert(name.to_string(), document_to_json(data));
        }
    }

    RawResource {
        arn: resource.arn().unwrap_or_default().to_string(),
        service: resource.service().unwrap_or_default().to_string(),
        resource_type: resource.resource_type().unwrap_or_default().to_string(),
        owning_account_id: resource.owning_account_id().unwrap_or_default().to_string(),
        region: resource.region().unwrap_or(fallback_region).to_string(),
        last_reported_at: resource.last_reported_at().and_then(to_chrono),
        properties: Value::Object(properties),
    }
}

fn to_chrono(at: &aws_smithy_types::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(at.secs(), at.subsec_nanos())
}

/// Render a Smithy document as plain JSON so the normalizer stays SDK-free.
fn document_to_json(document: &Document) -> Value {
    match document {
        Document::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), document_to_json(value)))
                .collect(),
        ),
        Document::Array(items) => Value::Array(items.iter().map(document_to_json).collect()),
        Document::Number(number) => match number {
            aws_smithy_types::Number::PosInt(value) => Value::from(*value),
            aws_smithy_types::Number::NegInt(value) => Value::from(*value),
            aws_smithy_types::Number::Float(value) => serde_json::Number::from_f64(*value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
        },
        Document::String(value) => Value::String(value.clone()),
        Document::Bool(value) => Value::Bool(*value),
        Document::Null => Value::Null,
    }
}
