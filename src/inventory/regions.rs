use anyhow::{Context as _, Result};
use tracing::info;

use super::credentials::AwsConfigProvider;

/// Region used for account-level lookups (region enumeration, uploads) and
/// as the scan default when no region flag is given.
pub const DEFAULT_REGION: &str = "us-east-1";

/// List the regions enabled for the current account.
pub async fn list_enabled_regions(config_provider: &AwsConfigProvider) -> Result<Vec<String>> {
    let config = config_provider.config_for_region(DEFAULT_REGION).await;
    let client = aws_sdk_ec2::Client::new(&config);

    let output = client
        .describe_regions()
        .send()
        .await
        .context("failed to enumerate enabled regions")?;

    let regions: Vec<String> = output
        .regions()
        .iter()
        .filter_map(|region| region.region_name().map(str::to_string))
        .collect();

    info!("account has {} enabled regions", regions.len());
    Ok(regions)
}
