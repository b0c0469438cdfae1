//! S3 delivery of exported reports.

use std::path::Path;

use anyhow::{Context as _, Result};
use aws_sdk_s3::primitives::ByteStream;
use chrono::Local;
use tracing::info;

use crate::inventory::{AwsConfigProvider, DEFAULT_REGION};

/// Key prefix for uploaded reports; a timestamped folder lands under it.
pub const DEFAULT_KEY_PREFIX: &str = "AWS_Inventory/";

/// Upload a local file to `s3://<bucket>/<prefix><timestamp>/<filename>`
/// and return the object key.
///
/// The caller decides whether failure matters; by contract the overall run
/// never aborts on upload errors.
pub async fn upload_to_bucket(
    config_provider: &AwsConfigProvider,
    bucket: &str,
    path: &Path,
    key_prefix: &str,
) -> Result<String> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("{} has no usable file name", path.display()))?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let key = format!("{key_prefix}{timestamp}/{file_name}");

    let body = ByteStream::from_path(path)
        .await
        .with_context(|| format!("failed to read {} for upload", path.display()))?;

    let config = config_provider.config_for_region(DEFAULT_REGION).await;
    let client = aws_sdk_s3::Client::new(&config);
    client
        .put_object()
        .bucket(bucket)
        .key(&key)
        .body(body)
        .send()
        .await
        .with_context(|| format!("failed to upload {file_name} to s3://{bucket}/{key}"))?;

    info!("uploaded {} to s3://{}/{}", file_name, bucket, key);
    Ok(key)
}
