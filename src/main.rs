#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use awsinv::export;
use awsinv::inventory::{
    self, AwsConfigProvider, InventoryReport, RegionScan, RegionScanner, ResourceExplorerService,
    ScanLimits, ScanProgress,
};
use awsinv::upload;

/// AWS Resource Explorer inventory
#[derive(Parser, Debug)]
#[command(name = "awsinv", version, about, long_about = None)]
struct Args {
    /// Single region to scan
    #[arg(short, long, conflicts_with_all = ["regions", "all_regions"])]
    region: Option<String>,

    /// Explicit set of regions to scan
    #[arg(long, num_args = 1.., conflicts_with = "all_regions")]
    regions: Option<Vec<String>>,

    /// Scan every region enabled for the account
    #[arg(short, long)]
    all_regions: bool,

    /// Output filename without extension
    #[arg(short, long, default_value = "aws_resources")]
    output: String,

    /// S3 bucket to upload the generated files to
    #[arg(long)]
    s3_bucket: Option<String>,

    /// Named AWS profile (defaults to the ambient credential chain)
    #[arg(long)]
    profile: Option<String>,
}

fn init_logging() {
    // Log to stderr so tracing lines never interleave with the stdout
    // status lines. AWS SDK internals are quieted unless RUST_LOG says
    // otherwise.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            "awsinv=info,aws_config=warn,aws_smithy_runtime=warn,aws_smithy_runtime_api=warn,aws_sigv4=warn,hyper=warn",
        )
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let config_provider = AwsConfigProvider::new(args.profile.clone());
    let limits = ScanLimits::default();
    let scanner = ResourceExplorerService::new(config_provider.clone(), limits.clone());

    let scans = if args.all_regions || args.regions.is_some() {
        let regions = match &args.regions {
            Some(regions) => regions.clone(),
            None => inventory::list_enabled_regions(&config_provider).await?,
        };
        scan_fleet(Arc::new(scanner), regions, limits.max_concurrent_scans).await
    } else {
        let region = args
            .region
            .clone()
            .unwrap_or_else(|| inventory::DEFAULT_REGION.to_string());
        println!("Processing {}...", region);
        let scan = scanner.scan_region(&region).await;
        println!("{}", scan.summary());
        vec![scan]
    };

    let records: Vec<_> = scans.into_iter().flat_map(RegionScan::into_records).collect();
    let report = InventoryReport::new(records);

    let json_path = PathBuf::from(format!("{}.json", args.output));
    export::json::write_json(&report, &json_path)?;
    println!("\nJSON saved to {}", json_path.display());

    let xlsx_path = PathBuf::from(format!("{}.xlsx", args.output));
    export::xlsx::write_xlsx(&report, &xlsx_path)?;
    println!("Excel saved to {}", xlsx_path.display());

    if let Some(bucket) = &args.s3_bucket {
        for path in [&xlsx_path, &json_path] {
            match upload::upload_to_bucket(&config_provider, bucket, path, upload::DEFAULT_KEY_PREFIX)
                .await
            {
                Ok(key) => println!("✓ Uploaded {} to s3://{}/{}", path.display(), bucket, key),
                Err(err) => {
                    warn!("upload of {} failed: {:#}", path.display(), err);
                    println!("✗ S3 upload failed: {:#}", err);
                }
            }
        }
    }

    println!("\nTotal resources found: {}", report.total_resources);
    Ok(())
}

/// Fan the scanner out over the region set, printing one status line per
/// progress event as completions arrive.
async fn scan_fleet(
    scanner: Arc<dyn RegionScanner + Send + Sync>,
    regions: Vec<String>,
    max_concurrent: usize,
) -> Vec<RegionScan> {
    let (sender, mut receiver) = mpsc::channel::<ScanProgress>(32);
    let printer = tokio::spawn(async move {
        while let Some(progress) = receiver.recv().await {
            println!("{}", progress);
        }
    });

    let scans = inventory::scan_regions(scanner, regions, max_concurrent, Some(sender)).await;
    let _ = printer.await;
    scans
}
