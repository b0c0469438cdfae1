//! End-to-end flow over stub scanners: fleet aggregation into a report,
//! then both exporters, then the JSON read back.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use awsinv::export;
use awsinv::inventory::{
    scan_regions, InventoryReport, RegionScan, RegionScanner, ResourceRecord, ScanOutcome,
};

/// Stub scanner: a healthy region, an index-less region, and a broken one.
struct MixedFleet;

#[async_trait]
impl RegionScanner for MixedFleet {
    async fn scan_region(&self, region: &str) -> RegionScan {
        match region {
            "eu-west-3" => RegionScan::index_absent(region),
            "ap-south-1" => RegionScan::failed(region, "Resource Explorer rate limited"),
            _ => RegionScan::indexed(
                region,
                vec![
                    ResourceRecord {
                        service: "s3".to_string(),
                        resource_type: "s3:bucket".to_string(),
                        identifier: format!("bucket-{region}"),
                        arn: format!("arn:aws:s3:::bucket-{region}"),
                        region: region.to_string(),
                        aws_account: "123456789012".to_string(),
                        ..Default::default()
                    },
                    ResourceRecord {
                        service: "lambda".to_string(),
                        resource_type: "lambda:function".to_string(),
                        identifier: "ingest".to_string(),
                        arn: format!("arn:aws:lambda:{region}:123456789012:function:ingest"),
                        application: "ingest-pipeline".to_string(),
                        region: region.to_string(),
                        aws_account: "123456789012".to_string(),
                        ..Default::default()
                    },
                ],
            ),
        }
    }
}

#[tokio::test]
async fn test_scan_to_export_round_trip() {
    let regions = vec![
        "us-east-1".to_string(),
        "eu-west-3".to_string(),
        "ap-south-1".to_string(),
        "us-west-2".to_string(),
    ];

    let scans = scan_regions(Arc::new(MixedFleet), regions, 5, None).await;
    assert_eq!(scans.len(), 4);

    let degraded: Vec<_> = scans
        .iter()
        .filter(|scan| !matches!(scan.outcome, ScanOutcome::Indexed(_)))
        .collect();
    assert_eq!(degraded.len(), 2);

    let records: Vec<_> = scans
        .into_iter()
        .flat_map(RegionScan::into_records)
        .collect();
    let report = InventoryReport::new(records);
    assert_eq!(report.total_resources, 4);

    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("aws_resources.json");
    let xlsx_path = dir.path().join("aws_resources.xlsx");
    export::json::write_json(&report, &json_path).unwrap();
    export::xlsx::write_xlsx(&report, &xlsx_path).unwrap();

    let restored: InventoryReport =
        serde_json::from_reader(std::fs::File::open(&json_path).unwrap()).unwrap();
    assert_eq!(restored.total_resources, 4);

    // Cross-region order is unstable; compare as sets.
    let expected: BTreeSet<String> = [
        "arn:aws:s3:::bucket-us-east-1",
        "arn:aws:lambda:us-east-1:123456789012:function:ingest",
        "arn:aws:s3:::bucket-us-west-2",
        "arn:aws:lambda:us-west-2:123456789012:function:ingest",
    ]
    .iter()
    .map(|arn| arn.to_string())
    .collect();
    let restored_arns: BTreeSet<String> = restored
        .resources
        .iter()
        .map(|record| record.arn.clone())
        .collect();
    assert_eq!(restored_arns, expected);

    assert!(std::fs::metadata(&xlsx_path).unwrap().len() > 0);
}
