use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context as _, Result};

use crate::inventory::InventoryReport;

/// Write the report as pretty-printed JSON.
///
/// Unlike the per-region scan path, I/O failures here are fatal to the run
/// and propagate to the caller.
pub fn write_json(report: &InventoryReport, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .with_context(|| format!("failed to write JSON report to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::ResourceRecord;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    #[test]
    fn test_json_round_trip_preserves_count_and_arns() {
        let records = vec![
            ResourceRecord {
                service: "s3".to_string(),
                arn: "arn:aws:s3:::my-bucket".to_string(),
                identifier: "my-bucket".to_string(),
                region: "us-east-1".to_string(),
                ..Default::default()
            },
            ResourceRecord {
                service: "iam".to_string(),
                arn: "arn:aws:iam::123456789012:role/MyRole".to_string(),
                identifier: "MyRole".to_string(),
                application: "billing".to_string(),
                ..Default::default()
            },
        ];
        let report = InventoryReport::new(records);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aws_resources.json");
        write_json(&report, &path).unwrap();

        let restored: InventoryReport =
            serde_json::from_reader(File::open(&path).unwrap()).unwrap();

        assert_eq!(restored.total_resources, report.total_resources);
        let original: BTreeSet<_> = report.resources.iter().map(|r| r.arn.clone()).collect();
        let roundtripped: BTreeSet<_> =
            restored.resources.iter().map(|r| r.arn.clone()).collect();
        assert_eq!(roundtripped, original);
    }

    #[test]
    fn test_json_uses_wire_field_names() {
        let report = InventoryReport::new(vec![ResourceRecord {
            arn: "arn:aws:s3:::my-bucket".to_string(),
            aws_account: "123456789012".to_string(),
            ..Default::default()
        }]);

        let rendered = serde_json::to_value(&report).unwrap();
        let resource = &rendered["resources"][0];
        assert_eq!(resource["ARN"], "arn:aws:s3:::my-bucket");
        assert_eq!(resource["AWSAccount"], "123456789012");
        assert_eq!(resource["LastReportedAt"], "");
        assert!(rendered.get("total_resources").is_some());
    }
}
