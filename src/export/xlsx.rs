use std::path::Path;

use anyhow::{Context as _, Result};
use rust_xlsxwriter::{Color, Format, Workbook};

use crate::inventory::{InventoryReport, ResourceRecord};

/// Column headers in wire order, matching the JSON field names.
const HEADERS: [&str; 8] = [
    "Service",
    "ResourceType",
    "Identifier",
    "ARN",
    "Application",
    "AWSAccount",
    "Region",
    "LastReportedAt",
];

const HEADER_FILL: Color = Color::RGB(0x366092);
/// Columns widen to fit their longest cell, up to this cap.
const MAX_COLUMN_WIDTH: f64 = 50.0;

fn columns(record: &ResourceRecord) -> [&str; 8] {
    [
        &record.service,
        &record.resource_type,
        &record.identifier,
        &record.arn,
        &record.application,
        &record.aws_account,
        &record.region,
        &record.last_reported_at,
    ]
}

/// Write the report as a single styled worksheet: one header row, one data
/// row per record.
pub fn write_xlsx(report: &InventoryReport, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("AWS Resources")?;

    let header_format = Format::new().set_bold().set_background_color(HEADER_FILL);
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (row, record) in report.resources.iter().enumerate() {
        for (col, value) in columns(record).iter().enumerate() {
            worksheet.write_string(row as u32 + 1, col as u16, *value)?;
        }
    }

    for (col, header) in HEADERS.iter().enumerate() {
        let longest = report
            .resources
            .iter()
            .map(|record| columns(record)[col].len())
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);
        worksheet.set_column_width(col as u16, ((longest + 2) as f64).min(MAX_COLUMN_WIDTH))?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed to write spreadsheet to {}", path.display()))?;
    Ok(())
}
