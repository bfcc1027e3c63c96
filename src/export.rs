//! Writing a batch out as a spreadsheet-readable table.

use crate::categories::CategoryDescriptor;
use crate::models::{DateFilter, ListingBatch};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// `<stem>_<filter suffix>_<timestamp>.<ext>`
pub fn output_filename(
    category: &CategoryDescriptor,
    filter: &DateFilter,
    format: ExportFormat,
    now: NaiveDateTime,
) -> String {
    format!(
        "{}_{}_{}.{}",
        category.output_stem(),
        filter.suffix(),
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

pub fn write_batch<W: Write>(batch: &ListingBatch, format: ExportFormat, writer: W) -> Result<()> {
    match format {
        ExportFormat::Csv => write_csv(batch, writer),
        ExportFormat::Json => write_json(batch, writer),
    }
}

/// Marks the file as UTF-8 for spreadsheet tools that otherwise assume a
/// legacy code page and mangle Cyrillic text.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn write_csv<W: Write>(batch: &ListingBatch, mut writer: W) -> Result<()> {
    writer.write_all(UTF8_BOM)?;
    let columns = batch.columns();
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(&columns)?;
    for record in batch.iter() {
        writer.write_record(
            columns
                .iter()
                .map(|c| record.cell(c).unwrap_or_default()),
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json<W: Write>(batch: &ListingBatch, writer: W) -> Result<()> {
    let columns = batch.columns();
    let rows: Vec<Value> = batch
        .iter()
        .map(|record| {
            let row: Map<String, Value> = columns
                .iter()
                .map(|c| (c.clone(), record.cell(c).map_or(Value::Null, Value::String)))
                .collect();
            Value::Object(row)
        })
        .collect();
    serde_json::to_writer_pretty(writer, &rows)?;
    Ok(())
}

/// Serialize into memory, e.g. for a download button
pub fn to_bytes(batch: &ListingBatch, format: ExportFormat) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_batch(batch, format, &mut buf)?;
    Ok(buf)
}

/// Write the batch to `path`, creating parent directories as needed
pub fn save_batch(batch: &ListingBatch, format: ExportFormat, path: &Path) -> Result<PathBuf> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_batch(batch, format, &mut out)?;
    out.flush()?;
    debug!("Wrote {} rows to {}", batch.len(), path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories;
    use crate::models::ListingRecord;
    use chrono::NaiveDate;

    fn sample() -> ListingBatch {
        let mut full = ListingRecord::new("https://www.unegui.mn/adv/1_a/");
        full.title = Some("2 өрөө, Зайсан".into());
        full.price = Some("180000000".into());
        full.date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(9, 30, 0);
        full.properties.insert("Талбай".into(), "52 м²".into());
        let bare = ListingRecord::new("https://www.unegui.mn/adv/2_b/");
        ListingBatch::from(vec![full, bare])
    }

    #[test]
    fn test_csv_starts_with_utf8_bom() {
        let bytes = to_bytes(&sample(), ExportFormat::Csv).unwrap();
        assert_eq!(&bytes[..3], b"\xEF\xBB\xBF");
        assert!(bytes[3..].starts_with(b"Title,"));
    }

    #[test]
    fn test_csv_has_header_and_empty_cells_for_missing() {
        let bytes = to_bytes(&sample(), ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Title,Price,Ad_ID,Location,Date,URL,Талбай");
        assert_eq!(
            lines[1],
            "\"2 өрөө, Зайсан\",180000000,,,2024-06-01 09:30:00,https://www.unegui.mn/adv/1_a/,52 м²"
        );
        assert_eq!(lines[2], ",,,,,https://www.unegui.mn/adv/2_b/,");
    }

    #[test]
    fn test_json_uses_null_for_missing() {
        let bytes = to_bytes(&sample(), ExportFormat::Json).unwrap();
        let rows: Vec<Value> = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Date"], "2024-06-01 09:30:00");
        assert_eq!(rows[1]["Title"], Value::Null);
        assert_eq!(rows[1]["Талбай"], Value::Null);
    }

    #[test]
    fn test_output_filename() {
        let now = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap().and_hms_opt(15, 4, 5).unwrap();
        let land = categories::find("land").unwrap();
        assert_eq!(
            output_filename(land, &DateFilter::AllDates, ExportFormat::Csv, now),
            "unegui_land_all_20240602_150405.csv"
        );
    }

    #[test]
    fn test_save_batch_creates_directories() {
        let dir = std::env::temp_dir().join(format!("unegui-scout-{}", std::process::id()));
        let path = dir.join("nested").join("out.csv");

        save_batch(&sample(), ExportFormat::Csv, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("\u{feff}Title,Price"));
        fs::remove_dir_all(dir).unwrap();
    }
}
