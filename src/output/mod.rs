mod cli;
mod csv;
mod json;

pub use cli::write_table;
pub use self::csv::write_csv;
pub use json::write_json;

use crate::model::ScanResult;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Output format for scan results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated records, one per line
    Csv,
    /// JSON array of records
    Json,
    /// Human-readable table
    Table,
}

impl ExportFormat {
    /// File name used when the report is written to disk.
    ///
    /// The table is terminal output only and has no report file.
    pub fn report_file_name(&self) -> Option<&'static str> {
        match self {
            ExportFormat::Csv => Some("report.csv"),
            ExportFormat::Json => Some("report.json"),
            ExportFormat::Table => None,
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Table => "table",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "table" => Ok(ExportFormat::Table),
            _ => Err(format!(
                "Unknown format: {}. Use 'csv', 'json', or 'table'",
                s
            )),
        }
    }
}

/// Writes `result` in `format` to `writer`.
pub fn write_to<W: Write>(result: &ScanResult, format: ExportFormat, writer: W) -> Result<()> {
    match format {
        ExportFormat::Csv => write_csv(result, writer),
        ExportFormat::Json => write_json(result, writer),
        ExportFormat::Table => write_table(result, writer),
    }
}

pub fn print_result(result: &ScanResult, format: ExportFormat) -> Result<()> {
    write_to(result, format, io::stdout().lock())
}

/// Writes the report for `format` into `dir` and returns its path.
///
/// # Errors
///
/// Fails for [`ExportFormat::Table`], which has no report file, and when the
/// directory or file cannot be written.
pub fn write_report(result: &ScanResult, format: ExportFormat, dir: &Path) -> Result<PathBuf> {
    let file_name = format
        .report_file_name()
        .ok_or_else(|| anyhow!("{} output has no report file", format))?;

    fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    let path = dir.join(file_name);
    let file = File::create(&path).with_context(|| format!("Failed to write {:?}", path))?;
    write_to(result, format, BufWriter::new(file))
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OsFamily, PackageRecord};
    use std::str::FromStr;

    fn sample() -> ScanResult {
        let records = vec![
            PackageRecord {
                host: "deb-01".to_string(),
                ..PackageRecord::new("curl", "7.88.1").with_vendor("Debian curl maintainers")
            },
            PackageRecord {
                host: "deb-01".to_string(),
                ..PackageRecord::new("firefox", "128.0-2").with_vendor("snap")
            },
        ];
        ScanResult::new("deb-01", OsFamily::Debian, records)
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(ExportFormat::from_str("CSV").unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_str("json").unwrap(), ExportFormat::Json);
        assert_eq!(ExportFormat::from_str("table").unwrap(), ExportFormat::Table);
        assert!(ExportFormat::from_str("sarif").is_err());
    }

    #[test]
    fn test_json_report_is_record_array() {
        let mut buf = Vec::new();
        write_to(&sample(), ExportFormat::Json, &mut buf).unwrap();
        let parsed: Vec<PackageRecord> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed, sample().records);
    }

    #[test]
    fn test_every_format_writes_to_a_stream() {
        for format in [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Table] {
            let mut buf = Vec::new();
            write_to(&sample(), format, &mut buf).unwrap();
            let text = String::from_utf8(buf).unwrap();
            assert!(text.contains("firefox"), "{} output lacks records", format);
        }
    }

    #[test]
    fn test_table_has_no_report_file() {
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(ExportFormat::Table.report_file_name(), None);
        assert!(write_report(&sample(), ExportFormat::Table, dir.path()).is_err());
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();

        let out = dir.path().join("reports");

        let csv_path = write_report(&sample(), ExportFormat::Csv, &out).unwrap();
        let json_path = write_report(&sample(), ExportFormat::Json, &out).unwrap();

        assert_eq!(csv_path.file_name().unwrap(), "report.csv");
        assert_eq!(json_path.file_name().unwrap(), "report.json");
        let csv = fs::read_to_string(csv_path).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }
}
