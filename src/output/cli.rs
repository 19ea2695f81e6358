use crate::model::ScanResult;
use anyhow::Result;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::io;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Vendor")]
    vendor: String,
    #[tabled(rename = "Installed")]
    install_date: String,
}

pub fn write_table<W: io::Write>(result: &ScanResult, mut writer: W) -> Result<()> {
    writer.write_all(render_table(result).as_bytes())?;
    writer.flush()?;
    Ok(())
}

fn render_table(result: &ScanResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Host {} ({}) scanned at: {}",
        result.host,
        result.os,
        result.scan_time.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out);

    if result.records.is_empty() {
        let _ = writeln!(out, "No packages found.");
        return out;
    }

    let _ = writeln!(out, "Found {} packages:", result.records.len());
    let _ = writeln!(out);

    let rows: Vec<RecordRow> = result
        .records
        .iter()
        .map(|r| RecordRow {
            name: truncate(&r.name, 40),
            version: or_dash(&truncate(&r.version, 24)),
            vendor: or_dash(&truncate(&r.vendor, 40)),
            install_date: or_dash(&r.install_date),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    let _ = writeln!(out, "{}", table);
    let _ = writeln!(out);
    out.push_str(&summary(result));

    out
}

fn summary(result: &ScanResult) -> String {
    let mut by_vendor: BTreeMap<&str, usize> = BTreeMap::new();
    let mut no_version = 0;
    for record in &result.records {
        *by_vendor.entry(record.vendor.as_str()).or_default() += 1;
        if record.version.is_empty() {
            no_version += 1;
        }
    }

    let mut out = String::from("Summary:\n");
    if no_version > 0 {
        let _ = writeln!(
            out,
            "  Total packages: {} ({} without version)",
            result.records.len(),
            no_version
        );
    } else {
        let _ = writeln!(out, "  Total packages: {}", result.records.len());
    }

    let mut top: Vec<(&str, usize)> = by_vendor
        .into_iter()
        .filter(|(vendor, _)| !vendor.is_empty())
        .collect();
    top.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    if !top.is_empty() {
        let vendors: Vec<String> = top
            .iter()
            .take(5)
            .map(|(vendor, count)| format!("{} {}", count, truncate(vendor, 30)))
            .collect();
        let _ = writeln!(out, "  Top vendors: {}", vendors.join(", "));
    }

    out
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

fn or_dash(s: &str) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        s.to_string()
    }
}
