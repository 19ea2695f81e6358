use crate::model::ScanResult;
use anyhow::Result;
use std::io::Write;

/// Column header, written even when there are no records.
const HEADER: [&str; 5] = ["name", "version", "vendor", "install_date", "host"];

pub fn write_csv<W: Write>(result: &ScanResult, writer: W) -> Result<()> {
    let mut wtr = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(HEADER)?;
    for record in &result.records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
