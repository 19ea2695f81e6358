use crate::model::ScanResult;
use anyhow::Result;
use std::io::Write;

/// Writes the records as a pretty-printed JSON array.
pub fn write_json<W: Write>(result: &ScanResult, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, &result.records)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
