//! Export of dashboard rows to CSV and JSON files.

use crate::error::Result;
use crate::types::BoardRow;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CSV_FILE_NAME: &str = "signals_today.csv";
pub const JSON_FILE_NAME: &str = "signals_today.json";

/// Write rows as CSV with a header line.
pub fn write_csv(rows: &[BoardRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write rows as a pretty-printed JSON array.
pub fn write_json(rows: &[BoardRow], path: &Path) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, rows)?;
    Ok(())
}

/// Write both export files into `dir`, returning their paths.
pub fn export_rows(rows: &[BoardRow], dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let csv_path = dir.join(CSV_FILE_NAME);
    let json_path = dir.join(JSON_FILE_NAME);

    write_csv(rows, &csv_path)?;
    write_json(rows, &json_path)?;

    info!("Exported {} rows to {} and {}", rows.len(), csv_path.display(), json_path.display());
    Ok((csv_path, json_path))
}
