use crate::error::Result;
use crate::types::GdpRecord;
use std::path::Path;
use tracing::info;

/// Writes the dataset to `path`, overwriting any previous file: one header
/// row (`Country,GDP_USD_billions`), one line per record, no index column.
pub fn write_csv<P: AsRef<Path>>(records: &[GdpRecord], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Reads a previously written dataset back into records.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Vec<GdpRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for result in reader.deserialize() {
        records.push(result?);
    }
    Ok(records)
}
