
use anyhow::Context;
use std::io::Write;
use std::path::Path;

use crate::util::file_io::create_writer;

/// This will save a generic serializable struct to JSON, gzipped if the path ends with ".gz".
/// # Arguments
/// * `data` - the data in memory
/// * `out_filename` - user provided path to write to
/// # Errors
/// * if opening or writing to the file throw errors
/// * if JSON serialization throws errors
pub fn save_json<T: serde::Serialize>(data: &T, out_filename: &Path) -> anyhow::Result<()> {
    let mut writer = create_writer(out_filename)
        .with_context(|| format!("Error while creating {out_filename:?}:"))?;
    serde_json::to_writer_pretty(&mut writer, data)
        .with_context(|| format!("Error while serializing {out_filename:?}:"))?;
    writer.flush()
        .with_context(|| format!("Error while flushing output to {out_filename:?}:"))?;
    Ok(())
}
