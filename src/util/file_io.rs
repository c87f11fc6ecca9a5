
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Returns true if the path ends with ".gz"
pub fn is_gzipped(filename: &Path) -> bool {
    filename.extension().unwrap_or_default() == "gz"
}

/// Picks the delimiter for a table from the file extension, ignoring any ".gz" suffix.
/// ".csv" is comma-delimited, everything else is tab-delimited.
pub fn table_delimiter(filename: &Path) -> u8 {
    let inner = if is_gzipped(filename) {
        Path::new(filename.file_stem().unwrap_or_default())
    } else {
        filename
    };
    let is_csv: bool = inner.extension().unwrap_or_default() == "csv";
    if is_csv { b',' } else { b'\t' }
}

/// Opens a file for reading, transparently decompressing ".gz" files
/// # Errors
/// * if the file does not open
pub fn open_reader(filename: &Path) -> std::io::Result<Box<dyn Read>> {
    let fp = File::open(filename)?;
    let reader: Box<dyn Read> = if is_gzipped(filename) {
        Box::new(flate2::read::MultiGzDecoder::new(BufReader::new(fp)))
    } else {
        Box::new(BufReader::new(fp))
    };
    Ok(reader)
}

/// Creates a file for writing, compressing the output if it ends with ".gz"
/// # Errors
/// * if the file cannot be created
pub fn create_writer(filename: &Path) -> std::io::Result<Box<dyn Write>> {
    let fp = File::create(filename)?;
    let writer: Box<dyn Write> = if is_gzipped(filename) {
        Box::new(flate2::write::GzEncoder::new(
            BufWriter::new(fp),
            flate2::Compression::best()
        ))
    } else {
        Box::new(BufWriter::new(fp))
    };
    Ok(writer)
}
