// Tab-separated book list import/export
//
// One row per line, three fields, no header and no quoting. A field that
// itself contains a tab or newline does not survive a round trip.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use booklist_engine::table::{Row, COLUMN_COUNT};

use crate::error::IoError;

const DELIMITER: u8 = b'\t';

pub fn import(path: &Path) -> Result<Vec<Row>, IoError> {
    let content = read_file_as_utf8(path)?;
    let rows = parse_rows(&content).map_err(|e| IoError::read(Some(path), e))?;
    log::info!("Loaded {} row(s) from {}", rows.len(), path.display());
    Ok(rows)
}

/// Read every row from `reader` (e.g. stdin).
pub fn read_rows<R: Read>(mut reader: R) -> Result<Vec<Row>, IoError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(|e| IoError::read(None, e))?;
    parse_rows(&decode(bytes))
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let mut file = File::open(path).map_err(|e| IoError::open(path, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| IoError::read(Some(path), e))?;
    Ok(decode(bytes))
}

fn decode(bytes: Vec<u8>) -> String {
    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            log::warn!("Input is not valid UTF-8, decoding as Windows-1252");
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    }
}

/// Parse tab-separated content into rows.
///
/// Blank lines are skipped. Short lines leave the remaining fields empty;
/// fields past the third are dropped.
pub fn parse_rows(content: &str) -> Result<Vec<Row>, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| IoError::read(None, e))?;
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }

        let mut fields: [String; COLUMN_COUNT] = Default::default();
        for (slot, field) in fields.iter_mut().zip(record.iter()) {
            *slot = field.to_string();
        }
        rows.push(Row::from(fields));
    }
    Ok(rows)
}

/// Write rows as tab-separated lines, each terminated by `\n`.
pub fn write_rows<W: Write>(writer: W, rows: &[Row]) -> Result<(), IoError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    for row in rows {
        writer.write_record(row.fields()).map_err(|e| IoError::write(None, e))?;
    }

    writer.flush().map_err(|e| IoError::write(None, e))?;
    Ok(())
}

/// Render rows in the file format.
pub fn to_string(rows: &[Row]) -> Result<String, IoError> {
    let mut buffer = Vec::new();
    write_rows(&mut buffer, rows)?;
    String::from_utf8(buffer).map_err(|e| IoError::write(None, e))
}

pub fn export(rows: &[Row], path: &Path) -> Result<(), IoError> {
    log::info!("Trying to save to {}", path.display());
    let file = File::create(path).map_err(|e| IoError::open(path, e))?;
    write_rows(file, rows).map_err(|e| match e {
        IoError::Write { message, .. } => IoError::write(Some(path), message),
        other => other,
    })?;
    log::info!("Saved {} row(s) to {}", rows.len(), path.display());
    Ok(())
}
