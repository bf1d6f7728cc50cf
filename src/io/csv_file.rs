use crate::{CatalogError, Result};
use std::fs::{self, File};
use std::io::{BufReader, ErrorKind};
use std::path::Path;
use tempfile::NamedTempFile;

/// Raw contents of a delimited file: header plus data rows tagged with their
/// 1-based line numbers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<(u64, Vec<String>)>,
}

/// Read a comma-delimited file whose first row is the header.
///
/// Rows are returned as-is; field-count checks against the header are left to
/// the caller so the error can name the offending line.
pub fn read_table(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CatalogError::FileNotFound(path.to_path_buf()),
        _ => CatalogError::Io(e),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record.map_err(csv_error)?,
        None => return Err(CatalogError::malformed(1, "missing header row")),
    };
    let mut header: Vec<String> = header.iter().map(str::to_string).collect();
    if let Some(first) = header.first_mut() {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(csv_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        rows.push((line, record.iter().map(str::to_string).collect()));
    }

    tracing::debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(Table { header, rows })
}

/// Write a header and rows to `path`, replacing any existing file.
///
/// Output goes to a temporary file next to `path` that is renamed into place
/// once fully written, so the previous contents survive a failed write.
pub fn write_table<I, R>(path: &Path, header: &[String], rows: I) -> Result<()>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp_file = NamedTempFile::new_in(parent)?;
    {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(temp_file.as_file_mut());

        writer.write_record(header).map_err(csv_error)?;
        let mut count = 0usize;
        for row in rows {
            writer.write_record(row).map_err(csv_error)?;
            count += 1;
        }
        writer.flush()?;
        tracing::debug!("Wrote {} rows to {}", count, path.display());
    }

    temp_file.as_file().sync_all()?;
    temp_file.persist(path).map_err(|e| CatalogError::Io(e.error))?;
    Ok(())
}

fn csv_error(err: csv::Error) -> CatalogError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => CatalogError::Io(e),
        _ => CatalogError::malformed(line, message),
    }
}
