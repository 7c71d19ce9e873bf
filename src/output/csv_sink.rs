//! CSV record sink
//!
//! Records are appended to a single CSV file. The header row is written only
//! when the file is created; later calls append data rows after checking that
//! the existing header matches the records being written.

use crate::record::ProductRecord;
use crate::SinkError;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;

/// Appends records to the CSV file at `destination`
///
/// # Behaviour
///
/// | Destination | Action |
/// |-------------|--------|
/// | Missing or empty | Create it (and parent directories), write header, write rows |
/// | Header matches records | Append rows only |
/// | Header differs | Fail with `SinkError::HeaderMismatch`, nothing written |
///
/// An empty `records` slice writes nothing and does not create the file.
///
/// # Returns
///
/// * `Ok(usize)` - Number of data rows written
/// * `Err(SinkError)` - The file could not be read, created or written
pub fn append_records(records: &[ProductRecord], destination: &Path) -> Result<usize, SinkError> {
    let Some(first) = records.first() else {
        tracing::info!("No records to write to {}", destination.display());
        return Ok(0);
    };
    let headers = first.headers();

    let fresh = is_fresh(destination)?;
    if fresh {
        create_parent_dirs(destination)?;
    } else {
        check_header(destination, &headers)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(destination)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if fresh {
        writer.write_record(&headers)?;
    }
    for record in records {
        writer.write_record(record.cells())?;
    }
    writer.flush()?;

    tracing::info!(
        "Wrote {} records to {}{}",
        records.len(),
        destination.display(),
        if fresh { " (new file)" } else { "" }
    );

    Ok(records.len())
}

/// A destination that does not exist or has no content gets a header
fn is_fresh(destination: &Path) -> Result<bool, SinkError> {
    match fs::metadata(destination) {
        Ok(metadata) => Ok(metadata.len() == 0),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(true),
        Err(e) => Err(e.into()),
    }
}

fn create_parent_dirs(destination: &Path) -> Result<(), SinkError> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Compares the first row of an existing file with the record columns
fn check_header(destination: &Path, headers: &[&str]) -> Result<(), SinkError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(destination)?;

    let existing = match reader.records().next() {
        Some(row) => row?,
        None => csv::StringRecord::new(),
    };

    if existing.iter().eq(headers.iter().copied()) {
        Ok(())
    } else {
        Err(SinkError::HeaderMismatch {
            path: destination.display().to_string(),
            existing: existing.iter().collect::<Vec<_>>().join(","),
            expected: headers.join(","),
        })
    }
}
