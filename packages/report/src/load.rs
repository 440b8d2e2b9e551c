//! Reading scan payloads exported from the dashboard API.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use qrtrack_scan_models::{ScanPayload, ScanRecord};

use crate::ReportError;

/// Decodes scans from a JSON reader holding either a bare scan array or an
/// analytics response object.
///
/// # Errors
///
/// Returns [`ReportError::Json`] if the payload does not decode.
pub fn read_scans<R: Read>(reader: R) -> Result<Vec<ScanRecord>, ReportError> {
    let payload: ScanPayload = serde_json::from_reader(reader)?;
    Ok(payload.into_scans())
}

/// Reads scans from a JSON file.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the file cannot be opened, or
/// [`ReportError::Json`] if it does not decode.
pub fn load_scans(path: &Path) -> Result<Vec<ScanRecord>, ReportError> {
    let file = File::open(path).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let scans = read_scans(BufReader::new(file))?;
    log::info!("Loaded {} scans from {}", scans.len(), path.display());

    Ok(scans)
}
