//! # Output
//!
//! Serializes generated journey records to CSV or JSON and places the result
//! on disk. Files are written to a temporary sibling and renamed into place,
//! so a failed run never leaves a partial table at the destination.

pub mod csv;
pub mod json;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::check::compute_output_hash;
use crate::error::{JourneyGenError, Result};
use crate::journey::types::JourneyRecord;

/// Default output file name.
pub const DEFAULT_OUTPUT_FILE: &str = "customer_journey_data.csv";

/// Supported serialization formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    /// Infer the format from a file extension. Anything other than `.json`
    /// is treated as delimited text.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => OutputFormat::Csv,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Serialize records into the given writer.
pub fn write_records<W: Write>(
    writer: &mut W,
    format: OutputFormat,
    records: &[JourneyRecord],
) -> Result<()> {
    match format {
        OutputFormat::Csv => csv::write_csv(writer, records),
        OutputFormat::Json => json::write_json(writer, records),
    }
}

/// Serialize records into an in-memory buffer.
pub fn render(format: OutputFormat, records: &[JourneyRecord]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_records(&mut buf, format, records)?;
    Ok(buf)
}

/// Write records to `path` atomically and return the SHA-256 digest of the
/// bytes written.
pub fn write_output_file(
    path: &Path,
    format: OutputFormat,
    records: &[JourneyRecord],
) -> Result<String> {
    let bytes = render(format, records)?;
    write_atomic(path, &bytes)?;
    info!(
        path = %path.display(),
        records = records.len(),
        bytes = bytes.len(),
        "wrote output file"
    );
    Ok(compute_output_hash(&bytes))
}

/// Write bytes to a temporary sibling of `path`, sync, then rename into place.
///
/// On any failure the temporary file is removed and `path` is left untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp_path = temp_sibling(path);

    let result = write_then_rename(&tmp_path, path, bytes);

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_then_rename(tmp_path: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = fs::File::create(tmp_path).map_err(|e| JourneyGenError::Output {
        message: format!("Failed to create temp file at {}", tmp_path.display()),
        source: e,
    })?;
    file.write_all(bytes).map_err(|e| JourneyGenError::Output {
        message: format!("Failed to write temp file at {}", tmp_path.display()),
        source: e,
    })?;
    file.sync_all().map_err(|e| JourneyGenError::Output {
        message: format!("Failed to sync {} to disk", tmp_path.display()),
        source: e,
    })?;

    fs::rename(tmp_path, path).map_err(|e| JourneyGenError::Output {
        message: format!(
            "Failed to rename {} → {}",
            tmp_path.display(),
            path.display()
        ),
        source: e,
    })
}

fn temp_sibling(path: &Path) -> PathBuf {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    dir.join(format!(".{}.tmp", name))
}
