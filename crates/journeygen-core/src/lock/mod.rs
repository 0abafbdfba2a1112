//! # Lock File
//!
//! The `journeygen.lock` file stores the seed, record count, format and
//! output digest of a generation run so the exact same dataset can be
//! reproduced and verified later with `journeygen check`.
//!
//! Treat it as a machine-generated artifact, not a hand-editable config file.
//! If it goes stale, delete it and run `journeygen generate` again.

pub mod types;

use std::fs;
use std::path::Path;

use self::types::LockFile;
use crate::error::{JourneyGenError, Result};
use crate::output::write_atomic;

/// Default lock file name.
pub const LOCK_FILE_NAME: &str = "journeygen.lock";

/// Write a lock file to disk atomically.
pub fn write_lock_file(lock: &LockFile, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(lock).map_err(|e| JourneyGenError::LockFile {
        message: format!("Failed to serialize lock file: {}", e),
    })?;
    write_atomic(path, json.as_bytes())
}

/// Read a lock file from disk.
pub fn read_lock_file(path: &Path) -> Result<LockFile> {
    let content = fs::read_to_string(path).map_err(|e| JourneyGenError::Output {
        message: format!("Failed to read lock file from {}", path.display()),
        source: e,
    })?;
    let lock: LockFile = serde_json::from_str(&content).map_err(|e| JourneyGenError::LockFile {
        message: format!("Failed to parse lock file: {}", e),
    })?;
    if lock.num_records == 0 {
        return Err(JourneyGenError::LockFile {
            message: "num_records in lock file must be greater than zero".to_string(),
        });
    }
    Ok(lock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::plan::GenerationPlan;
    use crate::output::OutputFormat;
    use tempfile::tempdir;

    fn make_lock() -> LockFile {
        LockFile::new(
            &GenerationPlan::new(100, 42).unwrap(),
            OutputFormat::Csv,
            "customer_journey_data.csv".to_string(),
            "abc123".to_string(),
        )
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOCK_FILE_NAME);

        write_lock_file(&make_lock(), &path).unwrap();
        let loaded = read_lock_file(&path).unwrap();

        assert_eq!(loaded.output_hash, "abc123");
        assert_eq!(loaded.seed, 42);
        assert_eq!(loaded.num_records, 100);
        assert_eq!(loaded.format, OutputFormat::Csv);
        assert_eq!(loaded.plan(), GenerationPlan::new(100, 42).unwrap());
    }

    #[test]
    fn test_format_serialized_lowercase() {
        let json = serde_json::to_string(&make_lock()).unwrap();
        assert!(json.contains("\"format\":\"csv\""));
    }

    #[test]
    fn test_read_nonexistent_file() {
        let result = read_lock_file(Path::new("/nonexistent/journeygen.lock"));
        assert!(matches!(result, Err(JourneyGenError::Output { .. })));
    }

    #[test]
    fn test_read_garbage_is_lock_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOCK_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            read_lock_file(&path),
            Err(JourneyGenError::LockFile { .. })
        ));
    }

    #[test]
    fn test_zero_records_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOCK_FILE_NAME);
        let mut lock = make_lock();
        lock.num_records = 0;
        std::fs::write(&path, serde_json::to_string(&lock).unwrap()).unwrap();
        assert!(read_lock_file(&path).is_err());
    }
}
