use std::io::Write;

use crate::error::{JourneyGenError, Result};
use crate::journey::types::JourneyRecord;

/// Write journey records as a JSON array using streaming serialization.
///
/// Each record is serialized on its own and written straight to the writer,
/// so memory stays flat no matter how many records are written. Keys follow
/// the CSV column order.
pub fn write_json<W: Write>(writer: &mut W, records: &[JourneyRecord]) -> Result<()> {
    write_str(writer, "[\n")?;

    for (row_idx, record) in records.iter().enumerate() {
        let line = serde_json::to_string(record).map_err(|e| JourneyGenError::Serialization {
            message: format!("record {}: {}", row_idx, e),
        })?;
        write_str(writer, "  ")?;
        write_str(writer, &line)?;
        if row_idx < records.len() - 1 {
            write_str(writer, ",")?;
        }
        write_str(writer, "\n")?;
    }

    write_str(writer, "]\n")?;

    Ok(())
}

/// Helper to write a string slice and map IO errors.
fn write_str<W: Write>(writer: &mut W, s: &str) -> Result<()> {
    writer
        .write_all(s.as_bytes())
        .map_err(|e| JourneyGenError::Output {
            message: "writing JSON".to_string(),
            source: e,
        })
}
