use std::io::Write;

use crate::error::{JourneyGenError, Result};
use crate::journey::types::{JourneyRecord, COLUMNS};

/// Write journey records as delimited text: one header row, then one line per
/// record. No index column is written.
pub fn write_csv<W: Write>(writer: &mut W, records: &[JourneyRecord]) -> Result<()> {
    writeln!(
        writer,
        "{}",
        COLUMNS
            .iter()
            .map(|c| csv_escape(c))
            .collect::<Vec<_>>()
            .join(",")
    )
    .map_err(|e| JourneyGenError::Output {
        message: "writing CSV header".to_string(),
        source: e,
    })?;

    for (row_idx, record) in records.iter().enumerate() {
        let values: Vec<String> = record.to_fields().iter().map(|v| csv_escape(v)).collect();

        writeln!(writer, "{}", values.join(",")).map_err(|e| JourneyGenError::Output {
            message: format!("writing CSV row {}", row_idx),
            source: e,
        })?;
    }

    Ok(())
}

/// Escape a string for CSV: quote if it contains comma, quote, or newline.
pub(crate) fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
