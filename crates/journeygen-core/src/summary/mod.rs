//! # Summary
//!
//! Consumer-side view of a generated file: read it back and compute the
//! aggregations a reporting layer needs (funnel counts, segment mix,
//! per-group means, monthly timeline, weekly retention).

pub mod reader;
pub mod stats;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{JourneyGenError, Result};

pub use reader::{read_csv, JourneyObservation, Retention};
pub use stats::{summarize, JourneySummary};

/// Open and parse a journey CSV file.
pub fn read_csv_file(path: &Path) -> Result<Vec<JourneyObservation>> {
    let file = File::open(path).map_err(|e| JourneyGenError::Output {
        message: format!("Failed to open {}", path.display()),
        source: e,
    })?;
    read_csv(BufReader::new(file))
}
