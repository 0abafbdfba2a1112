use serde::{Deserialize, Serialize};

use crate::generate::plan::GenerationPlan;
use crate::output::OutputFormat;

/// The journeygen.lock file structure for deterministic reproducibility.
///
/// `journeygen generate` writes this next to its output. `journeygen check`
/// regenerates the dataset from the recorded seed and row count and compares
/// the SHA-256 digest, so a teammate can confirm their build produces the
/// same bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockFile {
    /// journeygen version that generated this lock file.
    pub journeygen_version: String,
    /// Random seed used for generation.
    pub seed: u64,
    /// Number of records generated.
    pub num_records: usize,
    /// Serialization format of the output file.
    pub format: OutputFormat,
    /// Output path as given on the command line.
    pub output: String,
    /// SHA-256 of the output file bytes, hex encoded.
    pub output_hash: String,
    /// Timestamp when the lock file was created.
    pub created_at: String,
}

impl LockFile {
    pub fn new(
        plan: &GenerationPlan,
        format: OutputFormat,
        output: String,
        output_hash: String,
    ) -> Self {
        Self {
            journeygen_version: env!("CARGO_PKG_VERSION").to_string(),
            seed: plan.seed,
            num_records: plan.num_records,
            format,
            output,
            output_hash,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// The plan this lock file was produced from.
    pub fn plan(&self) -> GenerationPlan {
        GenerationPlan {
            num_records: self.num_records,
            seed: self.seed,
        }
    }
}
