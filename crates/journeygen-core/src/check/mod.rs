use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::Result;
use crate::generate::engine::execute_plan;
use crate::lock::types::LockFile;
use crate::output::render;

/// Result of regenerating a dataset from its lock file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReproReport {
    pub reproducible: bool,
    pub expected_hash: String,
    pub actual_hash: String,
    pub num_records: usize,
    pub seed: u64,
}

impl ReproReport {
    /// Human-readable summary for terminal output.
    pub fn summary(&self) -> String {
        if self.reproducible {
            return format!(
                "Output reproduces: {} records from seed {} (sha256 {}).",
                self.num_records,
                self.seed,
                short_hash(&self.actual_hash)
            );
        }

        [
            "Output does not reproduce:".to_string(),
            format!("  seed:     {}", self.seed),
            format!("  records:  {}", self.num_records),
            format!("  expected: {}", self.expected_hash),
            format!("  actual:   {}", self.actual_hash),
        ]
        .join("\n")
    }
}

fn short_hash(hash: &str) -> &str {
    &hash[..hash.len().min(16)]
}

/// SHA-256 of the given bytes, lowercase hex.
pub fn compute_output_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Regenerate the dataset described by a lock file in memory and compare its
/// digest against the recorded one.
pub fn verify_lock(lock: &LockFile) -> Result<ReproReport> {
    let plan = lock.plan();
    let records = execute_plan(&plan, None)?;
    let bytes = render(lock.format, &records)?;
    let actual_hash = compute_output_hash(&bytes);
    debug!(expected = %lock.output_hash, actual = %actual_hash, "verified lock");

    Ok(ReproReport {
        reproducible: actual_hash == lock.output_hash,
        expected_hash: lock.output_hash.clone(),
        actual_hash,
        num_records: plan.num_records,
        seed: plan.seed,
    })
}
