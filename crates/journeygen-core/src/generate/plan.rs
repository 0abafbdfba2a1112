use serde::{Deserialize, Serialize};

use crate::error::{JourneyGenError, Result};

/// Seed used when none is supplied on the command line or in config.
pub const DEFAULT_SEED: u64 = 42;

/// Default number of journey events per run.
pub const DEFAULT_RECORD_COUNT: usize = 10_000;

/// What to generate: how many records, from which seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationPlan {
    pub num_records: usize,
    pub seed: u64,
}

impl GenerationPlan {
    /// Build a plan, rejecting a zero record count up front so no output
    /// stage ever starts for an invalid request.
    pub fn new(num_records: usize, seed: u64) -> Result<Self> {
        if num_records == 0 {
            return Err(JourneyGenError::invalid_record_count(num_records));
        }
        Ok(Self { num_records, seed })
    }
}

impl Default for GenerationPlan {
    fn default() -> Self {
        Self {
            num_records: DEFAULT_RECORD_COUNT,
            seed: DEFAULT_SEED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_records_rejected() {
        let err = GenerationPlan::new(0, DEFAULT_SEED).unwrap_err();
        assert!(matches!(err, JourneyGenError::InvalidArgument { .. }));
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn test_default_plan() {
        let plan = GenerationPlan::default();
        assert_eq!(plan.num_records, 10_000);
        assert_eq!(plan.seed, 42);
    }
}
