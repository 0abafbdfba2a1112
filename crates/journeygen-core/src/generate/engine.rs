use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use tracing::debug;

use crate::error::{JourneyGenError, Result};
use crate::generate::plan::GenerationPlan;
use crate::journey::ranges::{
    segment_profile, stage_profile, CUSTOMER_ID, RETENTION_PERIOD, SEGMENT_PROFILES,
    STAGE_PROFILES, TIMESTAMP_WINDOW,
};
use crate::journey::types::JourneyRecord;

/// Progress reporting batch size — avoids terminal I/O overhead on every row.
const PROGRESS_BATCH_SIZE: usize = 100;

/// Execute a generation plan with a freshly seeded `StdRng`.
///
/// Same plan, same build: byte-identical records. The seed only pins the
/// stream for this crate's RNG; it does not reproduce datasets produced by
/// other tools with the same seed.
pub fn execute_plan(
    plan: &GenerationPlan,
    progress_callback: Option<&dyn Fn(usize, usize)>,
) -> Result<Vec<JourneyRecord>> {
    let mut rng = StdRng::seed_from_u64(plan.seed);
    debug!(
        num_records = plan.num_records,
        seed = plan.seed,
        "executing generation plan"
    );
    generate_with_progress(plan.num_records, &mut rng, progress_callback)
}

/// Generate `num_records` journey events from the given random source.
///
/// The caller owns the RNG, so tests can inject any deterministic source.
pub fn generate_journeys(num_records: usize, rng: &mut impl Rng) -> Result<Vec<JourneyRecord>> {
    generate_with_progress(num_records, rng, None)
}

fn generate_with_progress(
    num_records: usize,
    rng: &mut impl Rng,
    progress_callback: Option<&dyn Fn(usize, usize)>,
) -> Result<Vec<JourneyRecord>> {
    if num_records == 0 {
        return Err(JourneyGenError::invalid_record_count(num_records));
    }

    let mut records = Vec::with_capacity(num_records);
    for row_idx in 0..num_records {
        records.push(generate_record(rng));

        if let Some(cb) = progress_callback {
            let done = row_idx + 1;
            if done % PROGRESS_BATCH_SIZE == 0 || done == num_records {
                cb(done, num_records);
            }
        }
    }

    Ok(records)
}

/// Draw one record. The order of draws below is part of the output contract:
/// reordering them changes every dataset produced from a given seed.
fn generate_record(rng: &mut impl Rng) -> JourneyRecord {
    let customer_id = CUSTOMER_ID.sample(rng);

    let stage_idx = weighted_index(STAGE_PROFILES.iter().map(|p| p.weight), rng);
    let stage = STAGE_PROFILES[stage_idx].stage;
    let segment_idx = weighted_index(SEGMENT_PROFILES.iter().map(|p| p.weight), rng);
    let segment = SEGMENT_PROFILES[segment_idx].segment;

    let by_stage = stage_profile(stage);
    let by_segment = segment_profile(segment);

    let conversion_rate = by_stage.rate.sample(rng);
    let click_through_rate = by_stage.rate.sample(rng);
    let engagement_score = by_segment.engagement_score.sample(rng);
    let bounce_rate = by_stage.bounce_rate.sample(rng);
    let page_views = by_stage.page_views.sample(rng);
    let timestamp = TIMESTAMP_WINDOW.sample(rng);
    let retention_period = RETENTION_PERIOD.sample(rng);
    let retention_rate = by_segment.retention_rate.sample(rng);

    JourneyRecord {
        customer_id,
        stage,
        segment,
        conversion_rate,
        click_through_rate,
        engagement_score,
        bounce_rate,
        page_views,
        timestamp,
        retention_period,
        retention_rate,
    }
}

/// Pick an index with probability proportional to its weight, using a single
/// uniform roll against the cumulative weights. A roll that lands past the last
/// bucket through float rounding picks the last index.
fn weighted_index(weights: impl Iterator<Item = f64> + Clone, rng: &mut impl Rng) -> usize {
    let total: f64 = weights.clone().sum();
    let roll: f64 = rng.random::<f64>() * total;

    let mut cumulative = 0.0;
    let mut last = 0;
    for (i, w) in weights.enumerate() {
        cumulative += w;
        if roll < cumulative {
            return i;
        }
        last = i;
    }

    last
}
