use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

use journeygen_core::generate::engine::generate_journeys;
use journeygen_core::journey::types::{JourneyRecord, Segment, Stage, COLUMNS};

/// Seed shared by fixtures, matching the tool's default.
pub const FIXTURE_SEED: u64 = 42;

/// A deterministic RNG for tests that inject their own random source.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Generate `n` records from [`FIXTURE_SEED`].
pub fn sample_records(n: usize) -> Vec<JourneyRecord> {
    let mut rng = seeded_rng(FIXTURE_SEED);
    generate_journeys(n, &mut rng).expect("fixture record count must be positive")
}

/// A hand-built record with fixed values, one per stage/segment pair.
pub fn fixed_record(stage: Stage, segment: Segment) -> JourneyRecord {
    JourneyRecord {
        customer_id: 500,
        stage,
        segment,
        conversion_rate: match stage {
            Stage::Awareness => 0.075,
            Stage::Consideration => 0.15,
            Stage::Decision => 0.25,
        },
        click_through_rate: match stage {
            Stage::Awareness => 0.06,
            Stage::Consideration => 0.12,
            Stage::Decision => 0.22,
        },
        engagement_score: match segment {
            Segment::Frequent => 75.0,
            Segment::OneTime => 35.0,
        },
        bounce_rate: if stage == Stage::Decision { 30.0 } else { 60.0 },
        page_views: match stage {
            Stage::Awareness => 25,
            Stage::Consideration => 45,
            Stage::Decision => 60,
        },
        timestamp: NaiveDate::from_ymd_opt(2020, 6, 15)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid fixture timestamp"),
        retention_period: 70,
        retention_rate: match segment {
            Segment::Frequent => 0.7,
            Segment::OneTime => 0.3,
        },
    }
}

/// The exact header line written to delimited output.
pub fn expected_header() -> String {
    COLUMNS.join(",")
}

/// Drop the named columns from delimited text, for simulating files written
/// by tooling that lacks them.
pub fn drop_columns(csv: &str, drop: &[&str]) -> String {
    let mut lines = csv.lines();
    let Some(header) = lines.next() else {
        return String::new();
    };
    let keep: Vec<usize> = header
        .split(',')
        .enumerate()
        .filter(|(_, name)| !drop.contains(name))
        .map(|(i, _)| i)
        .collect();

    let project = |line: &str| {
        let fields: Vec<&str> = line.split(',').collect();
        keep.iter()
            .filter_map(|i| fields.get(*i).copied())
            .collect::<Vec<_>>()
            .join(",")
    };

    let mut out = project(header);
    out.push('\n');
    for line in lines {
        out.push_str(&project(line));
        out.push('\n');
    }
    out
}
