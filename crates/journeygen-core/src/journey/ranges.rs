//! # Gated Ranges
//!
//! Static lookup tables mapping each categorical value to the half-open
//! sampling intervals of the numeric fields it gates. The generator consults
//! these per field instead of branching, so adding a stage or retuning a
//! range is a one-line table edit.

use chrono::{DateTime, NaiveDateTime};
use rand::Rng;

use super::types::{Segment, Stage};

/// Half-open real interval `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealRange {
    pub low: f64,
    pub high: f64,
}

impl RealRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value < self.high
    }

    pub fn sample(&self, rng: &mut impl Rng) -> f64 {
        rng.random_range(self.low..self.high)
    }
}

/// Half-open integer interval `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRange {
    pub low: u32,
    pub high: u32,
}

impl IntRange {
    pub const fn new(low: u32, high: u32) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: u32) -> bool {
        value >= self.low && value < self.high
    }

    pub fn sample(&self, rng: &mut impl Rng) -> u32 {
        rng.random_range(self.low..self.high)
    }
}

/// Half-open window of whole seconds since the Unix epoch, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampRange {
    pub start_secs: i64,
    pub end_secs: i64,
}

impl TimestampRange {
    pub fn start(&self) -> NaiveDateTime {
        epoch_seconds(self.start_secs)
    }

    pub fn end(&self) -> NaiveDateTime {
        epoch_seconds(self.end_secs)
    }

    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        let secs = ts.and_utc().timestamp();
        secs >= self.start_secs && secs < self.end_secs
    }

    pub fn sample(&self, rng: &mut impl Rng) -> NaiveDateTime {
        epoch_seconds(rng.random_range(self.start_secs..self.end_secs))
    }
}

/// Bounds must lie inside chrono's representable range; anything outside
/// collapses to the Unix epoch in release builds.
fn epoch_seconds(secs: i64) -> NaiveDateTime {
    let dt = DateTime::from_timestamp(secs, 0);
    debug_assert!(dt.is_some(), "timestamp {} out of range", secs);
    dt.map(|dt| dt.naive_utc()).unwrap_or_default()
}

/// Ranges gated by [`Stage`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageProfile {
    pub stage: Stage,
    /// Selection probability for the stage draw.
    pub weight: f64,
    /// Shared by `conversion_rate` and `click_through_rate`.
    pub rate: RealRange,
    pub bounce_rate: RealRange,
    pub page_views: IntRange,
}

/// Ranges gated by [`Segment`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProfile {
    pub segment: Segment,
    pub weight: f64,
    pub engagement_score: RealRange,
    pub retention_rate: RealRange,
}

/// Stage table, in `Stage::ALL` order.
pub static STAGE_PROFILES: [StageProfile; 3] = [
    StageProfile {
        stage: Stage::Awareness,
        weight: 0.5,
        rate: RealRange::new(0.05, 0.1),
        bounce_rate: RealRange::new(40.0, 80.0),
        page_views: IntRange::new(20, 40),
    },
    StageProfile {
        stage: Stage::Consideration,
        weight: 0.3,
        rate: RealRange::new(0.1, 0.2),
        bounce_rate: RealRange::new(40.0, 80.0),
        page_views: IntRange::new(30, 60),
    },
    StageProfile {
        stage: Stage::Decision,
        weight: 0.2,
        rate: RealRange::new(0.2, 0.3),
        bounce_rate: RealRange::new(20.0, 40.0),
        page_views: IntRange::new(40, 80),
    },
];

/// Segment table, in `Segment::ALL` order.
pub static SEGMENT_PROFILES: [SegmentProfile; 2] = [
    SegmentProfile {
        segment: Segment::Frequent,
        weight: 0.7,
        engagement_score: RealRange::new(50.0, 100.0),
        retention_rate: RealRange::new(0.5, 0.9),
    },
    SegmentProfile {
        segment: Segment::OneTime,
        weight: 0.3,
        engagement_score: RealRange::new(20.0, 50.0),
        retention_rate: RealRange::new(0.1, 0.5),
    },
];

/// Customer identifiers are drawn from `[1, 1000]` inclusive.
pub const CUSTOMER_ID: IntRange = IntRange::new(1, 1001);

/// 2018-01-01T00:00:00Z up to, not including, 2023-01-01T00:00:00Z.
pub const TIMESTAMP_WINDOW: TimestampRange = TimestampRange {
    start_secs: 1_514_764_800,
    end_secs: 1_672_531_200,
};

/// Retention period in days.
pub const RETENTION_PERIOD: IntRange = IntRange::new(1, 365);

pub fn stage_profile(stage: Stage) -> &'static StageProfile {
    match stage {
        Stage::Awareness => &STAGE_PROFILES[0],
        Stage::Consideration => &STAGE_PROFILES[1],
        Stage::Decision => &STAGE_PROFILES[2],
    }
}

pub fn segment_profile(segment: Segment) -> &'static SegmentProfile {
    match segment {
        Segment::Frequent => &SEGMENT_PROFILES[0],
        Segment::OneTime => &SEGMENT_PROFILES[1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_in_enum_order() {
        for (profile, stage) in STAGE_PROFILES.iter().zip(Stage::ALL) {
            assert_eq!(profile.stage, stage);
            assert_eq!(stage_profile(stage).stage, stage);
        }
        for (profile, segment) in SEGMENT_PROFILES.iter().zip(Segment::ALL) {
            assert_eq!(profile.segment, segment);
            assert_eq!(segment_profile(segment).segment, segment);
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        let stage_total: f64 = STAGE_PROFILES.iter().map(|p| p.weight).sum();
        let segment_total: f64 = SEGMENT_PROFILES.iter().map(|p| p.weight).sum();
        assert!((stage_total - 1.0).abs() < 1e-12);
        assert!((segment_total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_decision_bounce_is_lower_band() {
        assert_eq!(
            stage_profile(Stage::Decision).bounce_rate,
            RealRange::new(20.0, 40.0)
        );
        assert_eq!(
            stage_profile(Stage::Awareness).bounce_rate,
            stage_profile(Stage::Consideration).bounce_rate
        );
    }

    #[test]
    fn test_range_bounds_are_half_open() {
        let r = RealRange::new(0.1, 0.2);
        assert!(r.contains(0.1));
        assert!(!r.contains(0.2));

        let i = IntRange::new(20, 40);
        assert!(i.contains(20));
        assert!(i.contains(39));
        assert!(!i.contains(40));
        assert!(CUSTOMER_ID.contains(1000));
        assert!(!CUSTOMER_ID.contains(0));
    }

    #[test]
    fn test_timestamp_window_bounds() {
        assert_eq!(
            TIMESTAMP_WINDOW.start().to_string(),
            "2018-01-01 00:00:00"
        );
        assert_eq!(TIMESTAMP_WINDOW.end().to_string(), "2023-01-01 00:00:00");
        assert!(TIMESTAMP_WINDOW.contains(&TIMESTAMP_WINDOW.start()));
        assert!(!TIMESTAMP_WINDOW.contains(&TIMESTAMP_WINDOW.end()));
    }

    #[test]
    fn test_timestamp_window_is_representable() {
        assert!(DateTime::from_timestamp(TIMESTAMP_WINDOW.start_secs, 0).is_some());
        assert!(DateTime::from_timestamp(TIMESTAMP_WINDOW.end_secs - 1, 0).is_some());
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "out of range")]
    fn test_unrepresentable_bound_panics_in_debug() {
        let window = TimestampRange {
            start_secs: i64::MAX - 1,
            end_secs: i64::MAX,
        };
        window.start();
    }
}
