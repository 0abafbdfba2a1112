use std::collections::BTreeMap;

use chrono::Datelike;
use indexmap::IndexMap;
use serde::Serialize;

use crate::journey::types::{Segment, Stage};
use crate::summary::reader::JourneyObservation;

/// Aggregate view of a journey table: the funnel, segment mix, per-group
/// means, the engagement matrix, a monthly timeline and a weekly retention
/// curve.
///
/// Every per-group map holds all categories in declaration order, even when a
/// category has no rows; its mean is then `None`.
#[derive(Debug, Clone, Serialize)]
pub struct JourneySummary {
    pub total: usize,
    pub stage_counts: IndexMap<Stage, usize>,
    pub segment_counts: IndexMap<Segment, usize>,
    pub conversion_by_segment: IndexMap<Segment, Option<f64>>,
    pub engagement_by_segment: IndexMap<Segment, Option<f64>>,
    pub bounce_by_stage: IndexMap<Stage, Option<f64>>,
    pub page_views_by_stage: IndexMap<Stage, Option<f64>>,
    pub conversion_by_stage: IndexMap<Stage, Option<f64>>,
    pub click_through_by_stage: IndexMap<Stage, Option<f64>>,
    /// Mean engagement score per segment (rows) and stage (columns).
    pub engagement_matrix: IndexMap<Segment, IndexMap<Stage, Option<f64>>>,
    /// Event counts per calendar month, gaps filled with zero.
    pub monthly_timeline: Vec<MonthlyCount>,
    /// `None` when the input carries no retention columns.
    pub weekly_retention: Option<Vec<WeeklyRetention>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyCount {
    /// `YYYY-MM`
    pub month: String,
    pub counts: IndexMap<Stage, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyRetention {
    /// `retention_period / 7`
    pub week: u32,
    pub mean_retention_rate: f64,
    pub records: usize,
}

impl JourneySummary {
    pub fn stage_share(&self, stage: Stage) -> f64 {
        share(self.stage_counts.get(&stage).copied().unwrap_or(0), self.total)
    }

    pub fn segment_share(&self, segment: Segment) -> f64 {
        share(
            self.segment_counts.get(&segment).copied().unwrap_or(0),
            self.total,
        )
    }
}

fn share(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Running sum and count for a mean.
#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn value(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

fn by_stage<T: Default>() -> IndexMap<Stage, T> {
    Stage::ALL.iter().map(|s| (*s, T::default())).collect()
}

fn by_segment<T: Default>() -> IndexMap<Segment, T> {
    Segment::ALL.iter().map(|s| (*s, T::default())).collect()
}

fn finish<K: std::hash::Hash + Eq + Copy>(means: &IndexMap<K, Mean>) -> IndexMap<K, Option<f64>> {
    means.iter().map(|(k, m)| (*k, m.value())).collect()
}

/// Compute the journey summary.
pub fn summarize(observations: &[JourneyObservation]) -> JourneySummary {
    let mut stage_counts: IndexMap<Stage, usize> = by_stage();
    let mut segment_counts: IndexMap<Segment, usize> = by_segment();
    let mut conversion_by_segment: IndexMap<Segment, Mean> = by_segment();
    let mut engagement_by_segment: IndexMap<Segment, Mean> = by_segment();
    let mut bounce_by_stage: IndexMap<Stage, Mean> = by_stage();
    let mut page_views_by_stage: IndexMap<Stage, Mean> = by_stage();
    let mut conversion_by_stage: IndexMap<Stage, Mean> = by_stage();
    let mut click_through_by_stage: IndexMap<Stage, Mean> = by_stage();
    let mut matrix: IndexMap<Segment, IndexMap<Stage, Mean>> =
        Segment::ALL.iter().map(|s| (*s, by_stage())).collect();
    let mut months: BTreeMap<(i32, u32), IndexMap<Stage, usize>> = BTreeMap::new();
    let mut weeks: BTreeMap<u32, Mean> = BTreeMap::new();
    let mut has_retention = false;

    for obs in observations {
        *stage_counts.entry(obs.stage).or_default() += 1;
        *segment_counts.entry(obs.segment).or_default() += 1;

        conversion_by_segment
            .entry(obs.segment)
            .or_default()
            .add(obs.conversion_rate);
        engagement_by_segment
            .entry(obs.segment)
            .or_default()
            .add(obs.engagement_score);

        bounce_by_stage.entry(obs.stage).or_default().add(obs.bounce_rate);
        page_views_by_stage
            .entry(obs.stage)
            .or_default()
            .add(obs.page_views as f64);
        conversion_by_stage
            .entry(obs.stage)
            .or_default()
            .add(obs.conversion_rate);
        click_through_by_stage
            .entry(obs.stage)
            .or_default()
            .add(obs.click_through_rate);

        matrix
            .entry(obs.segment)
            .or_insert_with(by_stage)
            .entry(obs.stage)
            .or_default()
            .add(obs.engagement_score);

        let month_key = (obs.timestamp.year(), obs.timestamp.month());
        *months
            .entry(month_key)
            .or_insert_with(by_stage)
            .entry(obs.stage)
            .or_default() += 1;

        if let Some(retention) = obs.retention {
            has_retention = true;
            weeks
                .entry(retention.period_days / 7)
                .or_default()
                .add(retention.rate);
        }
    }

    let weekly_retention = has_retention.then(|| {
        weeks
            .iter()
            .filter_map(|(week, m)| {
                m.value().map(|mean| WeeklyRetention {
                    week: *week,
                    mean_retention_rate: mean,
                    records: m.count,
                })
            })
            .collect()
    });

    JourneySummary {
        total: observations.len(),
        stage_counts,
        segment_counts,
        conversion_by_segment: finish(&conversion_by_segment),
        engagement_by_segment: finish(&engagement_by_segment),
        bounce_by_stage: finish(&bounce_by_stage),
        page_views_by_stage: finish(&page_views_by_stage),
        conversion_by_stage: finish(&conversion_by_stage),
        click_through_by_stage: finish(&click_through_by_stage),
        engagement_matrix: matrix.iter().map(|(seg, row)| (*seg, finish(row))).collect(),
        monthly_timeline: fill_months(&months),
        weekly_retention,
    }
}

/// Expand sparse month buckets into a contiguous run from the first to the
/// last observed month.
fn fill_months(months: &BTreeMap<(i32, u32), IndexMap<Stage, usize>>) -> Vec<MonthlyCount> {
    let (Some(first), Some(last)) = (months.keys().next(), months.keys().next_back()) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let (mut year, mut month) = *first;
    loop {
        let counts = months
            .get(&(year, month))
            .cloned()
            .unwrap_or_else(by_stage);
        out.push(MonthlyCount {
            month: format!("{:04}-{:02}", year, month),
            counts,
        });

        if (year, month) == *last {
            break;
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::reader::Retention;
    use chrono::NaiveDate;

    fn obs(stage: Stage, segment: Segment, ymd: (i32, u32, u32)) -> JourneyObservation {
        JourneyObservation {
            customer_id: 1,
            stage,
            segment,
            conversion_rate: 0.1,
            click_through_rate: 0.2,
            engagement_score: 60.0,
            bounce_rate: 50.0,
            page_views: 30,
            timestamp: NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            retention: None,
        }
    }

    #[test]
    fn test_empty_input() {
        let s = summarize(&[]);
        assert_eq!(s.total, 0);
        assert_eq!(s.stage_counts.len(), 3);
        assert!(s.stage_counts.values().all(|c| *c == 0));
        assert!(s.bounce_by_stage.values().all(|m| m.is_none()));
        assert!(s.monthly_timeline.is_empty());
        assert!(s.weekly_retention.is_none());
        assert_eq!(s.stage_share(Stage::Awareness), 0.0);
    }

    #[test]
    fn test_counts_shares_and_means() {
        let mut a = obs(Stage::Awareness, Segment::Frequent, (2020, 1, 5));
        a.bounce_rate = 40.0;
        a.page_views = 20;
        let mut b = obs(Stage::Awareness, Segment::OneTime, (2020, 1, 9));
        b.bounce_rate = 60.0;
        b.page_views = 30;
        b.engagement_score = 30.0;
        let c = obs(Stage::Decision, Segment::Frequent, (2020, 2, 1));

        let s = summarize(&[a, b, c]);
        assert_eq!(s.total, 3);
        assert_eq!(s.stage_counts[&Stage::Awareness], 2);
        assert_eq!(s.stage_counts[&Stage::Consideration], 0);
        assert!((s.stage_share(Stage::Decision) - 1.0 / 3.0).abs() < 1e-12);
        assert!((s.segment_share(Segment::Frequent) - 2.0 / 3.0).abs() < 1e-12);

        assert_eq!(s.bounce_by_stage[&Stage::Awareness], Some(50.0));
        assert_eq!(s.page_views_by_stage[&Stage::Awareness], Some(25.0));
        assert_eq!(s.bounce_by_stage[&Stage::Consideration], None);
        assert_eq!(s.engagement_by_segment[&Segment::OneTime], Some(30.0));
        assert_eq!(
            s.engagement_matrix[&Segment::OneTime][&Stage::Awareness],
            Some(30.0)
        );
        assert_eq!(
            s.engagement_matrix[&Segment::OneTime][&Stage::Decision],
            None
        );
    }

    #[test]
    fn test_stage_order_is_funnel_order() {
        let s = summarize(&[obs(Stage::Decision, Segment::OneTime, (2019, 3, 3))]);
        let stages: Vec<Stage> = s.stage_counts.keys().copied().collect();
        assert_eq!(stages, Stage::ALL.to_vec());
    }

    #[test]
    fn test_monthly_timeline_fills_gaps_across_years() {
        let s = summarize(&[
            obs(Stage::Awareness, Segment::Frequent, (2019, 11, 30)),
            obs(Stage::Decision, Segment::Frequent, (2020, 2, 1)),
            obs(Stage::Decision, Segment::Frequent, (2020, 2, 2)),
        ]);
        let months: Vec<&str> = s.monthly_timeline.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["2019-11", "2019-12", "2020-01", "2020-02"]);
        assert_eq!(s.monthly_timeline[0].counts[&Stage::Awareness], 1);
        assert!(s.monthly_timeline[1].counts.values().all(|c| *c == 0));
        assert_eq!(s.monthly_timeline[3].counts[&Stage::Decision], 2);
    }

    #[test]
    fn test_weekly_retention_buckets() {
        let mut rows = Vec::new();
        for (period, rate) in [(1, 0.2), (6, 0.4), (7, 0.8), (20, 0.5)] {
            let mut o = obs(Stage::Awareness, Segment::Frequent, (2020, 1, 1));
            o.retention = Some(Retention {
                period_days: period,
                rate,
            });
            rows.push(o);
        }

        let weekly = summarize(&rows).weekly_retention.unwrap();
        assert_eq!(weekly.len(), 3);
        assert_eq!(weekly[0].week, 0);
        assert!((weekly[0].mean_retention_rate - 0.3).abs() < 1e-12);
        assert_eq!(weekly[0].records, 2);
        assert_eq!(weekly[1].week, 1);
        assert_eq!(weekly[2].week, 2);
    }

    #[test]
    fn test_summary_serializes_with_literal_keys() {
        let s = summarize(&[obs(Stage::Decision, Segment::OneTime, (2019, 3, 3))]);
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"Decision\":1"));
        assert!(json.contains("\"one_time\""));
    }
}
