use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Column names of the journey table, in output order.
pub const COLUMNS: [&str; 11] = [
    "customer_id",
    "stage",
    "segment",
    "conversion_rate",
    "click_through_rate",
    "engagement_score",
    "bounce_rate",
    "page_views",
    "timestamp",
    "retention_period",
    "retention_rate",
];

/// Phase of a simulated customer's journey.
///
/// Serialized as the capitalized literal (`Awareness`, ...). Downstream
/// consumers key colors and groupings on these exact strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    Awareness,
    Consideration,
    Decision,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Awareness, Stage::Consideration, Stage::Decision];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Awareness => "Awareness",
            Stage::Consideration => "Consideration",
            Stage::Decision => "Decision",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Awareness" => Ok(Stage::Awareness),
            "Consideration" => Ok(Stage::Consideration),
            "Decision" => Ok(Stage::Decision),
            other => Err(format!(
                "unknown stage '{}'. Expected one of: Awareness, Consideration, Decision",
                other
            )),
        }
    }
}

/// Customer classification that gates engagement and retention ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Segment {
    #[serde(rename = "frequent")]
    Frequent,
    #[serde(rename = "one_time")]
    OneTime,
}

impl Segment {
    pub const ALL: [Segment; 2] = [Segment::Frequent, Segment::OneTime];

    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Frequent => "frequent",
            Segment::OneTime => "one_time",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Segment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "frequent" => Ok(Segment::Frequent),
            "one_time" => Ok(Segment::OneTime),
            other => Err(format!(
                "unknown segment '{}'. Expected one of: frequent, one_time",
                other
            )),
        }
    }
}

/// One simulated customer-touchpoint event.
///
/// Field order matches [`COLUMNS`]; serde serializes fields in declaration
/// order, so JSON output keeps the same column order as CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyRecord {
    pub customer_id: u32,
    pub stage: Stage,
    pub segment: Segment,
    pub conversion_rate: f64,
    pub click_through_rate: f64,
    pub engagement_score: f64,
    pub bounce_rate: f64,
    pub page_views: u32,
    #[serde(with = "iso_seconds")]
    pub timestamp: NaiveDateTime,
    pub retention_period: u32,
    pub retention_rate: f64,
}

/// ISO-8601 timestamp format used in every output format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

impl JourneyRecord {
    /// Render each field as it appears in delimited text, in column order.
    pub fn to_fields(&self) -> [String; 11] {
        [
            self.customer_id.to_string(),
            self.stage.as_str().to_string(),
            self.segment.as_str().to_string(),
            self.conversion_rate.to_string(),
            self.click_through_rate.to_string(),
            self.engagement_score.to_string(),
            self.bounce_rate.to_string(),
            self.page_views.to_string(),
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.retention_period.to_string(),
            self.retention_rate.to_string(),
        ]
    }
}

mod iso_seconds {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&ts.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> JourneyRecord {
        JourneyRecord {
            customer_id: 7,
            stage: Stage::Decision,
            segment: Segment::OneTime,
            conversion_rate: 0.25,
            click_through_rate: 0.21,
            engagement_score: 30.5,
            bounce_rate: 22.0,
            page_views: 41,
            timestamp: chrono::NaiveDate::from_ymd_opt(2020, 2, 29)
                .unwrap()
                .and_hms_opt(13, 4, 5)
                .unwrap(),
            retention_period: 120,
            retention_rate: 0.3,
        }
    }

    #[test]
    fn test_category_literals_round_trip() {
        for stage in Stage::ALL {
            assert_eq!(stage.as_str().parse::<Stage>().unwrap(), stage);
        }
        for segment in Segment::ALL {
            assert_eq!(segment.as_str().parse::<Segment>().unwrap(), segment);
        }
    }

    #[test]
    fn test_category_parse_is_case_sensitive() {
        assert!("awareness".parse::<Stage>().is_err());
        assert!("Frequent".parse::<Segment>().is_err());
        assert!("one-time".parse::<Segment>().is_err());
    }

    #[test]
    fn test_to_fields_follows_column_order() {
        let fields = sample_record().to_fields();
        assert_eq!(fields.len(), COLUMNS.len());
        assert_eq!(fields[0], "7");
        assert_eq!(fields[1], "Decision");
        assert_eq!(fields[2], "one_time");
        assert_eq!(fields[7], "41");
        assert_eq!(fields[8], "2020-02-29T13:04:05");
        assert_eq!(fields[9], "120");
    }

    #[test]
    fn test_json_uses_literal_categories_and_iso_timestamp() {
        let json = serde_json::to_string(&sample_record()).unwrap();
        assert!(json.contains("\"stage\":\"Decision\""));
        assert!(json.contains("\"segment\":\"one_time\""));
        assert!(json.contains("\"timestamp\":\"2020-02-29T13:04:05\""));

        let back: JourneyRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample_record());
    }
}
