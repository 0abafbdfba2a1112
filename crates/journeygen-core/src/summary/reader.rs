use std::collections::HashMap;
use std::io::BufRead;

use chrono::NaiveDateTime;

use crate::error::{JourneyGenError, Result};
use crate::journey::types::{JourneyRecord, Segment, Stage, TIMESTAMP_FORMAT};

/// Timestamp layouts accepted on read. The first is what journeygen writes;
/// the second is the space-separated form common in spreadsheet exports.
const ACCEPTED_TIMESTAMP_FORMATS: [&str; 2] = [TIMESTAMP_FORMAT, "%Y-%m-%d %H:%M:%S"];

const REQUIRED_COLUMNS: [&str; 9] = [
    "customer_id",
    "stage",
    "segment",
    "conversion_rate",
    "click_through_rate",
    "engagement_score",
    "bounce_rate",
    "page_views",
    "timestamp",
];

/// Retention columns, read only when both are present in the header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Retention {
    pub period_days: u32,
    pub rate: f64,
}

/// A journey event as seen by a consumer of the output file.
///
/// Unlike [`JourneyRecord`], the retention columns are optional: files
/// produced by older tooling may not carry them.
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyObservation {
    pub customer_id: u32,
    pub stage: Stage,
    pub segment: Segment,
    pub conversion_rate: f64,
    pub click_through_rate: f64,
    pub engagement_score: f64,
    pub bounce_rate: f64,
    pub page_views: u32,
    pub timestamp: NaiveDateTime,
    pub retention: Option<Retention>,
}

impl From<&JourneyRecord> for JourneyObservation {
    fn from(r: &JourneyRecord) -> Self {
        Self {
            customer_id: r.customer_id,
            stage: r.stage,
            segment: r.segment,
            conversion_rate: r.conversion_rate,
            click_through_rate: r.click_through_rate,
            engagement_score: r.engagement_score,
            bounce_rate: r.bounce_rate,
            page_views: r.page_views,
            timestamp: r.timestamp,
            retention: Some(Retention {
                period_days: r.retention_period,
                rate: r.retention_rate,
            }),
        }
    }
}

/// Read a delimited journey table.
///
/// Columns are located by header name, so column order does not matter and
/// extra columns are ignored. Blank lines are skipped. Line numbers in errors
/// are 1-based and count the header.
pub fn read_csv<R: BufRead>(reader: R) -> Result<Vec<JourneyObservation>> {
    let mut lines = reader.lines().enumerate();

    let header = match lines.next() {
        Some((_, line)) => line.map_err(|e| JourneyGenError::Output {
            message: "reading CSV header".to_string(),
            source: e,
        })?,
        None => {
            return Err(JourneyGenError::Parse {
                line: 1,
                message: "file is empty; expected a header row".to_string(),
            })
        }
    };
    let layout = ColumnLayout::from_header(&header)?;

    let mut observations = Vec::new();
    for (idx, line) in lines {
        let line_no = idx + 1;
        let line = line.map_err(|e| JourneyGenError::Output {
            message: format!("reading CSV line {}", line_no),
            source: e,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_csv_line(&line);
        observations.push(layout.parse_row(&fields, line_no)?);
    }

    Ok(observations)
}

struct ColumnLayout {
    positions: HashMap<&'static str, usize>,
    retention: Option<(usize, usize)>,
}

impl ColumnLayout {
    fn from_header(header: &str) -> Result<Self> {
        let names: Vec<String> = split_csv_line(header.trim_start_matches('\u{feff}'));
        let find = |col: &str| names.iter().position(|n| n.trim() == col);

        let mut positions = HashMap::new();
        for col in REQUIRED_COLUMNS {
            let pos = find(col).ok_or_else(|| JourneyGenError::Parse {
                line: 1,
                message: format!("missing required column '{}'", col),
            })?;
            positions.insert(col, pos);
        }

        let retention = match (find("retention_period"), find("retention_rate")) {
            (Some(p), Some(r)) => Some((p, r)),
            _ => None,
        };

        Ok(Self {
            positions,
            retention,
        })
    }

    fn field<'a>(&self, fields: &'a [String], col: &'static str, line: usize) -> Result<&'a str> {
        let pos = self.positions.get(col).copied().unwrap_or(usize::MAX);
        fields
            .get(pos)
            .map(|s| s.trim())
            .ok_or_else(|| JourneyGenError::Parse {
                line,
                message: format!("row is missing a value for '{}'", col),
            })
    }

    fn parse_row(&self, fields: &[String], line: usize) -> Result<JourneyObservation> {
        let retention = match self.retention {
            Some((p, r)) => {
                let period = fields.get(p).map(|s| s.trim()).unwrap_or("");
                let rate = fields.get(r).map(|s| s.trim()).unwrap_or("");
                Some(Retention {
                    period_days: parse_num(period, "retention_period", line)?,
                    rate: parse_num(rate, "retention_rate", line)?,
                })
            }
            None => None,
        };

        Ok(JourneyObservation {
            customer_id: parse_num(self.field(fields, "customer_id", line)?, "customer_id", line)?,
            stage: self
                .field(fields, "stage", line)?
                .parse::<Stage>()
                .map_err(|message| JourneyGenError::Parse { line, message })?,
            segment: self
                .field(fields, "segment", line)?
                .parse::<Segment>()
                .map_err(|message| JourneyGenError::Parse { line, message })?,
            conversion_rate: parse_num(
                self.field(fields, "conversion_rate", line)?,
                "conversion_rate",
                line,
            )?,
            click_through_rate: parse_num(
                self.field(fields, "click_through_rate", line)?,
                "click_through_rate",
                line,
            )?,
            engagement_score: parse_num(
                self.field(fields, "engagement_score", line)?,
                "engagement_score",
                line,
            )?,
            bounce_rate: parse_num(self.field(fields, "bounce_rate", line)?, "bounce_rate", line)?,
            page_views: parse_num(self.field(fields, "page_views", line)?, "page_views", line)?,
            timestamp: parse_timestamp(self.field(fields, "timestamp", line)?, line)?,
            retention,
        })
    }
}

fn parse_num<T: std::str::FromStr>(raw: &str, col: &str, line: usize) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| JourneyGenError::Parse {
        line,
        message: format!("invalid {} '{}': {}", col, raw, e),
    })
}

fn parse_timestamp(raw: &str, line: usize) -> Result<NaiveDateTime> {
    ACCEPTED_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| JourneyGenError::Parse {
            line,
            message: format!("invalid timestamp '{}', expected YYYY-MM-DDTHH:MM:SS", raw),
        })
}

/// Split one line of delimited text, honoring double-quoted fields with `""`
/// escapes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.is_empty() => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            '\r' if !in_quotes => {}
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}
