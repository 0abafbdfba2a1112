use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table as ComfyTable;

use journeygen_core::journey::types::{Segment, Stage};
use journeygen_core::summary::{read_csv_file, summarize, JourneySummary};

use crate::args::{ReportFormat, SummaryArgs};

pub fn run(args: &SummaryArgs) -> Result<()> {
    let path = Path::new(&args.path);
    let observations =
        read_csv_file(path).with_context(|| format!("Failed to read {}", args.path))?;
    let summary = summarize(&observations);

    match args.format {
        ReportFormat::Json => {
            let json =
                serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
            println!("{}", json);
        }
        ReportFormat::Table => print_tables(&args.path, &summary),
    }

    Ok(())
}

fn print_tables(source: &str, s: &JourneySummary) {
    println!("━━━ {} ({} records) ━━━\n", source, s.total);

    println!("Journey funnel");
    let mut t = ComfyTable::new();
    t.set_header(vec!["stage", "records", "share"]);
    for stage in Stage::ALL {
        t.add_row(vec![
            stage.to_string(),
            s.stage_counts.get(&stage).copied().unwrap_or(0).to_string(),
            pct(s.stage_share(stage)),
        ]);
    }
    println!("{}\n", t);

    println!("Segments");
    let mut t = ComfyTable::new();
    t.set_header(vec![
        "segment",
        "records",
        "share",
        "mean conversion_rate",
        "mean engagement_score",
    ]);
    for segment in Segment::ALL {
        t.add_row(vec![
            segment.to_string(),
            s.segment_counts.get(&segment).copied().unwrap_or(0).to_string(),
            pct(s.segment_share(segment)),
            mean(s.conversion_by_segment.get(&segment)),
            mean(s.engagement_by_segment.get(&segment)),
        ]);
    }
    println!("{}\n", t);

    println!("Stage metrics");
    let mut t = ComfyTable::new();
    t.set_header(vec![
        "stage",
        "mean bounce_rate",
        "mean page_views",
        "mean conversion_rate",
        "mean click_through_rate",
    ]);
    for stage in Stage::ALL {
        t.add_row(vec![
            stage.to_string(),
            mean(s.bounce_by_stage.get(&stage)),
            mean(s.page_views_by_stage.get(&stage)),
            mean(s.conversion_by_stage.get(&stage)),
            mean(s.click_through_by_stage.get(&stage)),
        ]);
    }
    println!("{}\n", t);

    println!("Mean engagement_score by segment and stage");
    let mut t = ComfyTable::new();
    let mut header = vec!["segment".to_string()];
    header.extend(Stage::ALL.iter().map(|st| st.to_string()));
    t.set_header(header);
    for segment in Segment::ALL {
        let mut row = vec![segment.to_string()];
        row.extend(
            Stage::ALL
                .iter()
                .map(|st| mean(s.engagement_matrix.get(&segment).and_then(|r| r.get(st)))),
        );
        t.add_row(row);
    }
    println!("{}\n", t);

    println!("Monthly timeline");
    let mut t = ComfyTable::new();
    let mut header = vec!["month".to_string()];
    header.extend(Stage::ALL.iter().map(|st| st.to_string()));
    t.set_header(header);
    for month in &s.monthly_timeline {
        let mut row = vec![month.month.clone()];
        row.extend(
            Stage::ALL
                .iter()
                .map(|st| month.counts.get(st).copied().unwrap_or(0).to_string()),
        );
        t.add_row(row);
    }
    println!("{}\n", t);

    match &s.weekly_retention {
        Some(weeks) => {
            println!("Weekly retention");
            let mut t = ComfyTable::new();
            t.set_header(vec!["week", "records", "mean retention_rate"]);
            for w in weeks {
                t.add_row(vec![
                    w.week.to_string(),
                    w.records.to_string(),
                    format!("{:.4}", w.mean_retention_rate),
                ]);
            }
            println!("{}", t);
        }
        None => println!("Retention data not available."),
    }
}

fn pct(share: f64) -> String {
    format!("{:.1}%", share * 100.0)
}

fn mean(value: Option<&Option<f64>>) -> String {
    match value.copied().flatten() {
        Some(v) => format!("{:.4}", v),
        None => "-".to_string(),
    }
}
