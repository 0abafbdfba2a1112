use anyhow::Result;
use comfy_table::Table as ComfyTable;

use journeygen_core::generate::engine;
use journeygen_core::generate::plan::{GenerationPlan, DEFAULT_SEED};
use journeygen_core::journey::types::COLUMNS;

use crate::args::PreviewArgs;

pub fn run(args: &PreviewArgs) -> Result<()> {
    let plan = GenerationPlan::new(args.rows, args.seed.unwrap_or(DEFAULT_SEED))?;
    let records = engine::execute_plan(&plan, None)?;

    println!("━━━ journeys ({} records, seed {}) ━━━", records.len(), plan.seed);

    let mut t = ComfyTable::new();
    t.set_header(COLUMNS.to_vec());
    for record in &records {
        t.add_row(record.to_fields().iter().map(|v| truncate(v)).collect::<Vec<_>>());
    }

    println!("{}\n", t);

    Ok(())
}

/// Long float renderings are clipped so the table fits a terminal.
fn truncate(s: &str) -> String {
    if s.len() > 12 && s.parse::<f64>().is_ok() {
        format!("{}…", &s[..11])
    } else {
        s.to_string()
    }
}
