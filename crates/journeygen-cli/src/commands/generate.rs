use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use journeygen_core::config::{read_config, JourneyGenConfig};
use journeygen_core::generate::engine;
use journeygen_core::generate::plan::{GenerationPlan, DEFAULT_RECORD_COUNT, DEFAULT_SEED};
use journeygen_core::journey::types::JourneyRecord;
use journeygen_core::lock;
use journeygen_core::lock::types::LockFile;
use journeygen_core::output::{self, OutputFormat, DEFAULT_OUTPUT_FILE};

use crate::args::GenerateArgs;

/// Output destination meaning "write to stdout".
const STDOUT_OUTPUT: &str = "-";

/// Effective settings after merging CLI/env, journeygen.toml and defaults.
#[derive(Debug, PartialEq)]
struct Settings {
    rows: usize,
    seed: u64,
    output: String,
    format: OutputFormat,
}

/// CLI flags (and their JOURNEYGEN_* env fallbacks) take priority, then
/// journeygen.toml, then built-in defaults.
fn resolve_settings(args: &GenerateArgs, config: Option<&JourneyGenConfig>) -> Settings {
    let file = config.map(|c| &c.generate);

    let rows = args
        .rows
        .or_else(|| file.and_then(|g| g.rows))
        .unwrap_or(DEFAULT_RECORD_COUNT);
    let seed = args
        .seed
        .or_else(|| file.and_then(|g| g.seed))
        .unwrap_or(DEFAULT_SEED);
    let output = args
        .output
        .clone()
        .or_else(|| file.and_then(|g| g.output.clone()))
        .unwrap_or_else(|| DEFAULT_OUTPUT_FILE.to_string());
    let format = args.output_format(&output);

    Settings {
        rows,
        seed,
        output,
        format,
    }
}

pub fn run(args: &GenerateArgs) -> Result<()> {
    // Load optional journeygen.toml config
    let config = read_config(Path::new("."))?;
    let settings = resolve_settings(args, config.as_ref());
    tracing::debug!(?settings, "resolved generate settings");

    // Reject a bad count before any progress output or file work
    let plan = GenerationPlan::new(settings.rows, settings.seed)?;

    // Phase 1: Generate
    let pb = ProgressBar::new(plan.num_records as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.cyan} [1/2] Generating journeys... {bar:40.cyan/dim} {pos}/{len} ({eta})",
            )
            .context("Invalid progress bar template")?
            .progress_chars("█▓░"),
    );

    let records = engine::execute_plan(
        &plan,
        Some(&|current, _total| {
            pb.set_position(current as u64);
        }),
    )?;

    pb.finish_with_message(format!("Generating journeys... ✓ ({} records)", records.len()));

    // Phase 2: Output
    if settings.output == STDOUT_OUTPUT {
        let stdout = std::io::stdout();
        return write_stream(stdout.lock(), settings.format, &records);
    }

    let pb2 = ProgressBar::new_spinner();
    pb2.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} [2/2] {msg}")
            .context("Invalid progress bar template")?,
    );
    pb2.set_message(format!("Writing to {}...", settings.output));
    pb2.enable_steady_tick(std::time::Duration::from_millis(100));

    let digest = output::write_output_file(Path::new(&settings.output), settings.format, &records)
        .with_context(|| format!("Failed to write output file: {}", settings.output))?;

    pb2.finish_with_message(format!("Writing to {}... ✓", settings.output));
    eprintln!(
        "\n✓ Generated {} journey records (seed {}) → {}",
        records.len(),
        plan.seed,
        settings.output
    );

    // Write lock file so the run can be verified and reproduced later
    if !args.no_lock {
        let lock_file = LockFile::new(&plan, settings.format, settings.output.clone(), digest);
        lock::write_lock_file(&lock_file, Path::new(lock::LOCK_FILE_NAME))?;
        eprintln!("Lock file written to {}", lock::LOCK_FILE_NAME);
    }

    Ok(())
}

/// Write records through a buffer and flush it, so errors buffered at the end
/// of a short output are not lost on drop.
fn write_stream<W: Write>(sink: W, format: OutputFormat, records: &[JourneyRecord]) -> Result<()> {
    let mut writer = BufWriter::new(sink);
    output::write_records(&mut writer, format, records)?;
    writer.flush().context("Failed to flush stdout")?;
    Ok(())
}
