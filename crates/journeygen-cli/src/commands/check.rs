use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};

use journeygen_core::check::{self, ReproReport};
use journeygen_core::lock;

use crate::args::{CheckArgs, CheckFormat};

/// Regeneration result plus the state of the output file on disk.
#[derive(Debug)]
struct CheckOutcome {
    report: ReproReport,
    output_path: PathBuf,
    /// `None` when the output file no longer exists.
    on_disk_matches: Option<bool>,
}

impl CheckOutcome {
    fn passed(&self) -> bool {
        self.report.reproducible && self.on_disk_matches != Some(false)
    }
}

pub fn run(args: &CheckArgs) -> Result<()> {
    let lock_path = Path::new(&args.lock);
    if !lock_path.exists() {
        bail!(
            "No {} found. Run `journeygen generate` first to create a lock file.",
            args.lock,
        );
    }

    let outcome = verify(lock_path)?;
    let output = outcome.output_path.display();

    match args.format {
        CheckFormat::Json => {
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "report": outcome.report,
                "output_file": output.to_string(),
                "output_file_matches": outcome.on_disk_matches,
            }))
            .context("Failed to serialize reproducibility report")?;
            println!("{}", json);
        }
        CheckFormat::Text => {
            println!("{}", outcome.report.summary());
            match outcome.on_disk_matches {
                Some(true) => println!("{} matches the lock file.", output),
                Some(false) => println!("{} has changed since it was generated.", output),
                None => println!("{} not found; skipped on-disk comparison.", output),
            }
        }
    }

    if !outcome.passed() {
        process::exit(1);
    }

    Ok(())
}

fn verify(lock_path: &Path) -> Result<CheckOutcome> {
    let lock_file = lock::read_lock_file(lock_path)?;
    let report = check::verify_lock(&lock_file)?;

    // The file on disk may have been edited even when regeneration matches
    let output_path = resolve_output_path(lock_path, &lock_file.output);
    let on_disk_matches = if output_path.exists() {
        let bytes = std::fs::read(&output_path)
            .with_context(|| format!("Failed to read {}", output_path.display()))?;
        Some(check::compute_output_hash(&bytes) == lock_file.output_hash)
    } else {
        None
    };

    Ok(CheckOutcome {
        report,
        output_path,
        on_disk_matches,
    })
}

/// Relative output paths are recorded relative to the directory holding the lock.
fn resolve_output_path(lock_path: &Path, output: &str) -> PathBuf {
    let output = Path::new(output);
    if output.is_absolute() {
        return output.to_path_buf();
    }
    match lock_path.parent() {
        Some(dir) => dir.join(output),
        None => output.to_path_buf(),
    }
}
