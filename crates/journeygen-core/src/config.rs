//! # Configuration File Parser
//!
//! Reads and parses `journeygen.toml`, the optional user configuration file
//! that sets defaults without requiring CLI flags. CLI flags and
//! `JOURNEYGEN_*` environment variables take priority over anything here.
//!
//! Example `journeygen.toml`:
//!
//! ```toml
//! [generate]
//! rows = 10000
//! seed = 42
//! output = "customer_journey_data.csv"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{JourneyGenError, Result};

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "journeygen.toml";

/// Top-level journeygen.toml structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JourneyGenConfig {
    /// Default generation settings.
    pub generate: GenerateConfig,

    /// Unrecognized top-level sections, kept only so they can be reported.
    #[serde(flatten)]
    pub unknown: BTreeMap<String, toml::Value>,
}

/// Default generation settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Number of journey records to generate.
    pub rows: Option<usize>,
    /// Fixed random seed for deterministic generation.
    pub seed: Option<u64>,
    /// Output file path; the format is inferred from the extension.
    pub output: Option<String>,
}

/// Read and parse a journeygen.toml file from the given directory.
///
/// Returns `None` if the file doesn't exist (config is optional).
/// Returns an error if the file exists but can't be parsed.
pub fn read_config(dir: &Path) -> Result<Option<JourneyGenConfig>> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| JourneyGenError::Config {
        message: format!("Failed to read {}: {}", path.display(), e),
    })?;

    let config = parse_config(&content).map_err(|e| match e {
        JourneyGenError::Config { message } => JourneyGenError::Config {
            message: format!("{}: {}", path.display(), message),
        },
        other => other,
    })?;

    Ok(Some(config))
}

/// Parse config text and validate it.
pub fn parse_config(content: &str) -> Result<JourneyGenConfig> {
    let config: JourneyGenConfig = toml::from_str(content).map_err(|e| JourneyGenError::Config {
        message: format!("Failed to parse: {}", e),
    })?;
    config.validate()?;
    config.warn_unknown_sections();
    Ok(config)
}

impl JourneyGenConfig {
    /// Validate semantic constraints that serde cannot enforce.
    pub fn validate(&self) -> Result<()> {
        if self.generate.rows == Some(0) {
            return Err(JourneyGenError::Config {
                message: "[generate] rows must be greater than zero".to_string(),
            });
        }
        if let Some(ref output) = self.generate.output {
            if output.trim().is_empty() {
                return Err(JourneyGenError::Config {
                    message: "[generate] output must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Unknown sections are logged as a warning and otherwise ignored, so a
    /// typo like `[generat]` is visible instead of silently doing nothing.
    fn warn_unknown_sections(&self) {
        for key in self.unknown.keys() {
            tracing::warn!(
                "Unknown section '{}' in {}. Only [generate] is recognized. Ignoring.",
                key,
                CONFIG_FILE_NAME
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
[generate]
rows = 500
seed = 7
output = "journeys.json"
"#,
        )
        .unwrap();
        assert_eq!(config.generate.rows, Some(500));
        assert_eq!(config.generate.seed, Some(7));
        assert_eq!(config.generate.output.as_deref(), Some("journeys.json"));
        assert!(config.unknown.is_empty());
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let config = parse_config("").unwrap();
        assert!(config.generate.rows.is_none());
        assert!(config.generate.seed.is_none());
    }

    #[test]
    fn test_zero_rows_rejected() {
        let err = parse_config("[generate]\nrows = 0\n").unwrap_err();
        assert!(matches!(err, JourneyGenError::Config { .. }));
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn test_negative_rows_is_parse_error() {
        let err = parse_config("[generate]\nrows = -5\n").unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_unknown_section_kept_for_warning() {
        let config = parse_config("[generat]\nrows = 5\n").unwrap();
        assert!(config.unknown.contains_key("generat"));
        assert!(config.generate.rows.is_none());
    }

    #[test]
    fn test_read_config_missing_file_is_none() {
        let dir = tempdir().unwrap();
        assert!(read_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_read_config_from_dir() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[generate]\nrows = 12\n",
        )
        .unwrap();
        let config = read_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.generate.rows, Some(12));
    }
}
