//! # Error Types
//!
//! Defines `JourneyGenError`, the unified error enum for every failure mode in
//! journeygen. Generation itself can only fail on a bad record count; every
//! other variant belongs to the I/O and bookkeeping around it (writing the
//! output, reading a file back, config and lock handling).

use thiserror::Error;

/// All errors that can occur in journeygen operations.
#[derive(Error, Debug)]
pub enum JourneyGenError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Output error: {message}")]
    Output {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Lock file error: {message}")]
    LockFile { message: String },
}

impl JourneyGenError {
    /// Shorthand for the record-count check shared by the generator and config.
    pub fn invalid_record_count(num_records: usize) -> Self {
        JourneyGenError::InvalidArgument {
            message: format!(
                "num_records must be greater than zero (got {})\n  Example: journeygen generate --rows 10000",
                num_records
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, JourneyGenError>;
