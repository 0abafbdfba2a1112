pub mod check;
pub mod config;
pub mod error;
pub mod generate;
pub mod journey;
pub mod lock;
pub mod output;
pub mod summary;

// Re-export key types for convenience
pub use error::{JourneyGenError, Result};
pub use journey::{JourneyRecord, Segment, Stage};
