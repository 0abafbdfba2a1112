//! Journey data model: the record type, its categorical fields, and the
//! gated-range tables that tie them together.

pub mod ranges;
pub mod types;

pub use types::{JourneyRecord, Segment, Stage, COLUMNS};
