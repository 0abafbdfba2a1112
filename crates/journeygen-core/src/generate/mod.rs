pub mod engine;
pub mod plan;

pub use engine::{execute_plan, generate_journeys};
pub use plan::{GenerationPlan, DEFAULT_RECORD_COUNT, DEFAULT_SEED};
