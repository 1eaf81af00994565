//! Pipeline orchestration module.

mod orchestrator;
mod stats;

pub use orchestrator::{prepare, Pipeline, PipelineConfig, Prepared};
pub use stats::PipelineStats;
