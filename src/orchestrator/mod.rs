//! Orchestration module
//!
//! This module runs a whole harvest:
//! - Bounded concurrent fan-out over the input URLs
//! - Per-URL fetch, retry and extraction
//! - Cooperative cancellation
//! - Run statistics

mod coordinator;
mod stats;

pub use coordinator::{Orchestrator, ScrapeReport};
pub use stats::{RunStatistics, RunStatus};
