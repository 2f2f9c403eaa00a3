//! Output module for run results
//!
//! This module handles:
//! - Writing the JSON results document
//! - Printing extracted records and run statistics to the console
//!
//! The orchestrator never writes anything itself; the binary calls these
//! after a run.

mod console;
mod json;

pub use console::{print_records, print_statistics, truncate_chars};
pub use json::{write_results, ResultsDocument};
