//! Run statistics
//!
//! Statistics are computed once, when a run has resolved (or abandoned)
//! every URL, and never change afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Overall result of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every URL produced a record
    Completed,

    /// Some URLs failed, or the run was cancelled
    Partial,

    /// Every URL failed
    Failed,
}

impl RunStatus {
    /// Derives the status from item counts
    ///
    /// A cancelled run is always `Partial`, whatever the counts.
    pub fn derive(total_items: u64, failed_items: u64, cancelled: bool) -> Self {
        if cancelled {
            Self::Partial
        } else if failed_items == 0 {
            Self::Completed
        } else if failed_items < total_items {
            Self::Partial
        } else {
            Self::Failed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate outcome of one orchestration run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Number of resolved items (`successful_items + failed_items`)
    pub total_items: u64,

    /// Items that produced a record
    pub successful_items: u64,

    /// Items that failed (fetch or extraction)
    pub failed_items: u64,

    /// Items abandoned in flight by cancellation; not counted as failures
    pub abandoned_items: u64,

    /// Wall-clock duration of the run in seconds
    pub total_time: f64,

    /// `successful_items / total_time`, or 0 when no time elapsed
    pub items_per_second: f64,

    pub status: RunStatus,
}

impl RunStatistics {
    /// Computes statistics for a finished run
    ///
    /// # Arguments
    ///
    /// * `successful_items` - Items that produced a record
    /// * `failed_items` - Items that resolved to a failure
    /// * `abandoned_items` - Items dropped by cancellation
    /// * `elapsed` - Wall-clock duration of the run
    /// * `cancelled` - Whether the run was cut short
    pub fn compute(
        successful_items: u64,
        failed_items: u64,
        abandoned_items: u64,
        elapsed: Duration,
        cancelled: bool,
    ) -> Self {
        let total_items = successful_items + failed_items;
        let total_time = elapsed.as_secs_f64();
        let items_per_second = if total_time > 0.0 {
            successful_items as f64 / total_time
        } else {
            0.0
        };

        Self {
            total_items,
            successful_items,
            failed_items,
            abandoned_items,
            total_time,
            items_per_second,
            status: RunStatus::derive(total_items, failed_items, cancelled),
        }
    }

    /// Returns the success rate as a percentage of resolved items
    pub fn success_rate(&self) -> f64 {
        if self.total_items == 0 {
            return 0.0;
        }
        (self.successful_items as f64 / self.total_items as f64) * 100.0
    }
}
