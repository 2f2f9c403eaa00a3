//! Global minimum-interval admission gate

use crate::ConfigError;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Serializes request admission to a configured maximum rate
///
/// Every outbound request (retries included) calls [`RateLimiter::acquire`]
/// first. Consecutive admissions are spaced by at least
/// `1 / requests_per_second`, no matter how many tasks call `acquire`
/// concurrently.
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum time between two admissions
    min_interval: Duration,

    /// Time of the last granted admission
    last_admission: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a new rate limiter
    ///
    /// # Arguments
    ///
    /// * `requests_per_second` - Maximum admission rate; must be finite and > 0
    ///
    /// # Returns
    ///
    /// * `Ok(RateLimiter)` - Limiter with `min_interval = 1 / requests_per_second`
    /// * `Err(ConfigError)` - The rate is not a usable positive number
    pub fn new(requests_per_second: f64) -> Result<Self, ConfigError> {
        if !requests_per_second.is_finite() || requests_per_second <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "requests_per_second must be a positive number, got {}",
                requests_per_second
            )));
        }

        let min_interval = Duration::try_from_secs_f64(1.0 / requests_per_second).map_err(|e| {
            ConfigError::Validation(format!(
                "requests_per_second {} yields an unusable interval: {}",
                requests_per_second, e
            ))
        })?;

        Ok(Self {
            min_interval,
            last_admission: Mutex::new(None),
        })
    }

    /// Returns the minimum interval between admissions
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until a request may be issued, then records the admission
    ///
    /// The lock is held across the wait so waiting callers are admitted one
    /// at a time in arrival order. The returned instant is the grant time;
    /// it is read after the wait, so grants observed by callers are never
    /// closer together than `min_interval`.
    ///
    /// If the returned future is dropped while waiting, no admission is
    /// recorded.
    pub async fn acquire(&self) -> Instant {
        let mut last = self.last_admission.lock().await;

        if let Some(previous) = *last {
            let next_slot = previous + self.min_interval;
            if Instant::now() < next_slot {
                tracing::trace!("Waiting {:?} for admission", next_slot - Instant::now());
                tokio::time::sleep_until(next_slot).await;
            }
        }

        let granted = Instant::now();
        *last = Some(granted);
        granted
    }
}
