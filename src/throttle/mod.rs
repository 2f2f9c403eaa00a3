//! Request throttling and failure recovery
//!
//! This module contains the two policies every outbound request goes through:
//! - A global rate limiter that spaces request admissions
//! - A retry policy with bounded exponential backoff

mod rate_limiter;
mod retry;

pub use rate_limiter::RateLimiter;
pub use retry::{RetryAttempt, RetryOutcome, RetryPolicy, RetryableError};
