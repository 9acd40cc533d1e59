//! Retry policy handed to the HTTP layer.
//!
//! The store only carries these values; the HTTP collaborator decides when to
//! apply them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_RETRY_SLEEP_MILLIS: u64 = 1000;
pub const DEFAULT_MAX_RETRY_TIMES: u32 = 5;

/// Exponential back-off driven by `retry_sleep_millis`, capped by `max_retry_times`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub retry_sleep_millis: u64,
    pub max_retry_times: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_sleep_millis: DEFAULT_RETRY_SLEEP_MILLIS,
            max_retry_times: DEFAULT_MAX_RETRY_TIMES,
        }
    }
}

impl RetryPolicy {
    pub fn new(retry_sleep_millis: u64, max_retry_times: u32) -> Self {
        Self {
            retry_sleep_millis,
            max_retry_times,
        }
    }

    pub fn no_retry() -> Self {
        Self {
            max_retry_times: 0,
            ..Default::default()
        }
    }

    /// Sleep before retry number `attempt` (zero based): `retry_sleep_millis * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(self.retry_sleep_millis.saturating_mul(factor))
    }

    /// Whether another retry is allowed after `attempt` retries have already run.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retry_times
    }
}
