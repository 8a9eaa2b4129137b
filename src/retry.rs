//! Fixed-count, fixed-delay retry for flaky network stages.
//!
//! A [`RetryPolicy`] is a plain value handed to [`with_retry`], which wraps any
//! fallible async operation. The scraping stage uses it around the whole
//! fetch-and-parse step, since a page that rendered without news sections is
//! as worth retrying as a dropped connection.

use crate::error::{FeedError, Result};
use serde::Deserialize;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// How many times to try an operation and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Treated as at least 1.
    pub max_attempts: u32,
    /// Delay slept before every attempt after the first.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(5000))
    }
}

/// YAML form of a [`RetryPolicy`].
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            delay_ms: policy.delay.as_millis() as u64,
        }
    }
}

impl From<RetrySettings> for RetryPolicy {
    fn from(s: RetrySettings) -> Self {
        RetryPolicy::new(s.max_attempts, Duration::from_millis(s.delay_ms))
    }
}

/// Run `op` until it succeeds or the policy's attempts are used up.
///
/// `op` receives the 1-based attempt number. On exhaustion the last error's
/// message is carried in [`FeedError::RetriesExhausted`].
#[instrument(level = "info", skip(policy, op), fields(max = policy.max_attempts))]
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, label: &str, mut op: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.max_attempts.max(1);
    let total_t0 = Instant::now();
    let mut last_error = None;

    for attempt in 1..=attempts {
        if attempt > 1 {
            info!(
                attempt,
                max = attempts,
                delay_ms = policy.delay.as_millis() as u64,
                "Retrying {label}"
            );
            sleep(policy.delay).await;
        }

        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!(attempt, max = attempts, error = %e, "{label} attempt failed");
                last_error = Some(e);
            }
        }
    }

    let last = last_error.map(|e| e.to_string()).unwrap_or_default();
    error!(
        attempts,
        elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
        error = %last,
        "{label} exhausted retries"
    );
    Err(FeedError::RetriesExhausted { attempts, last })
}
