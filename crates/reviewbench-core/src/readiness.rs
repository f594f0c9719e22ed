//! Fixed-interval availability polling used before touching a store.

use std::future::Future;
use std::time::Duration;

use crate::config::ReadinessSettings;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub interval: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, interval: Duration) -> Self {
        Self { max_retries, interval }
    }

    /// A single probe, no sleeping.
    pub fn once() -> Self {
        Self { max_retries: 1, interval: Duration::ZERO }
    }
}

impl From<&ReadinessSettings> for RetryPolicy {
    fn from(s: &ReadinessSettings) -> Self {
        Self::new(s.max_retries, s.interval())
    }
}

/// Call `probe` until it succeeds or `policy.max_retries` attempts have
/// failed. Sleeps `policy.interval` after each failed attempt except the last.
/// Returns the 1-based attempt that succeeded.
pub async fn wait_until_ready<F, Fut>(service: &str, policy: RetryPolicy, mut probe: F) -> Result<u32>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    for attempt in 1..=policy.max_retries {
        match probe().await {
            Ok(()) => {
                tracing::info!(service, attempt, "connection established");
                return Ok(attempt);
            }
            Err(e) => {
                tracing::warn!(service, attempt, max = policy.max_retries, error = %e, "waiting for service");
            }
        }
        if attempt < policy.max_retries {
            tokio::time::sleep(policy.interval).await;
        }
    }
    Err(Error::Unavailable { service: service.to_string(), attempts: policy.max_retries })
}
