//! Retry policy for transient store conflicts

use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use lumen_core::DomainError;

/// Backoff policy for retrying transient conflicts
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Upper bound on any single delay
    pub max_delay: Duration,
    /// Random jitter added to each delay, as a fraction of the delay
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(1),
            jitter: 0.2,
        }
    }
}

impl RetryConfig {
    /// Delay before the given retry (1-based attempt that just failed)
    fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        let backoff = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(exp))
            .min(self.max_delay);

        let jitter_ms = (backoff.as_millis() as f64 * self.jitter) as u64;
        if jitter_ms == 0 {
            return backoff;
        }
        backoff + Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
    }
}

/// Run an operation, retrying transient conflicts with backoff
///
/// Only errors classified transient by [`DomainError::is_transient`] are
/// retried; everything else surfaces immediately. The operation is a
/// factory so each attempt gets a fresh future.
pub async fn run_with_retry<T, F, Fut>(config: &RetryConfig, mut op: F) -> Result<T, DomainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < config.max_attempts => {
                let delay = config.delay_for(attempt);
                warn!(
                    attempt,
                    max_attempts = config.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "transient conflict, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
