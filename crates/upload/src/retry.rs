use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::UploadError;

/// Whole-operation retry with exponential backoff.
///
/// The delay after attempt `n` is `base_delay * 2^n`, capped at `max_delay`.
/// With the default 1 s base that is 2 s, 4 s, 8 s, ...
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Delay to sleep after the given failed attempt (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2f64.powi(attempt.min(32) as i32);
        let secs = self.base_delay.as_secs_f64() * factor;
        Duration::from_secs_f64(secs.min(self.max_delay.as_secs_f64()))
    }

    /// Runs `op` until it succeeds or `max_attempts` is exhausted, sleeping
    /// the backoff delay between attempts. The last error is returned as-is.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, UploadError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, UploadError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt >= max_attempts => return Err(err),
                Err(err) => {
                    let delay = self.delay_for_attempt(attempt);
                    warn!(
                        attempt,
                        delay_secs = delay.as_secs_f64(),
                        error = %err,
                        "upload attempt failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
