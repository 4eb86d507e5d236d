//! Per-stage retry policy, decoupled from any queue transport's own
//! redelivery mechanics. Only transient errors are replayed; permanent ones
//! dead-letter immediately.

use std::future::Future;
use std::time::Duration;

use nr_core::Error;
use tracing::warn;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

/// A message that exhausted its retry budget (or failed permanently) and
/// needs manual inspection.
#[derive(Debug)]
pub struct GiveUp {
    pub error: Error,
    pub attempts: u32,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Run `op` until it succeeds, fails permanently, or the attempt budget
    /// is exhausted. Backoff grows linearly with the attempt number.
    pub async fn run<T, F, Fut>(&self, stage: &str, mut op: F) -> Result<T, GiveUp>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_transient() && attempt < self.max_attempts => {
                    let delay = self.backoff * attempt;
                    warn!(
                        stage,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %error,
                        "transient failure, retrying in {delay:?}"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => {
                    warn!(stage, attempt, error = %error, "giving up");
                    return Err(GiveUp {
                        error,
                        attempts: attempt,
                    });
                }
            }
        }
    }
}
