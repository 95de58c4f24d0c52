use std::time::Duration;
use tokio::time::sleep;

// ============================================================================
// Exponential Backoff Retry Strategy
// ============================================================================
//
// Caller-side retry for transient failures. The order store itself never
// retries; this is used where the caller owns the policy, e.g. the startup
// liveness check against the key-value backend.
//
// ============================================================================

#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Initial delay before first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

/// Result of a retry operation
#[derive(Debug)]
pub enum RetryResult<T, E> {
    /// Operation succeeded
    Success(T),
    /// Operation failed after all retries
    Failed(E),
    /// Operation permanently failed (should not retry)
    PermanentFailure(E),
}

impl<T, E> RetryResult<T, E> {
    pub fn into_result(self) -> Result<T, E> {
        match self {
            RetryResult::Success(value) => Ok(value),
            RetryResult::Failed(e) | RetryResult::PermanentFailure(e) => Err(e),
        }
    }
}

/// Check if an error is transient (should retry) or permanent (should not retry)
pub trait IsTransient {
    fn is_transient(&self) -> bool;
}

/// Run `operation` until it succeeds, fails permanently, or exhausts
/// `config.max_attempts`. The attempt number (from 1) is passed in.
///
/// `operation_name` labels every log line, e.g. `"redis ping"`.
pub async fn retry_on_transient<F, Fut, T, E>(
    config: RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> RetryResult<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display + IsTransient,
{
    let mut delay = config.initial_delay;
    let mut attempt = 0;

    loop {
        attempt += 1;
        let error = match operation(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(operation = operation_name, attempt, "Recovered after retry");
                }
                return RetryResult::Success(value);
            }
            Err(error) => error,
        };

        if !error.is_transient() {
            tracing::error!(operation = operation_name, error = %error, "Permanent failure, giving up");
            return RetryResult::PermanentFailure(error);
        }

        if attempt >= config.max_attempts {
            tracing::error!(
                operation = operation_name,
                attempts = attempt,
                error = %error,
                "Retries exhausted"
            );
            return RetryResult::Failed(error);
        }

        tracing::warn!(
            operation = operation_name,
            attempt,
            max_attempts = config.max_attempts,
            error = %error,
            delay_ms = delay.as_millis() as u64,
            "Transient failure, backing off"
        );

        sleep(delay).await;
        delay = next_delay(&config, delay);
    }
}

fn next_delay(config: &RetryConfig, current: Duration) -> Duration {
    let scaled = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(scaled).min(config.max_delay)
}
