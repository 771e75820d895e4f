// ABOUTME: Bounded retry loop with a fixed delay for transient failures
// ABOUTME: Fatal and non-retryable errors return immediately without consuming budget

use crate::constants::retry;
use crate::error::UploadError;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: retry::MAX_RETRIES,
            delay: retry::RETRY_DELAY,
        }
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or the
/// retry budget is spent. An exhausted budget surfaces as a network error that
/// wraps the last failure.
pub async fn retry_fixed<F, Fut, T>(config: &RetryConfig, mut operation: F) -> Result<T, UploadError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, UploadError>>,
{
    let mut remaining = config.max_retries;
    let mut attempt: u32 = 0;

    let last_error = loop {
        attempt += 1;

        match operation().await {
            Ok(result) => return Ok(result),
            Err(error) if !error.is_retryable() => return Err(error),
            Err(error) if remaining == 0 => break error,
            Err(error) => {
                log::warn!(
                    "Request failed (attempt {}/{}): {}. Retrying in {}ms",
                    attempt,
                    config.max_retries + 1,
                    error,
                    config.delay.as_millis()
                );
                remaining -= 1;
                sleep(config.delay).await;
            }
        }
    };

    let message = format!(
        "{} (gave up after {} attempt{})",
        last_error.message(),
        attempt,
        if attempt == 1 { "" } else { "s" }
    );
    Err(UploadError::network(message).with_source(last_error))
}
