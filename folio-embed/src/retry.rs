//! Retry policy shared by the HTTP clients talking to hosted model APIs.

use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::Duration;

/// How many times a request is retried and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; `0` disables retrying.
    pub max_retries: usize,
    /// Delay before the first retry, doubled for each further one.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: usize) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Total number of attempts, including the first one.
    pub fn max_attempts(&self) -> usize {
        self.max_retries + 1
    }

    /// Rate limiting and server-side errors are worth another attempt.
    pub fn should_retry_status(&self, status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }

    /// Transport failures that may succeed on a second try.
    pub fn is_retryable_error(&self, err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect() || err.is_body() || err.is_request()
    }

    /// Exponential backoff for the given retry number (1-based), capped at 32x.
    pub fn backoff(&self, retry: usize) -> Duration {
        let exponent = retry.saturating_sub(1).min(5) as u32;
        self.base_delay * (1 << exponent)
    }

    /// Sends the request built by `build`, rebuilding and resending it after
    /// retryable statuses and transport errors until the budget is spent.
    ///
    /// The final response is returned whatever its status; callers decide
    /// what a non-success answer means. `what` names the request in logs.
    pub async fn send<F>(&self, what: &str, build: F) -> Result<Response, reqwest::Error>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut retry = 0usize;
        loop {
            match build().send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if !self.should_retry_status(status) || retry >= self.max_retries {
                        return Ok(resp);
                    }
                    retry += 1;
                    tracing::warn!(
                        "{} returned {}, retry {}/{}",
                        what,
                        status,
                        retry,
                        self.max_retries
                    );
                }
                Err(err) => {
                    if !self.is_retryable_error(&err) || retry >= self.max_retries {
                        return Err(err);
                    }
                    retry += 1;
                    tracing::warn!(
                        "{} failed ({}), retry {}/{}",
                        what,
                        err,
                        retry,
                        self.max_retries
                    );
                }
            }
            tokio::time::sleep(self.backoff(retry)).await;
        }
    }
}

/// Reads the body of a failed response for an error message.
pub async fn error_body(resp: Response) -> String {
    resp.text()
        .await
        .unwrap_or_else(|_| "<body unavailable>".to_string())
}
