//! Retrying transient lookup failures.

use std::future::Future;
use std::time::Duration;

use cart_core::FetchError;

/// Delay inserted before each retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// Retry immediately.
    None,
    /// Same delay every time.
    Fixed(Duration),
    /// Doubling delay, capped at `max`.
    Exponential {
        /// Delay before the first retry.
        base: Duration,
        /// Upper bound for any delay.
        max: Duration,
    },
}

impl BackoffStrategy {
    /// Delay before retrying after failed attempt `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Fixed(d) => *d,
            Self::Exponential { base, max } => base
                .saturating_mul(2u32.saturating_pow(attempt))
                .min(*max),
        }
    }
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(50),
            max: Duration::from_millis(500),
        }
    }
}

/// Failure classes worth another attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryCondition {
    /// A 5xx response.
    ServerError,
    /// The request ran out of time.
    Timeout,
    /// The server could not be reached.
    ConnectionError,
}

impl RetryCondition {
    /// Whether `error` belongs to this class.
    pub fn matches(&self, error: &FetchError) -> bool {
        match (self, error) {
            (Self::ServerError, FetchError::Http { status, .. }) => (500..600).contains(status),
            (Self::Timeout, FetchError::Timeout(_)) => true,
            (Self::ConnectionError, FetchError::Connection(_)) => true,
            _ => false,
        }
    }
}

/// How many times, and after which failures, a lookup is repeated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub max_attempts: u32,
    pub backoff: BackoffStrategy,
    /// Failures that are retried; anything else is returned at once.
    pub retry_on: Vec<RetryCondition>,
}

impl RetryPolicy {
    /// Up to `max_attempts` retries of transient failures with the
    /// default backoff.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: BackoffStrategy::default(),
            retry_on: vec![
                RetryCondition::ServerError,
                RetryCondition::Timeout,
                RetryCondition::ConnectionError,
            ],
        }
    }

    /// Single attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 0,
            backoff: BackoffStrategy::None,
            retry_on: Vec::new(),
        }
    }

    pub fn with_backoff(mut self, strategy: BackoffStrategy) -> Self {
        self.backoff = strategy;
        self
    }

    /// Whether failed attempt `attempt` (0-indexed) gets another try.
    pub fn should_retry(&self, error: &FetchError, attempt: u32) -> bool {
        attempt < self.max_attempts && self.retry_on.iter().any(|c| c.matches(error))
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// retry budget is spent.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if self.should_retry(&e, attempt) => {
                    let delay = self.backoff.delay_for_attempt(attempt);
                    tracing::debug!(attempt, ?delay, error = %e, "retrying fetch");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRIES)
    }
}

const DEFAULT_RETRIES: u32 = 1;
