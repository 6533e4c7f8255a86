use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::application::ports::{TranscriptionError, TranslationError};

/// Errors that may succeed if the same request is sent again.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

impl Transient for TranscriptionError {
    fn is_transient(&self) -> bool {
        match self {
            Self::Request(_) | Self::TimedOut => true,
            Self::Status { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

impl Transient for TranslationError {
    fn is_transient(&self) -> bool {
        match self {
            Self::Request(_) | Self::TimedOut => true,
            Self::Status { status, .. } => is_retryable_status(*status),
            Self::InvalidResponse(_) => false,
        }
    }
}

/// Bounded exponential backoff around a single-attempt remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    pub fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
            max_backoff: Self::MAX_BACKOFF.max(initial_backoff),
        }
    }

    /// Doubles `current`, capped at `max_backoff` and saturating on overflow.
    pub fn next_backoff(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.max_backoff)
    }

    pub async fn run<T, E, F, Fut>(&self, operation: &str, mut attempt_fn: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Transient + Display,
    {
        let mut attempt = 1;
        let mut backoff = self.initial_backoff;

        loop {
            match attempt_fn().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!(operation, attempt, "Remote call succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) if attempt < self.max_attempts && e.is_transient() => {
                    tracing::warn!(
                        operation,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Remote call failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = self.next_backoff(backoff);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::single_attempt()
    }
}
