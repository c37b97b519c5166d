//! Linear retry/backoff policy.

use std::time::Duration;

use reqwest::{Method, StatusCode};

use super::error::TransportError;

/// Attempts per logical call, counting the first one.
pub const MAX_ATTEMPTS: u32 = 3;

/// Delay unit; the wait after attempt `n` is `n` times this.
pub const BASE_DELAY_MS: u64 = 1000;

/// Decides whether a failed attempt is retried and how long to wait first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    /// Retry 5xx responses and post-delivery transport failures for POST
    /// and PATCH too. Connection failures are retried regardless.
    pub retry_non_idempotent: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_delay: Duration::from_millis(BASE_DELAY_MS),
            retry_non_idempotent: true,
        }
    }
}

impl RetryPolicy {
    /// Policy that only retries requests safe to repeat.
    pub fn idempotent_only() -> Self {
        Self {
            retry_non_idempotent: false,
            ..Self::default()
        }
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Wait before the attempt that follows `attempt` (1-based). Linear, not exponential.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    pub fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    pub fn should_retry_transport(&self, err: &TransportError, method: &Method, attempt: u32) -> bool {
        self.has_attempts_left(attempt) && (err.is_connect() || self.may_repeat(method))
    }

    pub fn should_retry_status(&self, status: StatusCode, method: &Method, attempt: u32) -> bool {
        status.is_server_error() && self.has_attempts_left(attempt) && self.may_repeat(method)
    }

    fn may_repeat(&self, method: &Method) -> bool {
        self.retry_non_idempotent || is_idempotent(method)
    }
}

/// Methods whose repetition has no additional effect on the server.
pub fn is_idempotent(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::PUT | Method::DELETE | Method::OPTIONS | Method::TRACE
    )
}
