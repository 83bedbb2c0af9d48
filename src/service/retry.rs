//! Bounded retry with exponential backoff.

use crate::constants::retry;
use crate::error::TransportError;
use crate::service::transport::ApiResponse;
use std::time::Duration;
use tracing::{info, warn};

/// When and how often a service call is repeated.
///
/// A call is repeated while retries remain and it either failed with a
/// transient transport error or answered with a status of 500 or above,
/// 403, or 429. The delay starts at `start_delay` and is multiplied by
/// `backoff_base` after each of the first `max_doublings` retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first call.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub start_delay: Duration,
    /// Delay multiplier.
    pub backoff_base: u32,
    /// Number of times the delay grows before it holds.
    pub max_doublings: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: retry::MAX_RETRIES,
            start_delay: retry::START_DELAY,
            backoff_base: retry::BACKOFF_BASE,
            max_doublings: retry::MAX_DOUBLINGS,
        }
    }
}

impl RetryPolicy {
    /// Whether a response status is worth another attempt.
    pub fn is_retryable_status(status: u16) -> bool {
        status >= 500 || status == 403 || status == 429
    }

    /// Run `call` until it succeeds, fails permanently, or retries run out.
    ///
    /// When retries run out, a transport error is returned as is and an
    /// error status is returned as the last response.
    pub fn run<F>(&self, mut call: F) -> Result<ApiResponse, TransportError>
    where
        F: FnMut() -> Result<ApiResponse, TransportError>,
    {
        let mut delay = self.start_delay;
        let mut tries = 0;
        loop {
            let can_retry = tries < self.max_retries;
            match call() {
                Ok(mut response) => {
                    response.attempts = tries + 1;
                    if !Self::is_retryable_status(response.status) || !can_retry {
                        return Ok(response);
                    }
                    warn!("Response: {}", response.status);
                }
                Err(e) => {
                    if !e.is_transient() || !can_retry {
                        return Err(e);
                    }
                    warn!("Error: {e}");
                }
            }

            info!(
                "Retrying in {}s, {} of {} retries",
                delay.as_secs(),
                tries + 1,
                self.max_retries
            );
            std::thread::sleep(delay);
            if tries < self.max_doublings {
                delay = delay.saturating_mul(self.backoff_base);
            }
            tries += 1;
        }
    }

    /// Delays slept between calls when every call is retried.
    pub fn schedule(&self) -> Vec<Duration> {
        let mut delay = self.start_delay;
        (0..self.max_retries)
            .map(|tries| {
                let current = delay;
                if tries < self.max_doublings {
                    delay = delay.saturating_mul(self.backoff_base);
                }
                current
            })
            .collect()
    }
}
