//! Bounded retry execution for transient network failures.
//!
//! Every network-calling check funnels its I/O through [`retry_async`], which
//! retries an async operation a fixed number of times with a fixed wait, but
//! only when the failure matches the caller's transience predicate. Different
//! checks retry on different failure sets (the certificate path also retries
//! TLS handshake failures, for example), so the predicate is parameterized
//! per call site.

use std::future::Future;
use std::time::Duration;

use anyhow::Error;
use thiserror::Error as ThisError;
use tokio_retry::strategy::FixedInterval;
use tokio_retry::RetryIf;

use crate::config::constants::{RETRY_MAX_ATTEMPTS, RETRY_WAIT_SECS};

/// Attempt ceiling and fixed inter-attempt wait for retried operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Always at least 1.
    pub attempts: usize,
    /// Fixed delay between attempts.
    pub wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            attempts: RETRY_MAX_ATTEMPTS,
            wait: Duration::from_secs(RETRY_WAIT_SECS),
        }
    }
}

impl RetryPolicy {
    /// A policy with no wait between attempts. Intended for tests.
    pub fn immediate(attempts: usize) -> Self {
        RetryPolicy {
            attempts,
            wait: Duration::ZERO,
        }
    }
}

/// Terminal outcome of a retried operation.
#[derive(Debug, ThisError)]
pub enum RetryError {
    /// Every attempt failed with a transient error. Distinct from the
    /// underlying error and carries the number of attempts made.
    #[error("retries exhausted after {attempts} attempts: {source}")]
    Exhausted {
        /// Number of attempts made before giving up.
        attempts: usize,
        /// The transient error observed on the final attempt.
        source: Error,
    },
    /// The operation failed with an error outside the transient set; it was
    /// not retried.
    #[error("{0}")]
    Fatal(Error),
}

/// Executes `operation` up to `policy.attempts` times, waiting `policy.wait`
/// between attempts, retrying only when `is_transient` accepts the failure.
///
/// Non-matching failures propagate immediately as [`RetryError::Fatal`];
/// exhaustion converts to [`RetryError::Exhausted`].
pub async fn retry_async<T, F, Fut, P>(
    policy: &RetryPolicy,
    is_transient: P,
    operation: F,
) -> Result<T, RetryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
    P: Fn(&Error) -> bool,
{
    let strategy = FixedInterval::new(policy.wait).take(policy.attempts.saturating_sub(1));

    match RetryIf::spawn(strategy, operation, |err: &Error| is_transient(err)).await {
        Ok(value) => Ok(value),
        Err(err) if is_transient(&err) => Err(RetryError::Exhausted {
            attempts: policy.attempts,
            source: err,
        }),
        Err(err) => Err(RetryError::Fatal(err)),
    }
}

/// Transience predicate for plain HTTP probes: timeouts and connection
/// failures are worth retrying, everything else is not.
pub fn is_transient_http_error(error: &Error) -> bool {
    for cause in error.chain() {
        if let Some(reqwest_err) = cause.downcast_ref::<reqwest::Error>() {
            return reqwest_err.is_timeout() || reqwest_err.is_connect();
        }
    }
    false
}
