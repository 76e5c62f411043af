//! Time-bounded retry strategy.

use std::thread;
use std::time::{Duration, Instant};

use super::RetryStrategy;

/// Retry until a wall-clock timeout elapses, optionally pausing between
/// checks.
///
/// The budget clock starts at the *first condition check* of each
/// [`while_retrying`] call, not at construction, so a single `Waiter` value
/// can be reused across independent assertions without leaking elapsed time
/// from one into the next.
///
/// A zero (or already-expired) timeout still permits exactly one check.
///
/// # Examples
///
/// ```rust
/// use eventide::{RetryStrategy, Waiter};
/// use std::time::Duration;
///
/// let waiter = Waiter::new(Duration::from_millis(50))
///     .with_wait_duration(Duration::from_millis(5));
///
/// assert_eq!(waiter.timeout(), Duration::from_millis(50));
/// assert_eq!(waiter.wait_duration(), Duration::from_millis(5));
///
/// // Even with no budget at all, the condition runs once.
/// let mut checks = 0;
/// Waiter::new(Duration::ZERO).while_retrying(&mut || {
///     checks += 1;
///     true
/// });
/// assert_eq!(checks, 1);
/// ```
///
/// [`while_retrying`]: RetryStrategy::while_retrying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Waiter {
    wait_duration: Duration,
    timeout: Duration,
}

impl Waiter {
    /// Create a waiter that keeps retrying until `timeout` of wall time has
    /// elapsed since its first condition check.
    ///
    /// Starts with no pause between checks; see [`with_wait_duration`].
    ///
    /// [`with_wait_duration`]: Waiter::with_wait_duration
    pub fn new(timeout: Duration) -> Self {
        Self {
            wait_duration: Duration::ZERO,
            timeout,
        }
    }

    /// Set the pause inserted between consecutive checks.
    pub fn with_wait_duration(mut self, wait_duration: Duration) -> Self {
        self.wait_duration = wait_duration;
        self
    }

    /// Get the wall-clock budget.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the pause between consecutive checks.
    pub fn wait_duration(&self) -> Duration {
        self.wait_duration
    }
}

impl RetryStrategy for Waiter {
    fn while_retrying(&self, condition: &mut dyn FnMut() -> bool) {
        let first_check = Instant::now();
        while condition() {
            if first_check.elapsed() >= self.timeout {
                break;
            }
            if !self.wait_duration.is_zero() {
                thread::sleep(self.wait_duration);
            }
        }
    }
}
