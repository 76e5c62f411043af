//! Assert that a condition eventually holds.
//!
//! [`Eventually`] ties the crate together: it runs an assertion block once
//! per attempt inside [`sandbox::run`] against a fresh
//! [`RecordingReporter`], asks its [`RetryStrategy`] whether to go again,
//! and either flushes the attempt (cleanups run, output dropped) or
//! forwards it (output and cleanups replayed onto the real sink exactly
//! once).
//!
//! # Quick Start
//!
//! ```rust
//! use eventide::testing::StubReporter;
//! use eventide::{Eventually, Reporter};
//!
//! let mut stub = StubReporter::new();
//! let mut left = 2;
//!
//! // Two retries on top of the initial attempt.
//! Eventually::up_to(2).assert(&mut stub, |it| {
//!     if left > 0 {
//!         left -= 1;
//!         it.errorf(format_args!("{left} to go"));
//!     }
//! });
//!
//! assert!(!stub.failed());
//! assert!(stub.logs().is_empty()); // failed attempts left no trace
//! ```

use std::cell::Cell;
use std::panic::resume_unwind;
use std::time::Duration;

use crate::reporter::{RecordingReporter, Reporter};
use crate::sandbox::{self, Outcome, PanicPayload};
use crate::strategy::{RetryCount, RetryStrategy, Waiter};

/// Retries an assertion block under a pluggable strategy, isolating each
/// attempt's side effects and replaying exactly one attempt to the real
/// reporter.
///
/// See [`assert`] for the full contract.
///
/// [`assert`]: Eventually::assert
#[derive(Debug, Clone)]
pub struct Eventually<S> {
    retry_strategy: S,
}

impl Eventually<Waiter> {
    /// Keep retrying until `timeout` of wall time has elapsed.
    pub fn within(timeout: Duration) -> Self {
        Self::new(Waiter::new(timeout))
    }
}

impl Eventually<RetryCount> {
    /// Retry at most `retries` times beyond the initial attempt.
    pub fn up_to(retries: usize) -> Self {
        Self::new(RetryCount(retries))
    }
}

impl<S: RetryStrategy> Eventually<S> {
    /// Create an orchestrator driven by the given strategy.
    pub fn new(retry_strategy: S) -> Self {
        Self { retry_strategy }
    }

    /// Get the strategy driving this orchestrator.
    pub fn retry_strategy(&self) -> &S {
        &self.retry_strategy
    }

    /// Run `block` until it stops failing or the strategy's budget runs out,
    /// then replay the terminal attempt onto `real`.
    ///
    /// Each attempt gets a fresh [`RecordingReporter`] and runs inside
    /// [`sandbox::run`], so a [`fail_now`] inside the block ends only that
    /// attempt. Between attempts, the superseded attempt is flushed: its
    /// cleanups run immediately (most recently registered first) and its
    /// buffered output is discarded. The terminal attempt — the first
    /// non-failing one, or the last one the budget allowed — is forwarded:
    /// its events replay onto `real` in order, and its cleanups are
    /// registered on `real` for the sink's own deferred drain.
    ///
    /// Guarantees:
    /// - `block` executes at least once, whatever the strategy does.
    /// - `real` ends failed only if the terminal attempt failed, and carries
    ///   only that attempt's diagnostics.
    /// - Every attempt's cleanups run exactly once — flushed between
    ///   attempts, or via the forwarded registration.
    ///
    /// # Panics
    ///
    /// A genuine panic inside `block` is never retried: the attempt's
    /// cleanups run, its buffered output is discarded, and the exact
    /// original payload is re-raised to the caller. The discard mirrors the
    /// flush path — the panic itself is the diagnostic of record, and
    /// replaying half an attempt's output just before unwinding past `real`
    /// would interleave with the panic report.
    ///
    /// [`fail_now`]: Reporter::fail_now
    pub fn assert<R, F>(&self, real: &mut R, mut block: F)
    where
        R: Reporter + ?Sized,
        F: FnMut(&mut RecordingReporter) + Send,
    {
        let mut last: Option<RecordingReporter> = None;
        let mut fault: Option<PanicPayload> = None;
        let rounds = Cell::new(0_usize);

        {
            let mut attempt = || -> bool {
                if let Some(mut superseded) = last.take() {
                    superseded.cleanup_now();
                }
                rounds.set(rounds.get() + 1);
                let mut recorder = RecordingReporter::new();
                let outcome = sandbox::run(|| block(&mut recorder));
                match outcome {
                    Outcome::Panicked(payload) => {
                        recorder.cleanup_now();
                        fault = Some(payload);
                        false
                    }
                    Outcome::Completed | Outcome::Aborted => {
                        let failed = recorder.failed();
                        #[cfg(feature = "tracing")]
                        tracing::trace!(round = rounds.get(), failed, "assertion attempt finished");
                        last = Some(recorder);
                        failed
                    }
                }
            };

            self.retry_strategy.while_retrying(&mut attempt);

            if rounds.get() == 0 {
                // A strategy that never consults its condition still owes
                // the block one run.
                attempt();
            }
        }

        if let Some(payload) = fault {
            resume_unwind(payload);
        }
        if let Some(terminal) = last {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                rounds = rounds.get(),
                failed = terminal.failed(),
                "forwarding terminal attempt"
            );
            terminal.forward_to(real);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubReporter;

    #[test]
    fn block_runs_once_when_strategy_never_calls_its_condition() {
        struct Inert;
        impl RetryStrategy for Inert {
            fn while_retrying(&self, _condition: &mut dyn FnMut() -> bool) {}
        }

        let mut stub = StubReporter::new();
        let mut calls = 0;
        Eventually::new(Inert).assert(&mut stub, |it| {
            calls += 1;
            it.log("ran anyway");
        });

        assert_eq!(calls, 1);
        assert_eq!(stub.logs(), ["ran anyway"]);
    }

    #[test]
    fn retry_strategy_getter_returns_the_configured_strategy() {
        let eventually = Eventually::up_to(3);
        assert_eq!(*eventually.retry_strategy(), RetryCount(3));
    }

    #[test]
    fn works_through_a_reporter_trait_object() {
        let mut stub = StubReporter::new();
        let real: &mut dyn Reporter = &mut stub;
        Eventually::up_to(0).assert(real, |it| it.log("dyn sink"));
        assert_eq!(stub.logs(), ["dyn sink"]);
    }
}
