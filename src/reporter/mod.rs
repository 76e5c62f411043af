//! The test-reporting capability and the per-attempt recording proxy.
//!
//! [`Reporter`] is the surface an assertion block talks to: diagnostic
//! output, failure marking, and deferred cleanup registration. Real sinks
//! (adapters over an actual test framework, or [`StubReporter`] in tests)
//! implement it, and so does [`RecordingReporter`] — the proxy that buffers
//! one attempt's traffic so it can later be replayed or discarded as a unit.
//!
//! [`StubReporter`]: crate::testing::StubReporter

mod recording;

pub use recording::RecordingReporter;

use std::fmt;

/// A single diagnostic event recorded during an attempt.
///
/// Events preserve the exact formatted text and the order of the calls that
/// produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReportEvent {
    /// Plain diagnostic output.
    Log(String),
    /// Diagnostic output that also fails the test.
    Error(String),
    /// A bare failure mark with no text of its own.
    FailMark,
}

/// A deferred action registered on a reporter, run when the owning sink
/// drains its cleanup queue.
pub type Cleanup = Box<dyn FnOnce() + Send + 'static>;

/// The test-reporting capability.
///
/// Failure comes in two strengths:
/// - **soft** — [`error`]/[`errorf`]/[`fail`] mark the test failed and let
///   the caller keep executing;
/// - **hard** — [`fail_now`] marks the test failed and stops the current
///   execution immediately by unwinding. The divergence is part of the
///   contract and is encoded in the signature.
///
/// Cleanups registered via [`cleanup`] are owed exactly one execution, in
/// reverse registration order (most recently registered first), when the
/// sink drains its queue.
///
/// [`error`]: Reporter::error
/// [`errorf`]: Reporter::errorf
/// [`fail`]: Reporter::fail
/// [`fail_now`]: Reporter::fail_now
/// [`cleanup`]: Reporter::cleanup
pub trait Reporter {
    /// Record a line of diagnostic output.
    fn log(&mut self, message: &str);

    /// Record diagnostic output and mark the test failed; execution
    /// continues.
    fn error(&mut self, message: &str);

    /// Mark the test failed; execution continues.
    fn fail(&mut self);

    /// Mark the test failed and stop the current execution immediately by
    /// unwinding.
    fn fail_now(&mut self) -> !;

    /// Register a deferred action, drained later in reverse registration
    /// order.
    fn cleanup(&mut self, action: Cleanup);

    /// Whether any failure (soft or hard) has been reported so far.
    fn failed(&self) -> bool;

    /// Record formatted diagnostic output.
    ///
    /// ```rust
    /// use eventide::{RecordingReporter, ReportEvent, Reporter};
    ///
    /// let mut reporter = RecordingReporter::new();
    /// reporter.logf(format_args!("{} - {}", "bar", "baz"));
    /// assert_eq!(reporter.events(), [ReportEvent::Log("bar - baz".into())]);
    /// ```
    fn logf(&mut self, args: fmt::Arguments<'_>) {
        self.log(&args.to_string());
    }

    /// Record formatted diagnostic output and mark the test failed;
    /// execution continues.
    fn errorf(&mut self, args: fmt::Arguments<'_>) {
        self.error(&args.to_string());
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn report_event_round_trips_through_json() {
        let events = vec![
            ReportEvent::Log("foo".into()),
            ReportEvent::Error("bar".into()),
            ReportEvent::FailMark,
        ];
        let json = serde_json::to_string(&events).unwrap();
        let back: Vec<ReportEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, events);
    }
}
