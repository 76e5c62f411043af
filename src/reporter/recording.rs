//! Per-attempt event recording.

use std::fmt;
use std::mem;

use super::{Cleanup, ReportEvent, Reporter};
use crate::sandbox;

/// Buffers one attempt's reporter traffic instead of acting on a real sink.
///
/// An assertion block runs against a fresh `RecordingReporter`; afterwards
/// the buffered state is either **flushed** ([`cleanup_now`] runs the queued
/// cleanups and the events are dropped with the value) or **forwarded**
/// ([`forward_to`] replays everything onto the real sink exactly once).
///
/// [`fail_now`] raises the cooperative [`sandbox::abort`] signal, so a
/// recording attempt must be running inside [`sandbox::run`] for hard
/// failures to be contained.
///
/// # Examples
///
/// ```rust
/// use eventide::{RecordingReporter, ReportEvent, Reporter};
///
/// let mut reporter = RecordingReporter::new();
/// reporter.log("checking");
/// reporter.error("not ready");
///
/// assert!(reporter.failed());
/// assert_eq!(
///     reporter.events(),
///     [
///         ReportEvent::Log("checking".into()),
///         ReportEvent::Error("not ready".into()),
///     ]
/// );
/// ```
///
/// [`cleanup_now`]: RecordingReporter::cleanup_now
/// [`forward_to`]: RecordingReporter::forward_to
/// [`fail_now`]: Reporter::fail_now
#[derive(Default)]
pub struct RecordingReporter {
    events: Vec<ReportEvent>,
    cleanups: Vec<Cleanup>,
    failed: bool,
}

impl RecordingReporter {
    /// Create an empty recorder for a fresh attempt.
    pub fn new() -> Self {
        Self::default()
    }

    /// View of the events recorded so far, in call order.
    pub fn events(&self) -> &[ReportEvent] {
        &self.events
    }

    /// Number of cleanups currently queued.
    pub fn pending_cleanups(&self) -> usize {
        self.cleanups.len()
    }

    /// Execute the queued cleanups now, most recently registered first,
    /// leaving the queue empty.
    pub fn cleanup_now(&mut self) {
        while let Some(action) = self.cleanups.pop() {
            action();
        }
    }

    /// Replay the buffered events onto `real` in their original order, then
    /// hand the queued cleanups over to `real` one by one, preserving
    /// registration order.
    ///
    /// Handing the cleanups over individually keeps their execution with the
    /// real sink's own deferred drain: `real` runs them at its usual time,
    /// in reverse registration order, exactly as if the block had registered
    /// them there directly.
    pub fn forward_to(mut self, real: &mut (impl Reporter + ?Sized)) {
        for event in mem::take(&mut self.events) {
            match event {
                ReportEvent::Log(text) => real.log(&text),
                ReportEvent::Error(text) => real.error(&text),
                ReportEvent::FailMark => real.fail(),
            }
        }
        for action in mem::take(&mut self.cleanups) {
            real.cleanup(action);
        }
    }
}

impl Reporter for RecordingReporter {
    fn log(&mut self, message: &str) {
        self.events.push(ReportEvent::Log(message.to_owned()));
    }

    fn error(&mut self, message: &str) {
        self.events.push(ReportEvent::Error(message.to_owned()));
        self.failed = true;
    }

    fn fail(&mut self) {
        self.events.push(ReportEvent::FailMark);
        self.failed = true;
    }

    fn fail_now(&mut self) -> ! {
        self.fail();
        sandbox::abort()
    }

    fn cleanup(&mut self, action: Cleanup) {
        self.cleanups.push(action);
    }

    fn failed(&self) -> bool {
        self.failed
    }
}

impl Drop for RecordingReporter {
    fn drop(&mut self) {
        // A recorder abandoned on an early-exit path still owes its
        // cleanups one execution; flushing and forwarding leave the queue
        // empty, so this fires only for leftovers.
        self.cleanup_now();
    }
}

impl fmt::Debug for RecordingReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingReporter")
            .field("events", &self.events)
            .field("pending_cleanups", &self.cleanups.len())
            .field("failed", &self.failed)
            .finish()
    }
}
