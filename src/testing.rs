//! Test doubles for the reporter capability.
//!
//! [`StubReporter`] stands in for a real test-reporting sink: it buffers
//! diagnostic texts, tracks the failed flag, and holds registered cleanups
//! until [`finish`] drains them the way a test framework does at test end.
//! The crate's own tests assert against it, and downstream code can use it
//! to test custom retry helpers without a live test framework.
//!
//! ```rust
//! use eventide::testing::StubReporter;
//! use eventide::Reporter;
//!
//! let mut stub = StubReporter::new();
//! stub.log("foo");
//! stub.errorf(format_args!("{} - {}", "bar", "baz"));
//! stub.cleanup(Box::new(|| println!("deferred")));
//!
//! assert!(stub.failed());
//! assert_eq!(stub.logs(), ["foo", "bar - baz"]);
//! assert_eq!(stub.pending_cleanups(), 1);
//!
//! stub.finish(); // prints "deferred"
//! assert_eq!(stub.pending_cleanups(), 0);
//! ```
//!
//! [`finish`]: StubReporter::finish

use std::fmt;

use crate::reporter::{Cleanup, Reporter};
use crate::sandbox;

/// An in-memory real-sink double.
///
/// `log`/`error` texts land in one ordered buffer ([`logs`]); `fail_now`
/// raises the cooperative [`sandbox::abort`] signal, matching the real
/// capability's stop-immediately contract, so a stub works correctly even
/// when driven inside a sandbox.
///
/// [`logs`]: StubReporter::logs
#[derive(Default)]
pub struct StubReporter {
    logs: Vec<String>,
    cleanups: Vec<Cleanup>,
    failed: bool,
}

impl StubReporter {
    /// Create an empty stub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `log`/`error` text received, in call order.
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    /// Number of registered cleanups not yet drained.
    pub fn pending_cleanups(&self) -> usize {
        self.cleanups.len()
    }

    /// Drain registered cleanups in reverse registration order — what a
    /// real test framework does when the test ends.
    pub fn finish(&mut self) {
        while let Some(action) = self.cleanups.pop() {
            action();
        }
    }
}

impl Reporter for StubReporter {
    fn log(&mut self, message: &str) {
        self.logs.push(message.to_owned());
    }

    fn error(&mut self, message: &str) {
        self.logs.push(message.to_owned());
        self.failed = true;
    }

    fn fail(&mut self) {
        self.failed = true;
    }

    fn fail_now(&mut self) -> ! {
        self.failed = true;
        sandbox::abort()
    }

    fn cleanup(&mut self, action: Cleanup) {
        self.cleanups.push(action);
    }

    fn failed(&self) -> bool {
        self.failed
    }
}

impl fmt::Debug for StubReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubReporter")
            .field("logs", &self.logs)
            .field("pending_cleanups", &self.cleanups.len())
            .field("failed", &self.failed)
            .finish()
    }
}
