//! Sandboxed execution of one unit of work.
//!
//! [`run`] executes a closure on a dedicated thread and reports how it
//! finished as an [`Outcome`]: returned normally, stopped itself via the
//! cooperative [`abort`] signal, or unwound with a genuine panic. Neither an
//! abort nor a panic escapes to the caller — the panic payload is handed back
//! as data instead.
//!
//! The sandbox exists for containment, not parallelism: `run` joins the
//! thread before returning, and it never applies a timeout of its own. A
//! closure that never returns blocks forever; bounding work is the caller's
//! job (inside [`Eventually`], the retry strategy's).
//!
//! The module is usable standalone:
//!
//! ```rust
//! use eventide::sandbox;
//!
//! let outcome = sandbox::run(|| sandbox::abort());
//! assert!(outcome.is_aborted());
//!
//! let outcome = sandbox::run(|| panic!("boom"));
//! assert!(outcome.is_panicked());
//! ```
//!
//! [`Eventually`]: crate::Eventually

use std::any::Any;
use std::fmt;
use std::panic::{self, resume_unwind};
use std::sync::Once;
use std::thread;

/// Payload of a genuine panic captured by [`run`].
pub type PanicPayload = Box<dyn Any + Send + 'static>;

/// Sentinel unwind payload raised by [`abort`]. Recognized by type, never by
/// message, so it cannot collide with a user panic.
struct AbortSignal;

/// How a sandboxed closure finished.
///
/// Exactly one of the three ways holds, by construction. An explicitly
/// uninformative panic payload (say `panic_any(())`) is still a *present*
/// payload, so it stays distinguishable from "no panic occurred".
pub enum Outcome {
    /// The closure returned normally.
    Completed,
    /// The closure stopped itself via [`abort`].
    Aborted,
    /// The closure unwound with a genuine panic; the exact payload is
    /// captured here, not re-raised.
    Panicked(PanicPayload),
}

impl Outcome {
    /// Whether the closure returned normally.
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed)
    }

    /// Whether the closure stopped itself via [`abort`].
    pub fn is_aborted(&self) -> bool {
        matches!(self, Outcome::Aborted)
    }

    /// Whether the closure unwound with a genuine panic.
    pub fn is_panicked(&self) -> bool {
        matches!(self, Outcome::Panicked(_))
    }

    /// Borrow the captured panic payload, if any.
    pub fn panic_value(&self) -> Option<&(dyn Any + Send)> {
        match self {
            Outcome::Panicked(payload) => Some(payload.as_ref()),
            _ => None,
        }
    }

    /// Take the captured panic payload, if any.
    pub fn into_panic_value(self) -> Option<PanicPayload> {
        match self {
            Outcome::Panicked(payload) => Some(payload),
            _ => None,
        }
    }

    /// Re-raise a captured panic on the current thread with its exact
    /// original payload; the other outcomes pass through unchanged.
    pub fn resume(self) -> Outcome {
        match self {
            Outcome::Panicked(payload) => resume_unwind(payload),
            other => other,
        }
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Completed => f.write_str("Completed"),
            Outcome::Aborted => f.write_str("Aborted"),
            Outcome::Panicked(payload) => {
                // str and String cover what panic! produces; anything else is opaque.
                if let Some(message) = payload.downcast_ref::<&str>() {
                    write!(f, "Panicked({message:?})")
                } else if let Some(message) = payload.downcast_ref::<String>() {
                    write!(f, "Panicked({message:?})")
                } else {
                    f.write_str("Panicked(<opaque payload>)")
                }
            }
        }
    }
}

/// Cooperatively stop the current sandboxed unit of execution.
///
/// Unwinds the current thread with a private sentinel that [`run`] reports
/// as [`Outcome::Aborted`]. Destructors of values on the unwound stack run
/// as usual, so deferred releases are honored before `run` returns.
///
/// The unwind is silent: the sentinel is filtered out of panic-hook output,
/// so an aborted attempt does not print a "thread panicked" report.
///
/// Calling `abort` outside a sandbox unwinds into whatever catches panics
/// there — in a `#[test]`, the test fails.
pub fn abort() -> ! {
    silence_abort_unwinds();
    panic::panic_any(AbortSignal)
}

/// Install (once, process-wide) a delegating panic hook that stays silent
/// for [`AbortSignal`] unwinds and hands everything else to the hook that
/// was previously installed.
fn silence_abort_unwinds() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if info.payload().downcast_ref::<AbortSignal>().is_none() {
                previous(info);
            }
        }));
    });
}

/// Run `f` to completion on a dedicated thread and report how it finished.
///
/// The thread is joined before `run` returns, so no work outlives the call
/// and nothing runs concurrently with the caller. Because the closure runs
/// on its own thread, `run` needs no `UnwindSafe` bound and borrows from the
/// caller's stack are fine.
///
/// # Examples
///
/// ```rust
/// use eventide::sandbox;
///
/// let mut visited = false;
/// let outcome = sandbox::run(|| visited = true);
/// assert!(outcome.is_completed());
/// assert!(visited);
/// ```
///
/// The exact panic payload is captured, not re-raised:
///
/// ```rust
/// use eventide::sandbox;
///
/// let outcome = sandbox::run(|| panic!("expected {}", 42));
/// let payload = outcome.into_panic_value().unwrap();
/// assert_eq!(payload.downcast_ref::<String>().unwrap(), "expected 42");
/// ```
pub fn run<F>(f: F) -> Outcome
where
    F: FnOnce() + Send,
{
    thread::scope(|scope| match scope.spawn(f).join() {
        Ok(()) => Outcome::Completed,
        Err(payload) if payload.is::<AbortSignal>() => Outcome::Aborted,
        Err(payload) => Outcome::Panicked(payload),
    })
}
