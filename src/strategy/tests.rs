//! Cross-type tests for retry strategies.

use super::*;
use std::time::{Duration, Instant};

fn count_checks(strategy: &dyn RetryStrategy, mut condition: impl FnMut(usize) -> bool) -> usize {
    let mut checks = 0;
    strategy.while_retrying(&mut || {
        checks += 1;
        condition(checks)
    });
    checks
}

#[test]
fn retry_count_zero_still_checks_once() {
    assert_eq!(count_checks(&RetryCount(0), |_| true), 1);
    assert_eq!(count_checks(&RetryCount(0), |_| false), 1);
}

#[test]
fn retry_count_checks_max_retries_plus_one() {
    assert_eq!(count_checks(&RetryCount(7), |_| true), 8);
}

#[test]
fn retry_count_stops_on_first_false() {
    assert_eq!(count_checks(&RetryCount(10), |_| false), 1);
    assert_eq!(count_checks(&RetryCount(10), |n| n < 4), 4);
}

#[test]
fn retry_count_value_is_reusable() {
    let strategy = RetryCount(2);
    assert_eq!(count_checks(&strategy, |_| true), 3);
    assert_eq!(count_checks(&strategy, |_| true), 3);
}

#[test]
fn waiter_zero_timeout_checks_exactly_once() {
    let waiter = Waiter::new(Duration::ZERO);
    assert_eq!(count_checks(&waiter, |_| true), 1);
}

#[test]
fn waiter_stops_on_first_false() {
    let waiter = Waiter::new(Duration::from_secs(60));
    assert_eq!(count_checks(&waiter, |_| false), 1);
}

#[test]
fn waiter_keeps_checking_until_timeout() {
    let waiter = Waiter::new(Duration::from_millis(30));
    let started = Instant::now();
    let checks = count_checks(&waiter, |_| true);
    assert!(checks > 1);
    assert!(started.elapsed() >= Duration::from_millis(30));
}

#[test]
fn waiter_pauses_between_checks() {
    let waiter = Waiter::new(Duration::from_millis(25)).with_wait_duration(Duration::from_millis(10));
    let checks = count_checks(&waiter, |_| true);
    // ~25ms of budget at one check per ~10ms pause: a handful at most.
    assert!((2..=6).contains(&checks), "got {checks} checks");
}

#[test]
fn waiter_clock_starts_per_call_not_at_construction() {
    let waiter = Waiter::new(Duration::from_millis(20));
    assert!(count_checks(&waiter, |_| true) > 1);
    std::thread::sleep(Duration::from_millis(30));
    // A construction-time clock would be exhausted by now.
    assert!(count_checks(&waiter, |_| true) > 1);
}

#[test]
fn closure_implements_retry_strategy() {
    let at_most_five = |condition: &mut dyn FnMut() -> bool| {
        for _ in 0..5 {
            if !condition() {
                break;
            }
        }
    };
    assert_eq!(count_checks(&at_most_five, |_| true), 5);
    assert_eq!(count_checks(&at_most_five, |_| false), 1);
}
