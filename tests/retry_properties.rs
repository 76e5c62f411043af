//! Property tests for retry budgets.

use eventide::testing::StubReporter;
use eventide::{Eventually, Reporter, RetryCount, RetryStrategy};
use proptest::prelude::*;

proptest! {
    #[test]
    fn retry_count_always_true_checks_n_plus_one(n in 0usize..128) {
        let mut checks = 0;
        RetryCount(n).while_retrying(&mut || {
            checks += 1;
            true
        });
        prop_assert_eq!(checks, n + 1);
    }

    #[test]
    fn retry_count_always_false_checks_once(n in 0usize..10_000) {
        let mut checks = 0;
        RetryCount(n).while_retrying(&mut || {
            checks += 1;
            false
        });
        prop_assert_eq!(checks, 1);
    }

    #[test]
    fn retry_count_stops_at_first_satisfied_check(
        n in 0usize..128,
        satisfied_after in 1usize..128,
    ) {
        let mut checks = 0;
        RetryCount(n).while_retrying(&mut || {
            checks += 1;
            checks < satisfied_after
        });
        prop_assert_eq!(checks, (n + 1).min(satisfied_after));
    }

    #[test]
    fn eventually_runs_the_block_until_its_first_success(failures in 0usize..40) {
        let mut calls = 0usize;
        let mut stub = StubReporter::new();

        Eventually::up_to(40).assert(&mut stub, |it| {
            calls += 1;
            if calls <= failures {
                it.fail();
            }
        });

        prop_assert_eq!(calls, failures + 1);
        prop_assert!(!stub.failed());
    }
}
