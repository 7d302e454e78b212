//! Async properties driven by a tokio runtime.

use std::cell::RefCell;
use std::time::Duration;

use falsify::{
    PropertyError, RunConfig, Runner, assert_property_async, async_property, check_async,
    constant, integer, pre,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[tokio::test]
async fn runs_complete_in_order() {
    init_logger();

    let log = &RefCell::new(Vec::new());
    let prop = async_property(integer(0u32, 1000), move |x| async move {
        log.borrow_mut().push(("start", x));
        tokio::time::sleep(Duration::from_millis(1)).await;
        log.borrow_mut().push(("end", x));
        true
    });

    let report = check_async(&prop, &RunConfig::with_runs(10)).await;
    assert!(report.is_success());

    let log = log.take();
    assert_eq!(log.len(), 20);
    for pair in log.chunks(2) {
        assert_eq!(pair[0].0, "start");
        assert_eq!(pair[1].0, "end");
        assert_eq!(pair[0].1, pair[1].1);
    }
}

#[tokio::test]
async fn async_failure_is_shrunk() {
    init_logger();

    let prop = async_property(
        (integer(0i32, 1000), integer(0i32, 1000)),
        |(a, b)| async move {
            tokio::task::yield_now().await;
            a < 5 || b < 5
        },
    );

    let report = check_async(&prop, &RunConfig::with_seed(42)).await;
    assert_eq!(report.counterexample, Some((5, 5)));
}

#[tokio::test]
async fn async_predicates_may_skip() {
    init_logger();

    let prop = async_property(integer(0u8, 9), |x| async move { pre(x != 3) });
    let report = Runner::new().seed(2).check_async(&prop).await;

    assert!(report.is_success());
}

#[tokio::test]
async fn never_finishing_run_fails_with_timeout() {
    init_logger();

    let prop = async_property(constant(()), |_| std::future::pending::<bool>());
    let config = RunConfig {
        timeout: Some(Duration::from_millis(10)),
        ..RunConfig::with_seed(3)
    };

    let report = tokio::time::timeout(Duration::from_secs(2), check_async(&prop, &config))
        .await
        .expect("session should end once the run budget passes");

    match report.error {
        Some(PropertyError::Timeout {
            run,
            elapsed,
            limit,
        }) => {
            assert_eq!(run, 1);
            assert_eq!(limit, Duration::from_millis(10));
            assert!(elapsed >= limit);
            assert!(elapsed < Duration::from_secs(1));
        }
        other => panic!("expected a timeout, got {:?}", other),
    }
    assert!(
        report
            .failure_reason()
            .unwrap()
            .starts_with("Property timeout")
    );
}

#[tokio::test]
async fn slow_run_is_cut_off_at_the_budget() {
    init_logger();

    let prop = async_property(constant(()), |_| async {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        true
    });
    let report = Runner::new()
        .seed(3)
        .timeout(Duration::from_millis(10))
        .check_async(&prop)
        .await;

    assert_eq!(report.failed_run, Some(1));
    assert!(matches!(report.error, Some(PropertyError::Timeout { .. })));
    assert!(report.duration < Duration::from_secs(1));
}

#[tokio::test]
async fn timed_out_candidates_count_as_failures_while_shrinking() {
    init_logger();

    let prop = async_property(integer(0u32, 1000), |x| async move {
        if x >= 10 {
            std::future::pending::<()>().await;
        }
        true
    });
    let report = Runner::new()
        .seed(6)
        .timeout(Duration::from_millis(5))
        .check_async(&prop)
        .await;

    assert_eq!(report.counterexample, Some(10));
    assert!(matches!(report.error, Some(PropertyError::Timeout { .. })));
}

#[tokio::test]
async fn fast_runs_stay_within_timeout() {
    init_logger();

    let prop = async_property(integer(0u32, 10), |x| async move { x <= 10 });
    let report = Runner::new()
        .num_runs(20)
        .timeout(Duration::from_secs(5))
        .check_async(&prop)
        .await;

    assert!(report.is_success());
}

#[tokio::test]
#[should_panic(expected = "Counterexample: 10")]
async fn async_assertion_panics_on_failure() {
    let prop = async_property(integer(0u32, 100), |x| async move { x < 10 });
    assert_property_async(&prop, &RunConfig::with_seed(8)).await;
}
