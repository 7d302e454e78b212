//! End-to-end shrinking behaviour through the public API.

use falsify::{
    Arbitrary, RunConfig, Runner, char_range, check, constant_from, from_fn, integer, property,
    shrink_integer, string_of, vec_of,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn pair_shrinks_to_both_boundaries() {
    init_logger();

    let hundred = from_fn(|_| 100i32, |value: &i32| shrink_integer(*value, 0));
    let prop = property((hundred.clone(), hundred), |(a, b)| a < 5 || b < 5);

    let report = check(&prop, &RunConfig::with_seed(0));

    assert_eq!(report.original, Some((100, 100)));
    assert_eq!(report.counterexample, Some((5, 5)));
    assert_eq!(report.failed_run, Some(1));
    assert!(report.shrink_completed);
}

#[test]
fn random_pair_reaches_local_minimum() {
    init_logger();

    let prop = property(
        (integer(-1000i32, 1000), integer(-1000i32, 1000)),
        |(a, b)| a < 5 || b < 5,
    );

    for seed in 0..10 {
        let report = check(&prop, &RunConfig::with_seed(seed));
        let (a, b) = report.original.unwrap();
        assert!(a >= 5 && b >= 5);
        assert_eq!(report.counterexample, Some((5, 5)));
    }
}

#[test]
fn string_lengths_and_alphabet_hold_while_shrinking() {
    init_logger();

    let alphabet = ['\u{1f431}', 'D', '1'];
    let strings = string_of(constant_from(alphabet).no_shrink(), 2usize..=5);

    // Fails on every input, so the whole shrink path is visited.
    let seen = std::cell::RefCell::new(Vec::new());
    let prop = property(strings, |s: String| {
        seen.borrow_mut().push(s);
        false
    });

    for seed in 0..20 {
        let report = check(&prop, &RunConfig::with_seed(seed));
        assert_eq!(report.counterexample.as_ref().map(|s| s.chars().count()), Some(2));
    }

    let seen = seen.take();
    assert!(!seen.is_empty());
    for s in seen {
        let len = s.chars().count();
        assert!((2..=5).contains(&len), "bad length {} for {:?}", len, s);
        assert!(s.chars().all(|c| alphabet.contains(&c)), "bad alphabet in {:?}", s);
    }
}

#[test]
fn shrinking_never_produces_larger_values() {
    init_logger();

    let seen = std::cell::RefCell::new(Vec::new());
    let prop = property(integer(0u32, 100_000), |x| {
        seen.borrow_mut().push(x);
        x < 777
    });

    let report = check(&prop, &RunConfig::with_seed(17));
    let original = report.original.unwrap();
    let seen = seen.take();
    let from_failure = seen.iter().position(|x| *x == original).unwrap();

    assert!(seen[from_failure..].iter().all(|x| *x <= original));
    assert_eq!(report.counterexample, Some(777));
}

#[test]
fn vector_shrinks_to_smallest_failing_shape() {
    init_logger();

    let prop = property(vec_of(integer(0u8, 50), 0usize..=20), |items: Vec<u8>| {
        items.iter().all(|item| *item < 10)
    });

    let report = check(&prop, &RunConfig::with_seed(3));
    let counterexample = report.counterexample.unwrap();

    // Leading elements are dropped and passing ones shrink to zero.
    assert_eq!(counterexample[0], 10);
    assert!(counterexample[1..].iter().all(|item| *item == 0));
}

#[test]
fn chain_keeps_dependent_bounds_while_shrinking() {
    init_logger();

    let bounded = integer(1usize, 8).chain(|&len| vec_of(char_range('a', 'z'), len));
    let seen = std::cell::RefCell::new(Vec::new());
    let prop = property(bounded, |word: Vec<char>| {
        seen.borrow_mut().push(word.len());
        word.len() < 3
    });

    let report = check(&prop, &RunConfig::with_seed(5));

    assert_eq!(report.counterexample.map(|word| word.len()), Some(3));
    assert!(seen.take().iter().all(|len| (1..=8).contains(len)));
}

#[test]
fn no_shrink_reports_the_original() {
    init_logger();

    let prop = property(integer(10u32, 1000).no_shrink(), |x| x < 10);
    let report = check(&prop, &RunConfig::with_seed(2));

    assert_eq!(report.counterexample, report.original);
    assert_eq!(report.shrink_attempts, 0);
    assert!(report.shrink_completed);
}

#[test]
fn shrink_budget_keeps_best_so_far() {
    init_logger();

    let unlimited = Runner::new()
        .seed(99)
        .max_shrinks(100_000)
        .without_shrink_timeout();
    let prop = property(integer(0u64, 1 << 40), |x| x < 1000);

    let full = unlimited.clone().check(&prop);
    let truncated = unlimited.max_shrinks(5).check(&prop);

    assert_eq!(full.counterexample, Some(1000));
    assert!(full.shrink_completed);

    assert_eq!(truncated.original, full.original);
    assert_eq!(truncated.shrink_attempts, 5);
    assert!(!truncated.shrink_completed);
    assert!(truncated.counterexample.unwrap() >= 1000);
}
