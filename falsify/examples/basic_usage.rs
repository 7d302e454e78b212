//! Basic usage examples demonstrating the core Falsify API
//!
//! Shows properties over tuples, strings and dependent values, a failing
//! property with its shrunk counterexample, and replaying a session by seed.

use falsify::{
    Arbitrary, Outcome, RunConfig, Runner, char_range, check, constant_from, integer, pre,
    property, string_of, vec_of,
};
use std::time::Duration;

// Example 1: Simple property over a pair of integers
fn example_1_basic_property() {
    println!("=== Example 1: Basic Property Testing ===");

    let commutative = property(
        (integer(-100i32, 100), integer(-100i32, 100)),
        |(a, b)| a.wrapping_add(b) == b.wrapping_add(a),
    );

    let report = check(&commutative, &RunConfig::default());
    println!("{}", report);
}

// Example 2: A failing property and its shrunk counterexample
fn example_2_shrinking() {
    println!("\n=== Example 2: Shrinking ===");

    let both_small = property(
        (integer(0u32, 1000), integer(0u32, 1000)),
        |(a, b)| a < 5 || b < 5,
    );

    let report = Runner::new()
        .seed(42)
        .max_shrinks(500)
        .shrink_timeout(Duration::from_secs(1))
        .check(&both_small);

    print!("{}", report.detailed_report());
}

// Example 3: Preconditions and dependent generation
fn example_3_preconditions() {
    println!("\n=== Example 3: Preconditions and Chain ===");

    let division = property((integer(0u32, 1000), integer(0u32, 10)), |(a, b)| {
        if b == 0 {
            return pre(false);
        }
        Outcome::from(a / b * b + a % b == a)
    });
    let report = check(&division, &RunConfig::with_runs(200));
    println!("{} ({} inputs skipped)", report, report.num_skips);

    let sized = integer(0usize, 5).chain(|&len| vec_of(integer(0u8, 9), len));
    let report = check(
        &property(sized, |digits: Vec<u8>| digits.len() <= 5),
        &RunConfig::default(),
    );
    println!("{}", report);
}

// Example 4: Strings and replaying a session
fn example_4_strings_and_replay() {
    println!("\n=== Example 4: Strings and Replay ===");

    let words = string_of(char_range('a', 'z'), 1usize..=8);
    let no_vowels = property(words, |word: String| {
        !word.contains(['a', 'e', 'i', 'o', 'u'])
    });

    let first = check(&no_vowels, &RunConfig::default());
    println!("{}", first);

    let replay = check(&no_vowels, &RunConfig::with_seed(first.seed));
    println!(
        "Replayed seed {}: same failing run = {}",
        first.seed,
        first.failed_run == replay.failed_run
    );

    let tags = string_of(constant_from(['#', '@', '!']).no_shrink(), 2usize..=5);
    let report = check(
        &property(tags, |tag: String| tag.chars().count() >= 2),
        &RunConfig::default(),
    );
    println!("{}", report);
}

fn main() {
    env_logger::init();

    example_1_basic_property();
    example_2_shrinking();
    example_3_preconditions();
    example_4_strings_and_replay();
}
