//! Property session execution: generate-and-check runs followed by a greedy shrink search.
//!
//! A session draws one input per run from a single [`Random`] seeded from
//! [`RunConfig::seed`] (or a fresh seed, which is reported). The first failing
//! run stops the session and its input is shrunk: candidates are pulled from
//! the current counterexample one at a time, the first one that still fails is
//! adopted and the search restarts from its own candidates. Shrinking ends
//! when no candidate fails or when `max_shrinks` / `shrink_timeout` run out.
//!
//! Async evaluations race the predicate against a [`Delay`] of
//! [`RunConfig::timeout`]; the predicate future is dropped as soon as the
//! timer fires.

use std::fmt;
use std::pin::pin;
use std::time::{Duration, Instant};

use futures_timer::Delay;
use futures_util::future::{Either, select};
use log::{debug, trace, warn};

use crate::arbitrary::Generated;
use crate::config::RunConfig;
use crate::error::PropertyError;
use crate::property::{AsyncProperty, Outcome, Property};
use crate::report::{RunOutcome, RunReport};
use crate::rng::{Random, fresh_seed};
use crate::shrink::Shrinkable;

/// Verdict of one evaluation as seen by the runner
enum Verdict {
    Pass,
    Skip,
    Fail(PropertyError),
}

impl From<Outcome> for Verdict {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Pass => Verdict::Pass,
            Outcome::Skip => Verdict::Skip,
            Outcome::Fail(message) => Verdict::Fail(PropertyError::PredicateFailed { message }),
        }
    }
}

/// Bookkeeping shared by the sync and async drivers
struct Session<'a> {
    config: &'a RunConfig,
    seed: u64,
    rng: Random,
    started: Instant,
    num_skips: usize,
}

impl<'a> Session<'a> {
    fn begin(config: &'a RunConfig) -> Self {
        let seed = config.seed.unwrap_or_else(fresh_seed);
        debug!(
            "Checking property: {} runs, seed {}",
            config.num_runs, seed
        );
        Self {
            config,
            seed,
            rng: Random::from_seed(seed),
            started: Instant::now(),
            num_skips: 0,
        }
    }

    /// Report an invalid configuration before any run is attempted
    fn rejected<T>(&self) -> Option<RunReport<T>> {
        let error = self.config.validate().err()?;
        warn!("Rejected property configuration: {}", error);
        Some(self.abort(0, error.into()))
    }

    fn draw<T>(&self, generated: Generated<T>, run: usize) -> Result<Shrinkable<T>, PropertyError> {
        generated.map_err(|source| {
            debug!("Generation failed on run {}: {}", run, source);
            PropertyError::GenerationExhausted { run, source }
        })
    }

    /// Count a skipped input; past the retry cap the session is over
    fn skip<T: fmt::Debug>(&mut self, run: usize, skips: &mut usize, value: &T) -> Option<RunReport<T>> {
        *skips += 1;
        self.num_skips += 1;
        trace!("Run {} skipped {:?} ({} skips)", run, value, skips);

        if *skips > self.config.skip_retry_limit {
            debug!(
                "Run {} exceeded the skip limit of {}",
                run, self.config.skip_retry_limit
            );
            return Some(self.abort(run, PropertyError::SkipLimitReached { run, skips: *skips }));
        }
        None
    }

    fn abort<T>(&self, run: usize, error: PropertyError) -> RunReport<T> {
        RunReport::aborted(self.seed, run, self.num_skips, error, self.started.elapsed())
    }

    fn passed<T>(&self) -> RunReport<T> {
        debug!("Property passed {} runs", self.config.num_runs);
        RunReport::passed(
            self.seed,
            self.config.num_runs,
            self.num_skips,
            self.started.elapsed(),
        )
    }

    fn failed<T: 'static>(&self, run: usize, search: Search<T>) -> RunReport<T> {
        debug!(
            "Shrinking finished after {} adoptions and {} candidates",
            search.num_shrinks, search.attempts
        );
        RunReport {
            outcome: RunOutcome::Failed,
            seed: self.seed,
            num_runs: run,
            num_skips: self.num_skips,
            num_shrinks: search.num_shrinks,
            shrink_attempts: search.attempts,
            shrink_completed: search.completed,
            failed_run: Some(run),
            original: Some(search.original),
            counterexample: Some(search.current.into_value()),
            error: Some(search.error),
            duration: self.started.elapsed(),
        }
    }
}

/// State of the shrink search for one failing run
struct Search<T> {
    original: T,
    current: Shrinkable<T>,
    error: PropertyError,
    num_shrinks: usize,
    attempts: usize,
    completed: bool,
    started: Instant,
}

impl<T: Clone + fmt::Debug + 'static> Search<T> {
    fn new(failing: Shrinkable<T>, error: PropertyError) -> Self {
        Self {
            original: failing.value().clone(),
            current: failing,
            error,
            num_shrinks: 0,
            attempts: 0,
            completed: false,
            started: Instant::now(),
        }
    }

    fn within_budget(&self, config: &RunConfig) -> bool {
        if self.attempts >= config.max_shrinks {
            warn!(
                "Shrinking stopped after {} candidates (max_shrinks)",
                self.attempts
            );
            return false;
        }
        if let Some(limit) = config.shrink_timeout {
            if self.started.elapsed() >= limit {
                warn!("Shrinking stopped after {:?} (shrink_timeout)", limit);
                return false;
            }
        }
        true
    }

    fn adopt(&mut self, candidate: Shrinkable<T>, error: PropertyError) {
        trace!("Adopted {:?}: {}", candidate.value(), error);
        self.current = candidate;
        self.error = error;
        self.num_shrinks += 1;
    }
}

fn shrink_failure<P: Property>(
    property: &P,
    failing: Shrinkable<P::Value>,
    error: PropertyError,
    config: &RunConfig,
) -> Search<P::Value> {
    let mut search = Search::new(failing, error);
    let mut candidates = search.current.shrink();

    while let Some(candidate) = candidates.next() {
        if !search.within_budget(config) {
            return search;
        }
        search.attempts += 1;

        match Verdict::from(property.run(candidate.value().clone())) {
            Verdict::Fail(error) => {
                candidates = candidate.shrink();
                search.adopt(candidate, error);
            }
            Verdict::Pass | Verdict::Skip => trace!("Discarded {:?}", candidate.value()),
        }
    }

    search.completed = true;
    search
}

async fn evaluate_async<P: AsyncProperty>(
    property: &P,
    value: P::Value,
    run: usize,
    timeout: Option<Duration>,
) -> Verdict {
    let Some(limit) = timeout else {
        return property.run(value).await.into();
    };

    let started = Instant::now();
    let evaluation = pin!(property.run(value));
    match select(evaluation, Delay::new(limit)).await {
        Either::Left((outcome, _)) => outcome.into(),
        Either::Right(((), _)) => {
            let elapsed = started.elapsed();
            debug!("Run {} timed out after {:?}", run, elapsed);
            Verdict::Fail(PropertyError::Timeout {
                run,
                elapsed,
                limit,
            })
        }
    }
}

async fn shrink_failure_async<P: AsyncProperty>(
    property: &P,
    failing: Shrinkable<P::Value>,
    error: PropertyError,
    run: usize,
    config: &RunConfig,
) -> Search<P::Value> {
    let mut search = Search::new(failing, error);
    let mut candidates = search.current.shrink();

    while let Some(candidate) = candidates.next() {
        if !search.within_budget(config) {
            return search;
        }
        search.attempts += 1;

        let value = candidate.value().clone();
        match evaluate_async(property, value, run, config.timeout).await {
            Verdict::Fail(error) => {
                candidates = candidate.shrink();
                search.adopt(candidate, error);
            }
            Verdict::Pass | Verdict::Skip => trace!("Discarded {:?}", candidate.value()),
        }
    }

    search.completed = true;
    search
}

/// Run a property and report the outcome without panicking
pub fn check<P: Property>(property: &P, config: &RunConfig) -> RunReport<P::Value> {
    let mut session = Session::begin(config);
    if let Some(report) = session.rejected() {
        return report;
    }

    for run in 1..=config.num_runs {
        let mut skips = 0;
        loop {
            let generated = property.generate(&mut session.rng);
            let input = match session.draw(generated, run) {
                Ok(input) => input,
                Err(error) => return session.abort(run, error),
            };

            match Verdict::from(property.run(input.value().clone())) {
                Verdict::Pass => break,
                Verdict::Skip => {
                    if let Some(report) = session.skip(run, &mut skips, input.value()) {
                        return report;
                    }
                }
                Verdict::Fail(error) => {
                    debug!("Run {} failed on {:?}: {}", run, input.value(), error);
                    let search = shrink_failure(property, input, error, config);
                    return session.failed(run, search);
                }
            }
        }
    }

    session.passed()
}

/// Run a property and panic with a detailed report if it fails
#[track_caller]
pub fn assert_property<P: Property>(property: &P, config: &RunConfig) {
    let report = check(property, config);
    if !report.is_success() {
        panic!("{}", report.detailed_report());
    }
}

/// Run an async property, awaiting each run before starting the next
pub async fn check_async<P: AsyncProperty>(property: &P, config: &RunConfig) -> RunReport<P::Value> {
    let mut session = Session::begin(config);
    if let Some(report) = session.rejected() {
        return report;
    }

    for run in 1..=config.num_runs {
        let mut skips = 0;
        loop {
            let generated = property.generate(&mut session.rng);
            let input = match session.draw(generated, run) {
                Ok(input) => input,
                Err(error) => return session.abort(run, error),
            };

            let value = input.value().clone();
            match evaluate_async(property, value, run, config.timeout).await {
                Verdict::Pass => break,
                Verdict::Skip => {
                    if let Some(report) = session.skip(run, &mut skips, input.value()) {
                        return report;
                    }
                }
                Verdict::Fail(error) => {
                    debug!("Run {} failed on {:?}: {}", run, input.value(), error);
                    let search = shrink_failure_async(property, input, error, run, config).await;
                    return session.failed(run, search);
                }
            }
        }
    }

    session.passed()
}

/// Async counterpart of [`assert_property`]
pub async fn assert_property_async<P: AsyncProperty>(property: &P, config: &RunConfig) {
    let report = check_async(property, config).await;
    if !report.is_success() {
        panic!("{}", report.detailed_report());
    }
}

/// Fluent builder over [`RunConfig`]
///
/// ```rust
/// use std::time::Duration;
/// use falsify::{Runner, integer, property};
///
/// let report = Runner::new()
///     .num_runs(50)
///     .seed(7)
///     .shrink_timeout(Duration::from_secs(1))
///     .check(&property(integer(0u32, 10), |x| x <= 10));
///
/// assert!(report.is_success());
/// assert_eq!(report.seed, 7);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: RunConfig,
}

impl Runner {
    /// Create a runner with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner from an existing configuration
    pub fn with_config(config: RunConfig) -> Self {
        Self { config }
    }

    /// Set the number of runs
    pub fn num_runs(mut self, num_runs: usize) -> Self {
        self.config.num_runs = num_runs;
        self
    }

    /// Set the seed, making the session reproducible
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Set the per-evaluation budget for async predicates
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set the maximum number of shrink candidates evaluated
    pub fn max_shrinks(mut self, max_shrinks: usize) -> Self {
        self.config.max_shrinks = max_shrinks;
        self
    }

    /// Set the wall-clock budget for shrinking
    pub fn shrink_timeout(mut self, timeout: Duration) -> Self {
        self.config.shrink_timeout = Some(timeout);
        self
    }

    /// Let shrinking run until `max_shrinks` alone stops it
    pub fn without_shrink_timeout(mut self) -> Self {
        self.config.shrink_timeout = None;
        self
    }

    /// Set how many skipped inputs a single run tolerates
    pub fn skip_retry_limit(mut self, limit: usize) -> Self {
        self.config.skip_retry_limit = limit;
        self
    }

    /// The configuration sessions started from this runner use
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run a property with this configuration, see [`check`]
    pub fn check<P: Property>(&self, property: &P) -> RunReport<P::Value> {
        check(property, &self.config)
    }

    /// Panic with a detailed report if the property fails
    #[track_caller]
    pub fn assert<P: Property>(&self, property: &P) {
        assert_property(property, &self.config)
    }

    /// Run an async property with this configuration, see [`check_async`]
    pub async fn check_async<P: AsyncProperty>(&self, property: &P) -> RunReport<P::Value> {
        check_async(property, &self.config).await
    }

    /// Async counterpart of [`Runner::assert`]
    pub async fn assert_async<P: AsyncProperty>(&self, property: &P) {
        assert_property_async(property, &self.config).await
    }
}
