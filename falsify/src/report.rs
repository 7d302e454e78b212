//! Session reports and their plain-text rendering.

use std::fmt;
use std::time::Duration;

use crate::error::PropertyError;

/// Final verdict of a property session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Passed,
    Failed,
}

/// Everything known about a finished property session
///
/// Run indices are 1-based: `failed_run == Some(37)` means the 37th run
/// failed, so replaying with the same seed and at least 37 runs reproduces it.
#[derive(Debug, Clone)]
pub struct RunReport<T> {
    /// Whether the session passed or failed
    pub outcome: RunOutcome,
    /// Seed the session was started from
    pub seed: u64,
    /// Runs started, including a failing or aborted one
    pub num_runs: usize,
    /// Inputs discarded by the predicate across all runs
    pub num_skips: usize,
    /// Failing candidates adopted during shrinking
    pub num_shrinks: usize,
    /// Candidates evaluated during shrinking
    pub shrink_attempts: usize,
    /// Whether shrinking ran until no candidate failed
    pub shrink_completed: bool,
    /// Run that failed or aborted the session
    pub failed_run: Option<usize>,
    /// Failing input before shrinking
    pub original: Option<T>,
    /// Smallest failing input found
    pub counterexample: Option<T>,
    /// Why the counterexample fails, or why the session aborted
    pub error: Option<PropertyError>,
    /// Wall-clock time of the whole session, shrinking included
    pub duration: Duration,
}

impl<T> RunReport<T> {
    pub(crate) fn passed(seed: u64, num_runs: usize, num_skips: usize, duration: Duration) -> Self {
        Self {
            outcome: RunOutcome::Passed,
            seed,
            num_runs,
            num_skips,
            num_shrinks: 0,
            shrink_attempts: 0,
            shrink_completed: true,
            failed_run: None,
            original: None,
            counterexample: None,
            error: None,
            duration,
        }
    }

    /// A session stopped before any counterexample was found
    pub(crate) fn aborted(
        seed: u64,
        num_runs: usize,
        num_skips: usize,
        error: PropertyError,
        duration: Duration,
    ) -> Self {
        Self {
            outcome: RunOutcome::Failed,
            seed,
            num_runs,
            num_skips,
            num_shrinks: 0,
            shrink_attempts: 0,
            shrink_completed: false,
            failed_run: if num_runs > 0 { Some(num_runs) } else { None },
            original: None,
            counterexample: None,
            error: Some(error),
            duration,
        }
    }

    /// Whether every run passed
    pub fn is_success(&self) -> bool {
        self.outcome == RunOutcome::Passed
    }

    /// Display text of the error that ended the session, if any
    pub fn failure_reason(&self) -> Option<String> {
        self.error.as_ref().map(|error| error.to_string())
    }

    /// Concise one-line summary
    pub fn summary(&self) -> String
    where
        T: fmt::Debug,
    {
        match (&self.outcome, &self.counterexample, &self.original) {
            (RunOutcome::Passed, _, _) => format!(
                "Property passed {} runs ({} skipped, seed {})",
                self.num_runs, self.num_skips, self.seed
            ),
            (RunOutcome::Failed, Some(shrunk), Some(original)) if self.num_shrinks > 0 => format!(
                "Property failed with input {:?} (shrunk from {:?}) on run {}",
                shrunk,
                original,
                self.failed_run.unwrap_or(self.num_runs)
            ),
            (RunOutcome::Failed, Some(shrunk), _) => format!(
                "Property failed with input {:?} on run {}",
                shrunk,
                self.failed_run.unwrap_or(self.num_runs)
            ),
            (RunOutcome::Failed, None, _) => format!(
                "Property aborted on run {}: {}",
                self.num_runs,
                self.failure_reason().unwrap_or_default()
            ),
        }
    }

    /// Multi-line report, as printed when an assertion fails
    pub fn detailed_report(&self) -> String
    where
        T: fmt::Debug,
    {
        let mut report = String::new();

        match self.outcome {
            RunOutcome::Passed => {
                report.push_str(&format!("Property passed after {} runs\n", self.num_runs));
            }
            RunOutcome::Failed => {
                report.push_str(&format!(
                    "Property failed after {} runs (seed: {})\n",
                    self.num_runs, self.seed
                ));
                if let Some(run) = self.failed_run {
                    report.push_str(&format!("Failing run: {}\n", run));
                }
                if let Some(reason) = self.failure_reason() {
                    report.push_str(&format!("Error: {}\n", reason));
                }
            }
        }

        if let Some(ref counterexample) = self.counterexample {
            report.push_str(&format!("Counterexample: {:?}\n", counterexample));
            if let Some(ref original) = self.original {
                report.push_str(&format!("Original input: {:?}\n", original));
            }
            report.push_str(&format!(
                "Shrinks: {} adopted out of {} candidates{}\n",
                self.num_shrinks,
                self.shrink_attempts,
                if self.shrink_completed {
                    ""
                } else {
                    " (stopped early)"
                }
            ));
        }

        if self.num_skips > 0 {
            report.push_str(&format!("Skipped inputs: {}\n", self.num_skips));
        }
        report.push_str(&format!("Total time: {:?}\n", self.duration));
        if self.outcome == RunOutcome::Failed {
            report.push_str(&format!(
                "Replay with: RunConfig::with_seed({})\n",
                self.seed
            ));
        }

        report
    }
}

impl<T: fmt::Debug> fmt::Display for RunReport<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}
