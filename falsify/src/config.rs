//! Configuration types for controlling sessions and generator bounds.

use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};
use std::time::Duration;

use thiserror::Error;

/// Default number of runs per session
pub const DEFAULT_NUM_RUNS: usize = 100;
/// Default cap on shrink candidates evaluated per failure
pub const DEFAULT_MAX_SHRINKS: usize = 1000;
/// Default cap on skipped inputs per run
pub const DEFAULT_SKIP_RETRY_LIMIT: usize = 100;
/// Default wall-clock budget for shrinking
pub const DEFAULT_SHRINK_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum length used when only a minimum (or nothing) is given is `2 * min + this`
pub const DEFAULT_EXTRA_LENGTH: usize = 10;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Invalid number of runs (must be > 0)
    #[error("Invalid run count: {0} (must be > 0)")]
    InvalidRuns(usize),
    /// Invalid timeout (must be > 0)
    #[error("Invalid timeout: {0:?} (must be > 0)")]
    InvalidTimeout(Duration),
    /// A size range whose minimum exceeds its maximum
    #[error("Invalid size range: min {min} > max {max}")]
    InvalidSizeRange { min: usize, max: usize },
    /// Value bounds whose minimum exceeds its maximum
    #[error("Invalid bounds: min {min} > max {max}")]
    InvalidBounds { min: String, max: String },
    /// A pick-one arbitrary with nothing to pick from
    #[error("Cannot pick from an empty pool of values")]
    EmptyPool,
    /// A tuple arbitrary with no components
    #[error("A tuple needs at least one component")]
    EmptyTuple,
}

/// Configuration for a property session
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Number of runs to perform
    pub num_runs: usize,
    /// Seed to replay a previous session; a fresh one is drawn when absent
    pub seed: Option<u64>,
    /// Budget for each evaluation of an async predicate
    pub timeout: Option<Duration>,
    /// Maximum number of shrink candidates evaluated after a failure
    pub max_shrinks: usize,
    /// Wall-clock budget for the whole shrink search
    pub shrink_timeout: Option<Duration>,
    /// Maximum number of skipped inputs tolerated for a single run
    pub skip_retry_limit: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            num_runs: DEFAULT_NUM_RUNS,
            seed: None,
            timeout: None,
            max_shrinks: DEFAULT_MAX_SHRINKS,
            shrink_timeout: Some(DEFAULT_SHRINK_TIMEOUT),
            skip_retry_limit: DEFAULT_SKIP_RETRY_LIMIT,
        }
    }
}

impl RunConfig {
    /// Configuration replaying the session identified by `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Configuration running `num_runs` runs with default budgets
    pub fn with_runs(num_runs: usize) -> Self {
        Self {
            num_runs,
            ..Self::default()
        }
    }

    /// Validate the configuration
    ///
    /// `max_shrinks` and `skip_retry_limit` may be zero: the former disables
    /// shrinking, the latter makes any skip fatal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_runs == 0 {
            return Err(ConfigError::InvalidRuns(self.num_runs));
        }
        if let Some(timeout) = self.timeout {
            if timeout.is_zero() {
                return Err(ConfigError::InvalidTimeout(timeout));
            }
        }
        if let Some(timeout) = self.shrink_timeout {
            if timeout.is_zero() {
                return Err(ConfigError::InvalidTimeout(timeout));
            }
        }
        Ok(())
    }
}

/// One side of a size range, possibly left for the library to choose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bound {
    /// Let the library pick a default
    #[default]
    Unspecified,
    /// Use exactly this value
    Value(usize),
}

impl Bound {
    fn or(self, default: usize) -> usize {
        match self {
            Bound::Unspecified => default,
            Bound::Value(value) => value,
        }
    }
}

impl From<usize> for Bound {
    fn from(value: usize) -> Self {
        Bound::Value(value)
    }
}

impl From<Option<usize>> for Bound {
    fn from(value: Option<usize>) -> Self {
        value.map_or(Bound::Unspecified, Bound::Value)
    }
}

/// Length constraints for collection-like arbitraries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeRange {
    /// Fewest elements allowed, 0 when unspecified
    pub min: Bound,
    /// Most elements allowed, derived from `min` when unspecified
    pub max: Bound,
}

impl SizeRange {
    /// Create a size range from two possibly unspecified bounds
    pub fn new(min: impl Into<Bound>, max: impl Into<Bound>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// No constraint on either side
    pub fn any() -> Self {
        Self::default()
    }

    /// At least `min` elements
    pub fn at_least(min: usize) -> Self {
        Self::new(min, Bound::Unspecified)
    }

    /// At most `max` elements
    pub fn at_most(max: usize) -> Self {
        Self::new(Bound::Unspecified, max)
    }

    /// Between `min` and `max` elements, inclusive
    pub fn between(min: usize, max: usize) -> Self {
        Self::new(min, max)
    }

    /// Exactly `len` elements
    pub fn exactly(len: usize) -> Self {
        Self::new(len, len)
    }

    /// Turn the range into concrete inclusive bounds
    ///
    /// An unspecified minimum is 0 and an unspecified maximum is
    /// `2 * min + 10`, so `at_least(n)` always leaves room above `n`.
    pub fn resolve(&self) -> Result<(usize, usize), ConfigError> {
        let min = self.min.or(0);
        let max = self
            .max
            .or(min.saturating_mul(2).saturating_add(DEFAULT_EXTRA_LENGTH));
        if min > max {
            return Err(ConfigError::InvalidSizeRange { min, max });
        }
        Ok((min, max))
    }
}

impl From<usize> for SizeRange {
    fn from(len: usize) -> Self {
        Self::exactly(len)
    }
}

impl From<RangeFull> for SizeRange {
    fn from(_: RangeFull) -> Self {
        Self::any()
    }
}

impl From<RangeInclusive<usize>> for SizeRange {
    fn from(range: RangeInclusive<usize>) -> Self {
        Self::between(*range.start(), *range.end())
    }
}

/// `start..end` allows `start` to `end - 1` elements
///
/// An empty range such as `3..3` resolves to an error. The one exception is
/// `0..0`: no length is below zero, so it is read as "exactly zero elements",
/// the same as `..0`.
impl From<Range<usize>> for SizeRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end.checked_sub(1).unwrap_or_default())
    }
}

impl From<RangeFrom<usize>> for SizeRange {
    fn from(range: RangeFrom<usize>) -> Self {
        Self::at_least(range.start)
    }
}

/// `..end` allows up to `end - 1` elements; `..0` allows only zero
impl From<RangeTo<usize>> for SizeRange {
    fn from(range: RangeTo<usize>) -> Self {
        Self::at_most(range.end.saturating_sub(1))
    }
}

impl From<RangeToInclusive<usize>> for SizeRange {
    fn from(range: RangeToInclusive<usize>) -> Self {
        Self::at_most(range.end)
    }
}
