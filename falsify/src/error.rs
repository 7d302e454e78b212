//! Error types for generation and property sessions.

use std::time::Duration;

use thiserror::Error;

use crate::config::ConfigError;

/// Failure to produce a value from an arbitrary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// A filter rejected every candidate within its retry cap
    #[error("Generation exhausted: filter rejected {attempts} consecutive candidates")]
    Exhausted { attempts: usize },

    /// The arbitrary was built with bounds it cannot satisfy
    #[error("Invalid arbitrary: {0}")]
    Config(#[from] ConfigError),
}

impl GenerationError {
    /// Create an exhaustion error for the given number of attempts
    pub fn exhausted(attempts: usize) -> Self {
        Self::Exhausted { attempts }
    }
}

/// Why a property session did not pass
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyError {
    /// The predicate returned a failing outcome or panicked
    #[error("Property failed: {message}")]
    PredicateFailed { message: String },

    /// An async predicate took longer than the configured budget
    #[error("Property timeout: run {run} took {elapsed:?} (limit {limit:?})")]
    Timeout {
        run: usize,
        elapsed: Duration,
        limit: Duration,
    },

    /// No input could be generated for a run
    #[error("{source} (run {run})")]
    GenerationExhausted {
        run: usize,
        #[source]
        source: GenerationError,
    },

    /// The predicate skipped too many inputs for a single run
    #[error(
        "Could not generate enough valid inputs: run {run} skipped {skips} times without a verdict"
    )]
    SkipLimitReached { run: usize, skips: usize },

    /// The session configuration was rejected before any run started
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl PropertyError {
    /// Create a predicate failure with the given message
    pub fn predicate_failed(message: impl Into<String>) -> Self {
        Self::PredicateFailed {
            message: message.into(),
        }
    }

    /// Whether this error came out of the predicate (and so was shrunk)
    ///
    /// Everything else aborts the session before shrinking can start.
    pub fn is_counterexample(&self) -> bool {
        matches!(self, Self::PredicateFailed { .. } | Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_generation_error_display() {
        let error = GenerationError::exhausted(1000);
        assert_eq!(
            error.to_string(),
            "Generation exhausted: filter rejected 1000 consecutive candidates"
        );
    }

    #[test]
    fn test_property_error_display() {
        let error = PropertyError::predicate_failed("predicate returned false");
        assert_eq!(error.to_string(), "Property failed: predicate returned false");

        let error = PropertyError::SkipLimitReached { run: 3, skips: 100 };
        assert!(error.to_string().starts_with("Could not generate enough valid inputs"));
    }

    #[test]
    fn test_generation_exhausted_keeps_source() {
        let error = PropertyError::GenerationExhausted {
            run: 4,
            source: GenerationError::exhausted(10),
        };

        assert!(error.to_string().ends_with("(run 4)"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_is_counterexample() {
        assert!(PropertyError::predicate_failed("x").is_counterexample());
        assert!(
            PropertyError::Timeout {
                run: 0,
                elapsed: Duration::from_millis(20),
                limit: Duration::from_millis(10),
            }
            .is_counterexample()
        );
        assert!(!PropertyError::SkipLimitReached { run: 0, skips: 1 }.is_counterexample());
        assert!(!PropertyError::Config(ConfigError::InvalidRuns(0)).is_counterexample());
    }
}
