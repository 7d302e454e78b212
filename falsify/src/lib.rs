//! # Falsify - Property-Based Testing for Rust
//!
//! Falsify checks that a predicate holds for many randomly generated inputs.
//! Inputs come from composable [`Arbitrary`] values; when a run fails, the
//! failing input is shrunk to a smaller counterexample that still fails.
//! Every session is driven by one seed, reported on failure, so a failing
//! session can be replayed exactly.
//!
//! ## Quick Start
//!
//! ```rust
//! use falsify::{RunConfig, check, integer, property};
//!
//! let prop = property((integer(0i32, 1000), integer(0i32, 1000)), |(a, b)| a < 5 || b < 5);
//! let report = check(&prop, &RunConfig::with_seed(42));
//!
//! assert!(!report.is_success());
//! assert_eq!(report.counterexample, Some((5, 5)));
//! ```

pub mod arbitrary;
pub mod config;
pub mod error;
pub mod execution;
pub mod primitives;
pub mod property;
pub mod report;
pub mod rng;
pub mod shrink;
pub mod tuple;

// Re-export the main public API
pub use arbitrary::{
    Arbitrary, BoxedArbitrary, Chain, FILTER_MAX_ATTEMPTS, Filter, FnArbitrary, Generated, Map,
    NoShrink, from_fn,
};
pub use config::{Bound, ConfigError, RunConfig, SizeRange};
pub use error::{GenerationError, PropertyError};
pub use execution::{Runner, assert_property, assert_property_async, check, check_async};
pub use primitives::*;
pub use property::{
    AsyncFnProperty, AsyncProperty, FnProperty, IntoOutcome, Outcome, Property, async_property,
    pre, property,
};
pub use report::{RunOutcome, RunReport};
pub use rng::{Random, fresh_seed};
pub use shrink::{ShrinkFn, Shrinkable, Shrinks};
pub use tuple::{TupleArbitrary, generic_tuple};
