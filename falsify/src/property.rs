//! Properties: an arbitrary bound to a predicate, synchronous or asynchronous.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::arbitrary::{Arbitrary, Generated};
use crate::rng::Random;

/// Message used when a predicate returns `false`
pub const FALSE_MESSAGE: &str = "predicate returned false";

/// Verdict of one predicate evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The property holds for this input
    Pass,
    /// The property does not hold; the message explains why
    Fail(String),
    /// The input is out of scope and should be discarded
    Skip,
}

impl Outcome {
    /// A failing outcome with the given message
    pub fn fail(message: impl Into<String>) -> Self {
        Outcome::Fail(message.into())
    }

    /// Whether this outcome is a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Fail(_))
    }
}

/// Discard the current input unless `condition` holds
///
/// ```rust
/// use falsify::{Outcome, pre};
///
/// fn divides(a: u32, b: u32) -> Outcome {
///     if b == 0 {
///         return pre(false);
///     }
///     (a % b < b).into()
/// }
///
/// assert_eq!(divides(3, 0), Outcome::Skip);
/// assert_eq!(divides(3, 2), Outcome::Pass);
/// ```
pub fn pre(condition: bool) -> Outcome {
    if condition {
        Outcome::Pass
    } else {
        Outcome::Skip
    }
}

impl From<bool> for Outcome {
    fn from(holds: bool) -> Self {
        if holds {
            Outcome::Pass
        } else {
            Outcome::fail(FALSE_MESSAGE)
        }
    }
}

/// Something a predicate can return
pub trait IntoOutcome {
    /// Convert into a verdict
    fn into_outcome(self) -> Outcome;
}

impl IntoOutcome for Outcome {
    fn into_outcome(self) -> Outcome {
        self
    }
}

impl IntoOutcome for bool {
    fn into_outcome(self) -> Outcome {
        self.into()
    }
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Outcome {
        Outcome::Pass
    }
}

impl<O: IntoOutcome, E: fmt::Display> IntoOutcome for Result<O, E> {
    fn into_outcome(self) -> Outcome {
        match self {
            Ok(outcome) => outcome.into_outcome(),
            Err(error) => Outcome::fail(error.to_string()),
        }
    }
}

/// A property checked synchronously
pub trait Property {
    /// Input type of the predicate
    type Value: Clone + fmt::Debug + 'static;

    /// Draw an input from the property's arbitrary
    fn generate(&self, rng: &mut Random) -> Generated<Self::Value>;

    /// Evaluate the predicate on `value`
    fn run(&self, value: Self::Value) -> Outcome;
}

/// A property whose predicate completes asynchronously
pub trait AsyncProperty {
    /// Input type of the predicate
    type Value: Clone + fmt::Debug + 'static;

    /// Draw an input from the property's arbitrary
    fn generate(&self, rng: &mut Random) -> Generated<Self::Value>;

    /// Evaluate the predicate on `value`
    fn run(&self, value: Self::Value) -> impl Future<Output = Outcome>;
}

/// A property built from an arbitrary and a closure
pub struct FnProperty<A, F> {
    arbitrary: A,
    predicate: F,
}

impl<A, F, R> Property for FnProperty<A, F>
where
    A: Arbitrary,
    A::Value: Clone + fmt::Debug,
    F: Fn(A::Value) -> R,
    R: IntoOutcome,
{
    type Value = A::Value;

    fn generate(&self, rng: &mut Random) -> Generated<Self::Value> {
        self.arbitrary.generate(rng)
    }

    fn run(&self, value: Self::Value) -> Outcome {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.predicate)(value))) {
            Ok(result) => result.into_outcome(),
            Err(payload) => Outcome::Fail(panic_message(payload.as_ref())),
        }
    }
}

/// Bind `predicate` to the values of `arbitrary`
///
/// Tuples of arbitraries are arbitraries, so several inputs are passed as
/// one tuple:
///
/// ```rust
/// use falsify::{Outcome, Property, Random, integer, property};
///
/// let commutative = property((integer(0u32, 1000), integer(0u32, 1000)), |(a, b)| a + b == b + a);
///
/// let mut rng = Random::from_seed(1);
/// let input = commutative.generate(&mut rng).unwrap().into_value();
/// assert_eq!(commutative.run(input), Outcome::Pass);
/// ```
pub fn property<A, F, R>(arbitrary: A, predicate: F) -> FnProperty<A, F>
where
    A: Arbitrary,
    F: Fn(A::Value) -> R,
    R: IntoOutcome,
{
    FnProperty {
        arbitrary,
        predicate,
    }
}

/// An async property built from an arbitrary and a closure returning a future
pub struct AsyncFnProperty<A, F> {
    arbitrary: A,
    predicate: F,
}

impl<A, F, Fut, R> AsyncProperty for AsyncFnProperty<A, F>
where
    A: Arbitrary,
    A::Value: Clone + fmt::Debug,
    F: Fn(A::Value) -> Fut,
    Fut: Future<Output = R>,
    R: IntoOutcome,
{
    type Value = A::Value;

    fn generate(&self, rng: &mut Random) -> Generated<Self::Value> {
        self.arbitrary.generate(rng)
    }

    fn run(&self, value: Self::Value) -> impl Future<Output = Outcome> {
        let started = panic::catch_unwind(AssertUnwindSafe(|| (self.predicate)(value)));
        async move {
            let future = match started {
                Ok(future) => future,
                Err(payload) => return Outcome::Fail(panic_message(payload.as_ref())),
            };
            let guarded = CatchUnwind {
                inner: Box::pin(future),
            };
            match guarded.await {
                Ok(result) => result.into_outcome(),
                Err(message) => Outcome::Fail(message),
            }
        }
    }
}

/// Bind an async `predicate` to the values of `arbitrary`
pub fn async_property<A, F, Fut, R>(arbitrary: A, predicate: F) -> AsyncFnProperty<A, F>
where
    A: Arbitrary,
    F: Fn(A::Value) -> Fut,
    Fut: Future<Output = R>,
    R: IntoOutcome,
{
    AsyncFnProperty {
        arbitrary,
        predicate,
    }
}

/// Turns a panic while polling into an error carrying the panic message
struct CatchUnwind<F> {
    inner: Pin<Box<F>>,
}

impl<F: Future> Future for CatchUnwind<F> {
    type Output = Result<F::Output, String>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let inner = &mut self.inner;
        match panic::catch_unwind(AssertUnwindSafe(|| inner.as_mut().poll(cx))) {
            Ok(Poll::Ready(output)) => Poll::Ready(Ok(output)),
            Ok(Poll::Pending) => Poll::Pending,
            Err(payload) => Poll::Ready(Err(panic_message(payload.as_ref()))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "predicate panicked with a non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{constant, integer};

    #[test]
    fn test_bool_outcomes() {
        let prop = property(constant(3), |x| x > 2);
        assert_eq!(prop.run(3), Outcome::Pass);
        assert_eq!(prop.run(1), Outcome::fail(FALSE_MESSAGE));
    }

    #[test]
    fn test_unit_outcome_passes() {
        let prop = property(constant(0), |_| ());
        assert_eq!(prop.run(0), Outcome::Pass);
    }

    #[test]
    fn test_result_outcomes() {
        let prop = property(constant(0i32), |x| {
            if x < 0 {
                Err(format!("negative: {}", x))
            } else {
                Ok(x % 2 == 0)
            }
        });
        assert_eq!(prop.run(4), Outcome::Pass);
        assert_eq!(prop.run(3), Outcome::fail(FALSE_MESSAGE));
        assert_eq!(prop.run(-1), Outcome::fail("negative: -1"));
    }

    #[test]
    fn test_skip_via_pre() {
        let prop = property(constant(0u32), |x| {
            if x == 0 {
                return pre(false);
            }
            Outcome::Pass
        });
        assert_eq!(prop.run(0), Outcome::Skip);
        assert_eq!(prop.run(1), Outcome::Pass);
    }

    #[test]
    fn test_panic_is_captured() {
        let prop = property(constant(0), |x: i32| {
            assert!(x > 0, "x must be positive, got {}", x);
        });
        match prop.run(0) {
            Outcome::Fail(message) => assert!(message.contains("x must be positive, got 0")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_static_str_panic_is_captured() {
        let prop = property(constant(()), |_| -> bool { panic!("boom") });
        assert_eq!(prop.run(()), Outcome::fail("boom"));
    }

    #[test]
    fn test_generate_delegates_to_arbitrary() {
        let prop = property(integer(1u8, 3), |_| true);
        let mut rng = Random::from_seed(1);
        let value = *prop.generate(&mut rng).unwrap().value();
        assert!((1..=3).contains(&value));
    }

    #[test]
    fn test_runs_share_no_state() {
        let prop = property(constant(5), |x| x == 5);
        for _ in 0..3 {
            assert_eq!(prop.run(5), Outcome::Pass);
        }
    }

    #[tokio::test]
    async fn test_async_outcomes() {
        let prop = async_property(constant(2), |x: i32| async move { x % 2 == 0 });
        assert_eq!(prop.run(2).await, Outcome::Pass);
        assert_eq!(prop.run(3).await, Outcome::fail(FALSE_MESSAGE));
    }

    #[tokio::test]
    async fn test_async_panic_is_captured() {
        let prop = async_property(constant(0), |x: i32| async move {
            tokio::task::yield_now().await;
            if x == 0 {
                panic!("zero after await");
            }
            true
        });
        assert_eq!(prop.run(0).await, Outcome::fail("zero after await"));
        assert_eq!(prop.run(1).await, Outcome::Pass);
    }
}
