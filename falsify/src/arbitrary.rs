//! The `Arbitrary` trait and the combinators that compose arbitraries.

use std::fmt;
use std::rc::Rc;

use log::trace;

use crate::error::GenerationError;
use crate::rng::Random;
use crate::shrink::{ShrinkFn, Shrinkable, filter_with, map_with};

/// How many candidates a filtered arbitrary draws before giving up
pub const FILTER_MAX_ATTEMPTS: usize = 1000;

/// Result of a single generation call
pub type Generated<T> = Result<Shrinkable<T>, GenerationError>;

/// A deterministic source of shrinkable values of one shape.
///
/// Arbitraries are stateless: everything random comes from the `Random`
/// handed to [`Arbitrary::generate`], so the same source state always yields
/// the same shrinkable. Combinators wrap an arbitrary in an adapter struct
/// rather than modifying it.
pub trait Arbitrary {
    /// The type of values this arbitrary generates
    type Value: 'static;

    /// Draw a value (and its shrink tree) from `rng`
    fn generate(&self, rng: &mut Random) -> Generated<Self::Value>;

    /// Transform every generated value, shrinks included
    fn map<F, U>(self, f: F) -> Map<Self, U>
    where
        Self: Sized,
        F: Fn(Self::Value) -> U + 'static,
        U: 'static,
    {
        Map {
            arbitrary: self,
            mapper: Rc::new(f),
        }
    }

    /// Keep only values satisfying `predicate`
    ///
    /// Generation re-draws up to [`FILTER_MAX_ATTEMPTS`] times; shrink
    /// candidates that fail the predicate are skipped.
    fn filter<P>(self, predicate: P) -> Filter<Self>
    where
        Self: Sized,
        P: Fn(&Self::Value) -> bool + 'static,
    {
        Filter {
            arbitrary: self,
            predicate: Rc::new(predicate),
        }
    }

    /// Use each generated value to pick the arbitrary for a dependent value
    ///
    /// Shrinking first shrinks the dependent value with this one held, then
    /// shrinks this one and draws a new dependent value for each candidate.
    fn chain<F, B>(self, binder: F) -> Chain<Self, F>
    where
        Self: Sized,
        Self::Value: Clone,
        F: Fn(&Self::Value) -> B + 'static,
        B: Arbitrary,
        B::Value: Clone,
    {
        Chain {
            arbitrary: self,
            binder: Rc::new(binder),
        }
    }

    /// Generate the same values but never offer shrink candidates
    fn no_shrink(self) -> NoShrink<Self>
    where
        Self: Sized,
    {
        NoShrink { arbitrary: self }
    }

    /// Erase the concrete arbitrary type
    fn boxed(self) -> BoxedArbitrary<Self::Value>
    where
        Self: Sized + 'static,
    {
        BoxedArbitrary::new(self)
    }
}

impl<A: Arbitrary + ?Sized> Arbitrary for &A {
    type Value = A::Value;

    fn generate(&self, rng: &mut Random) -> Generated<Self::Value> {
        (**self).generate(rng)
    }
}

impl<A: Arbitrary + ?Sized> Arbitrary for Rc<A> {
    type Value = A::Value;

    fn generate(&self, rng: &mut Random) -> Generated<Self::Value> {
        (**self).generate(rng)
    }
}

/// An arbitrary that maps values from one type to another
pub struct Map<A: Arbitrary, U> {
    arbitrary: A,
    mapper: Rc<dyn Fn(A::Value) -> U>,
}

impl<A, U> Arbitrary for Map<A, U>
where
    A: Arbitrary,
    U: 'static,
{
    type Value = U;

    fn generate(&self, rng: &mut Random) -> Generated<U> {
        let source = self.arbitrary.generate(rng)?;
        Ok(map_with(source, self.mapper.clone()))
    }
}

/// An arbitrary that only yields values satisfying a predicate
pub struct Filter<A: Arbitrary> {
    arbitrary: A,
    predicate: Rc<dyn Fn(&A::Value) -> bool>,
}

impl<A: Arbitrary> Arbitrary for Filter<A> {
    type Value = A::Value;

    fn generate(&self, rng: &mut Random) -> Generated<Self::Value> {
        for attempt in 0..FILTER_MAX_ATTEMPTS {
            let candidate = self.arbitrary.generate(rng)?;
            if (self.predicate)(candidate.value()) {
                return Ok(filter_with(candidate, self.predicate.clone()));
            }
            trace!("filter rejected candidate {}", attempt + 1);
        }
        Err(GenerationError::exhausted(FILTER_MAX_ATTEMPTS))
    }
}

/// An arbitrary whose second draw depends on its first
pub struct Chain<A, F> {
    arbitrary: A,
    binder: Rc<F>,
}

impl<A, F, B> Arbitrary for Chain<A, F>
where
    A: Arbitrary,
    A::Value: Clone,
    F: Fn(&A::Value) -> B + 'static,
    B: Arbitrary,
    B::Value: Clone,
{
    type Value = B::Value;

    fn generate(&self, rng: &mut Random) -> Generated<B::Value> {
        let outer = self.arbitrary.generate(rng)?;
        // Dependent draws replay from here when the outer value shrinks.
        let snapshot = rng.clone();
        let inner = (self.binder)(outer.value()).generate(rng)?;
        Ok(chained(outer, inner, self.binder.clone(), snapshot))
    }
}

fn chained<T, F, B>(
    outer: Shrinkable<T>,
    inner: Shrinkable<B::Value>,
    binder: Rc<F>,
    rng: Random,
) -> Shrinkable<B::Value>
where
    T: Clone + 'static,
    F: Fn(&T) -> B + 'static,
    B: Arbitrary,
    B::Value: Clone,
{
    let value = inner.value().clone();
    Shrinkable::new(value, move || {
        let held = outer.clone();
        let inner_binder = binder.clone();
        let inner_rng = rng.clone();
        let inner_shrinks = inner.shrink().map(move |candidate| {
            chained(held.clone(), candidate, inner_binder.clone(), inner_rng.clone())
        });

        let outer_binder = binder.clone();
        let outer_rng = rng.clone();
        let outer_shrinks = outer.shrink().filter_map(move |candidate| {
            let mut replay = outer_rng.clone();
            match outer_binder(candidate.value()).generate(&mut replay) {
                Ok(regenerated) => Some(chained(
                    candidate,
                    regenerated,
                    outer_binder.clone(),
                    outer_rng.clone(),
                )),
                Err(error) => {
                    trace!("dropping chain candidate: {}", error);
                    None
                }
            }
        });

        Box::new(inner_shrinks.chain(outer_shrinks))
    })
}

/// An arbitrary whose values never shrink
pub struct NoShrink<A> {
    arbitrary: A,
}

impl<A: Arbitrary> Arbitrary for NoShrink<A> {
    type Value = A::Value;

    fn generate(&self, rng: &mut Random) -> Generated<Self::Value> {
        let generated = self.arbitrary.generate(rng)?;
        Ok(Shrinkable::leaf(generated.into_value()))
    }
}

/// A type-erased, cheaply cloneable arbitrary
pub struct BoxedArbitrary<T> {
    inner: Rc<dyn Arbitrary<Value = T>>,
}

impl<T: 'static> BoxedArbitrary<T> {
    /// Box the given arbitrary
    pub fn new<A>(arbitrary: A) -> Self
    where
        A: Arbitrary<Value = T> + 'static,
    {
        Self {
            inner: Rc::new(arbitrary),
        }
    }
}

impl<T> Clone for BoxedArbitrary<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for BoxedArbitrary<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxedArbitrary")
            .field("value", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: 'static> Arbitrary for BoxedArbitrary<T> {
    type Value = T;

    fn generate(&self, rng: &mut Random) -> Generated<T> {
        self.inner.generate(rng)
    }

    fn boxed(self) -> BoxedArbitrary<T> {
        self
    }
}

/// An arbitrary defined by a generation closure and a value-level shrink closure
pub struct FnArbitrary<T> {
    generator: Rc<dyn Fn(&mut Random) -> T>,
    shrinker: ShrinkFn<T>,
}

impl<T> Clone for FnArbitrary<T> {
    fn clone(&self) -> Self {
        Self {
            generator: self.generator.clone(),
            shrinker: self.shrinker.clone(),
        }
    }
}

impl<T: Clone + 'static> Arbitrary for FnArbitrary<T> {
    type Value = T;

    fn generate(&self, rng: &mut Random) -> Generated<T> {
        let value = (self.generator)(rng);
        Ok(Shrinkable::unfold(value, self.shrinker.clone()))
    }
}

/// Build an arbitrary from a generator and a shrink function
///
/// `shrink` returns the direct candidates of a value; the tree below them is
/// obtained by applying it again. Every candidate must be strictly smaller
/// than its parent or shrinking may not terminate.
pub fn from_fn<T, G, S, I>(generate: G, shrink: S) -> FnArbitrary<T>
where
    T: Clone + 'static,
    G: Fn(&mut Random) -> T + 'static,
    S: Fn(&T) -> I + 'static,
    I: Iterator<Item = T> + 'static,
{
    FnArbitrary {
        generator: Rc::new(generate),
        shrinker: Rc::new(move |value: &T| Box::new(shrink(value)) as Box<dyn Iterator<Item = T>>),
    }
}
