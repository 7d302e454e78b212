//! Shrink trees: a generated value paired with a lazy source of smaller candidates.

use std::fmt;
use std::rc::Rc;

/// Lazily produced sequence of shrink candidates
pub type Shrinks<T> = Box<dyn Iterator<Item = Shrinkable<T>>>;

/// Value-level shrink function, used to unfold a whole shrink tree from one value
pub type ShrinkFn<T> = Rc<dyn Fn(&T) -> Box<dyn Iterator<Item = T>>>;

/// A generated value together with the candidates it may shrink to.
///
/// The candidate sequence is produced on demand each time [`Shrinkable::shrink`]
/// is called; nothing below the root is built until somebody pulls on it. Each
/// candidate is itself a `Shrinkable`, so the runner can descend into it.
pub struct Shrinkable<T> {
    value: T,
    shrinker: Rc<dyn Fn() -> Shrinks<T>>,
}

impl<T: 'static> Shrinkable<T> {
    /// Create a shrinkable from a value and a candidate-producing function
    pub fn new<F>(value: T, shrinker: F) -> Self
    where
        F: Fn() -> Shrinks<T> + 'static,
    {
        Self {
            value,
            shrinker: Rc::new(shrinker),
        }
    }

    /// A value that is already minimal
    pub fn leaf(value: T) -> Self {
        Self::new(value, || Box::new(std::iter::empty()))
    }

    /// Build the full shrink tree of `value` by repeatedly applying `shrink_fn`
    pub fn unfold(value: T, shrink_fn: ShrinkFn<T>) -> Self
    where
        T: Clone,
    {
        let seed = value.clone();
        Self::new(value, move || {
            let shrink_fn = shrink_fn.clone();
            let candidates = shrink_fn(&seed);
            Box::new(candidates.map(move |candidate| Shrinkable::unfold(candidate, shrink_fn.clone())))
        })
    }

    /// The generated value
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consume the shrinkable, keeping only its value
    pub fn into_value(self) -> T {
        self.value
    }

    /// Start a fresh pass over the shrink candidates
    pub fn shrink(&self) -> Shrinks<T> {
        (self.shrinker)()
    }

    /// Apply `f` to the value and, lazily, to every candidate below it
    pub fn map<U, F>(self, f: F) -> Shrinkable<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        map_with(self, Rc::new(f))
    }

    /// Drop every candidate (at any depth) that does not satisfy `predicate`
    ///
    /// The root value is kept as is; callers are expected to have checked it.
    pub fn filter<P>(self, predicate: P) -> Shrinkable<T>
    where
        P: Fn(&T) -> bool + 'static,
    {
        filter_with(self, Rc::new(predicate))
    }
}

pub(crate) fn map_with<T, U>(source: Shrinkable<T>, f: Rc<dyn Fn(T) -> U>) -> Shrinkable<U>
where
    T: 'static,
    U: 'static,
{
    let Shrinkable { value, shrinker } = source;
    let mapper = f.clone();
    Shrinkable::new(f(value), move || {
        let mapper = mapper.clone();
        Box::new(shrinker().map(move |candidate| map_with(candidate, mapper.clone())))
    })
}

pub(crate) fn filter_with<T>(source: Shrinkable<T>, predicate: Rc<dyn Fn(&T) -> bool>) -> Shrinkable<T>
where
    T: 'static,
{
    let Shrinkable { value, shrinker } = source;
    Shrinkable::new(value, move || {
        let keep = predicate.clone();
        let wrap = predicate.clone();
        Box::new(
            shrinker()
                .filter(move |candidate| keep(candidate.value()))
                .map(move |candidate| filter_with(candidate, wrap.clone())),
        )
    })
}

/// Postpone building an iterator until its first element is requested
pub(crate) fn defer<I, F>(build: F) -> impl Iterator<Item = I::Item>
where
    F: FnOnce() -> I,
    I: Iterator,
{
    std::iter::once(build).flat_map(|build| build())
}

impl<T: Clone> Clone for Shrinkable<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            shrinker: self.shrinker.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Shrinkable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shrinkable")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}
