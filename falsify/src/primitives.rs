//! Leaf arbitraries for integers, booleans, characters, constants and sequences.

use std::fmt;
use std::rc::Rc;

use num_traits::PrimInt;
use rand::distributions::uniform::SampleUniform;

use crate::arbitrary::{Arbitrary, Generated, Map};
use crate::config::{ConfigError, SizeRange};
use crate::rng::Random;
use crate::shrink::{Shrinkable, defer};
use crate::tuple::one_at_a_time;

/// Candidates between `target` and `value`, most aggressive first
///
/// Yields `target`, then halves the remaining gap each step until the
/// candidate is one unit away from `value`. `value` itself is never yielded.
pub fn shrink_integer<N>(value: N, target: N) -> impl Iterator<Item = N>
where
    N: PrimInt,
{
    let two = N::one() + N::one();
    // Signed gaps may be negative; halving truncates toward zero either way.
    // An unsigned value below its target has nothing to shrink to.
    let mut gap = value.checked_sub(&target).unwrap_or_else(N::zero);
    std::iter::from_fn(move || {
        if gap == N::zero() {
            return None;
        }
        let candidate = value - gap;
        gap = gap / two;
        Some(candidate)
    })
}

/// The in-range value closest to zero
fn shrink_target<N: PrimInt>(min: N, max: N) -> N {
    if min > N::zero() {
        min
    } else if max < N::zero() {
        max
    } else {
        N::zero()
    }
}

/// Integers in an inclusive range, shrinking toward the value closest to zero
#[derive(Debug, Clone, Copy)]
pub struct IntegerArbitrary<N> {
    min: N,
    max: N,
}

impl<N> Arbitrary for IntegerArbitrary<N>
where
    N: PrimInt + SampleUniform + fmt::Display + 'static,
{
    type Value = N;

    fn generate(&self, rng: &mut Random) -> Generated<N> {
        if self.min > self.max {
            return Err(ConfigError::InvalidBounds {
                min: self.min.to_string(),
                max: self.max.to_string(),
            }
            .into());
        }
        let value = rng.gen_in(self.min, self.max);
        let target = shrink_target(self.min, self.max);
        Ok(Shrinkable::unfold(
            value,
            Rc::new(move |current: &N| {
                Box::new(shrink_integer(*current, target)) as Box<dyn Iterator<Item = N>>
            }),
        ))
    }
}

/// Integers in `[min, max]`
pub fn integer<N>(min: N, max: N) -> IntegerArbitrary<N>
where
    N: PrimInt + SampleUniform,
{
    IntegerArbitrary { min, max }
}

/// Natural numbers in `[0, max]`
pub fn nat<N>(max: N) -> IntegerArbitrary<N>
where
    N: PrimInt + SampleUniform,
{
    integer(N::zero(), max)
}

/// Booleans, with `true` shrinking to `false`
pub fn boolean() -> Map<IntegerArbitrary<u8>, bool> {
    integer(0u8, 1).map(|bit| bit == 1)
}

/// An arbitrary that always produces the same value
#[derive(Debug, Clone)]
pub struct Constant<T> {
    value: T,
}

impl<T: Clone + 'static> Arbitrary for Constant<T> {
    type Value = T;

    fn generate(&self, _rng: &mut Random) -> Generated<T> {
        Ok(Shrinkable::leaf(self.value.clone()))
    }
}

/// Always produce `value`
pub fn constant<T: Clone>(value: T) -> Constant<T> {
    Constant { value }
}

/// An arbitrary picking one of a fixed pool of values
#[derive(Debug, Clone)]
pub struct ConstantFrom<T> {
    values: Rc<[T]>,
}

impl<T: Clone + 'static> Arbitrary for ConstantFrom<T> {
    type Value = T;

    fn generate(&self, rng: &mut Random) -> Generated<T> {
        if self.values.is_empty() {
            return Err(ConfigError::EmptyPool.into());
        }
        let index = rng.gen_in(0, self.values.len() - 1);
        let values = self.values.clone();
        let indices = Shrinkable::unfold(
            index,
            Rc::new(|current: &usize| {
                Box::new(shrink_integer(*current, 0)) as Box<dyn Iterator<Item = usize>>
            }),
        );
        Ok(indices.map(move |index| values[index].clone()))
    }
}

/// Pick one of `values`, shrinking toward the earlier entries
///
/// An empty pool fails at generation time.
pub fn constant_from<T, I>(values: I) -> ConstantFrom<T>
where
    I: IntoIterator<Item = T>,
{
    ConstantFrom {
        values: values.into_iter().collect(),
    }
}

const SURROGATE_START: u32 = 0xD800;
const SURROGATE_LEN: u32 = 0x800;

fn char_to_index(c: char) -> u32 {
    let code = c as u32;
    if code >= SURROGATE_START {
        code - SURROGATE_LEN
    } else {
        code
    }
}

fn index_to_char(index: u32, fallback: char) -> char {
    let code = if index >= SURROGATE_START {
        index + SURROGATE_LEN
    } else {
        index
    };
    char::from_u32(code).unwrap_or(fallback)
}

/// Characters in an inclusive range, shrinking toward its start
#[derive(Debug, Clone, Copy)]
pub struct CharArbitrary {
    start: char,
    end: char,
}

impl Arbitrary for CharArbitrary {
    type Value = char;

    fn generate(&self, rng: &mut Random) -> Generated<char> {
        if self.start > self.end {
            return Err(ConfigError::InvalidBounds {
                min: format!("{:?}", self.start),
                max: format!("{:?}", self.end),
            }
            .into());
        }
        let start = self.start;
        let low = char_to_index(start);
        let index = rng.gen_in(low, char_to_index(self.end));
        let indices = Shrinkable::unfold(
            index,
            Rc::new(move |current: &u32| {
                Box::new(shrink_integer(*current, low)) as Box<dyn Iterator<Item = u32>>
            }),
        );
        Ok(indices.map(move |index| index_to_char(index, start)))
    }
}

/// Any `char` in `[start, end]`; surrogate code points are never produced
pub fn char_range(start: char, end: char) -> CharArbitrary {
    CharArbitrary { start, end }
}

/// Printable ASCII, space through tilde
pub fn printable_char() -> CharArbitrary {
    char_range(' ', '~')
}

/// Vectors of elements drawn from one arbitrary
#[derive(Debug, Clone)]
pub struct VecArbitrary<A> {
    element: A,
    size: SizeRange,
}

impl<A> Arbitrary for VecArbitrary<A>
where
    A: Arbitrary,
    A::Value: Clone,
{
    type Value = Vec<A::Value>;

    fn generate(&self, rng: &mut Random) -> Generated<Self::Value> {
        let (min, max) = self.size.resolve()?;
        let len = rng.gen_in(min, max);
        let items = (0..len)
            .map(|_| self.element.generate(rng))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(vec_shrinkable(Rc::new(items), min))
    }
}

/// Shorter vectors first (dropping from the front, never below `min_len`),
/// then one element shrunk at a time.
fn vec_shrinkable<T>(items: Rc<Vec<Shrinkable<T>>>, min_len: usize) -> Shrinkable<Vec<T>>
where
    T: Clone + 'static,
{
    let value = items.iter().map(|item| item.value().clone()).collect();
    Shrinkable::new(value, move || {
        let len = items.len();
        let tails = items.clone();
        let shorter = defer(move || {
            shrink_integer(len, min_len).map(move |keep| {
                let tail = tails[len - keep..].to_vec();
                vec_shrinkable(Rc::new(tail), min_len)
            })
        });
        let elementwise = one_at_a_time(items.clone())
            .map(move |next| vec_shrinkable(Rc::new(next), min_len));
        Box::new(shorter.chain(elementwise))
    })
}

/// Vectors with a length in `size`, elements drawn in order from `element`
pub fn vec_of<A>(element: A, size: impl Into<SizeRange>) -> VecArbitrary<A>
where
    A: Arbitrary,
{
    VecArbitrary {
        element,
        size: size.into(),
    }
}

/// Strings of characters drawn from `chars`, with a length (in chars) in `size`
pub fn string_of<A>(chars: A, size: impl Into<SizeRange>) -> Map<VecArbitrary<A>, String>
where
    A: Arbitrary<Value = char>,
{
    vec_of(chars, size).map(|chars| chars.into_iter().collect())
}
