//! Tuple arbitraries: fixed-size products whose shrinks move one component at a time.
//!
//! Rust tuples of up to eight arbitraries are arbitraries themselves, and
//! [`generic_tuple`] covers a runtime-sized list of same-typed arbitraries.
//! Components are drawn in index order from the same source. A tuple's shrink
//! sequence walks component 0's candidates (others held), then component 1's,
//! and so on; every candidate is again a tuple shrinkable, so adopting one
//! starts over at component 0.

use std::rc::Rc;

use crate::arbitrary::{Arbitrary, BoxedArbitrary, Generated};
use crate::config::ConfigError;
use crate::rng::Random;
use crate::shrink::{Shrinkable, Shrinks, defer};

/// Candidates replacing exactly one component, in index order
pub(crate) fn one_at_a_time<T>(
    components: Rc<Vec<Shrinkable<T>>>,
) -> impl Iterator<Item = Vec<Shrinkable<T>>>
where
    T: Clone + 'static,
{
    (0..components.len()).flat_map(move |index| {
        let held = components.clone();
        defer(move || {
            let shrinks = held[index].shrink();
            shrinks.map(move |candidate| {
                let mut next = (*held).clone();
                next[index] = candidate;
                next
            })
        })
    })
}

macro_rules! tuple_arbitrary {
    ($shrinkable:ident; $($T:ident $idx:tt),+) => {
        fn $shrinkable<$($T),+>(parts: ($(Shrinkable<$T>,)+)) -> Shrinkable<($($T,)+)>
        where
            $($T: Clone + 'static),+
        {
            let value = ($(parts.$idx.value().clone(),)+);
            Shrinkable::new(value, move || {
                let shrinks: Shrinks<($($T,)+)> = Box::new(std::iter::empty());
                $(
                    let held = parts.clone();
                    let shrinks: Shrinks<_> = Box::new(shrinks.chain(defer(move || {
                        let component = held.$idx.shrink();
                        component.map(move |candidate| {
                            let mut next = held.clone();
                            next.$idx = candidate;
                            $shrinkable(next)
                        })
                    })));
                )+
                shrinks
            })
        }

        impl<$($T),+> Arbitrary for ($($T,)+)
        where
            $($T: Arbitrary, $T::Value: Clone),+
        {
            type Value = ($($T::Value,)+);

            fn generate(&self, rng: &mut Random) -> Generated<Self::Value> {
                let parts = ($(self.$idx.generate(rng)?,)+);
                Ok($shrinkable(parts))
            }
        }
    };
}

tuple_arbitrary!(tuple1; A 0);
tuple_arbitrary!(tuple2; A 0, B 1);
tuple_arbitrary!(tuple3; A 0, B 1, C 2);
tuple_arbitrary!(tuple4; A 0, B 1, C 2, D 3);
tuple_arbitrary!(tuple5; A 0, B 1, C 2, D 3, E 4);
tuple_arbitrary!(tuple6; A 0, B 1, C 2, D 3, E 4, F 5);
tuple_arbitrary!(tuple7; A 0, B 1, C 2, D 3, E 4, F 5, G 6);
tuple_arbitrary!(tuple8; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);

/// A fixed-length product of same-typed arbitraries, generating `Vec<T>`
#[derive(Debug, Clone)]
pub struct TupleArbitrary<T> {
    components: Vec<BoxedArbitrary<T>>,
}

impl<T: Clone + 'static> Arbitrary for TupleArbitrary<T> {
    type Value = Vec<T>;

    fn generate(&self, rng: &mut Random) -> Generated<Vec<T>> {
        if self.components.is_empty() {
            return Err(ConfigError::EmptyTuple.into());
        }
        let parts = self
            .components
            .iter()
            .map(|component| component.generate(rng))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tuple_of(Rc::new(parts)))
    }
}

fn tuple_of<T: Clone + 'static>(parts: Rc<Vec<Shrinkable<T>>>) -> Shrinkable<Vec<T>> {
    let value = parts.iter().map(|part| part.value().clone()).collect();
    Shrinkable::new(value, move || {
        Box::new(one_at_a_time(parts.clone()).map(|next| tuple_of(Rc::new(next))))
    })
}

/// Compose a list of same-typed arbitraries into one producing `Vec<T>`
///
/// The list must not be empty; an empty list fails at generation time.
pub fn generic_tuple<T: 'static>(components: Vec<BoxedArbitrary<T>>) -> TupleArbitrary<T> {
    TupleArbitrary { components }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use crate::primitives::{boolean, constant, integer};

    fn candidates<T: Clone + 'static>(shrinkable: &Shrinkable<T>) -> Vec<T> {
        shrinkable.shrink().map(|s| s.value().clone()).collect()
    }

    #[test]
    fn test_components_drawn_in_order() {
        let pair = (integer(0u64, u64::MAX), integer(0u64, u64::MAX));
        let single = integer(0u64, u64::MAX);

        let mut a = Random::from_seed(21);
        let mut b = Random::from_seed(21);

        let (left, right) = pair.generate(&mut a).unwrap().into_value();
        assert_eq!(left, single.generate(&mut b).unwrap().into_value());
        assert_eq!(right, single.generate(&mut b).unwrap().into_value());
    }

    #[test]
    fn test_shrink_changes_one_component() {
        let triple = (integer(0i32, 100), boolean(), integer(-50i32, 50));
        let mut rng = Random::from_seed(4);

        for _ in 0..20 {
            let generated = triple.generate(&mut rng).unwrap();
            let (a, b, c) = *generated.value();
            for (x, y, z) in candidates(&generated) {
                let changed = [x != a, y != b, z != c].iter().filter(|c| **c).count();
                assert_eq!(changed, 1);
            }
        }
    }

    #[test]
    fn test_shrink_enumerates_components_in_index_order() {
        let pair = (integer(0i32, 1000), integer(0i32, 1000));

        let mut seed = 0;
        let generated = loop {
            let generated = pair.generate(&mut Random::from_seed(seed)).unwrap();
            let (a, b) = *generated.value();
            if a > 0 && b > 0 {
                break generated;
            }
            seed += 1;
        };

        let (a, b) = *generated.value();
        let shrinks = candidates(&generated);
        let first_second = shrinks.iter().position(|(_, y)| *y != b).unwrap();

        assert!(first_second > 0);
        assert!(shrinks[..first_second].iter().all(|(x, y)| *x < a && *y == b));
        assert!(shrinks[first_second..].iter().all(|(x, y)| *x == a && *y < b));
    }

    #[test]
    fn test_constant_component_never_changes() {
        let pair = (constant("fixed"), integer(0u8, 200));
        let mut rng = Random::from_seed(6);
        let generated = pair.generate(&mut rng).unwrap();

        for (label, _) in candidates(&generated) {
            assert_eq!(label, "fixed");
        }
    }

    #[test]
    fn test_eight_components() {
        let wide = (
            integer(0u8, 9),
            integer(0u8, 9),
            integer(0u8, 9),
            integer(0u8, 9),
            integer(0u8, 9),
            integer(0u8, 9),
            integer(0u8, 9),
            integer(0u8, 9),
        );
        let mut rng = Random::from_seed(8);
        let generated = wide.generate(&mut rng).unwrap();
        let (a, _, _, _, _, _, _, h) = *generated.value();
        assert!(a <= 9 && h <= 9);
    }

    #[test]
    fn test_generic_tuple() {
        let components = vec![
            integer(0i32, 10).boxed(),
            integer(100i32, 110).boxed(),
            constant(7).boxed(),
        ];
        let tuple = generic_tuple(components);
        let mut rng = Random::from_seed(12);
        let generated = tuple.generate(&mut rng).unwrap();

        let value = generated.value().clone();
        assert_eq!(value.len(), 3);
        assert!((0..=10).contains(&value[0]));
        assert!((100..=110).contains(&value[1]));
        assert_eq!(value[2], 7);

        for candidate in candidates(&generated) {
            assert_eq!(candidate.len(), 3);
            let changed = candidate.iter().zip(&value).filter(|(x, y)| x != y).count();
            assert_eq!(changed, 1);
        }
    }

    #[test]
    fn test_generic_tuple_rejects_empty_list() {
        let tuple: TupleArbitrary<i32> = generic_tuple(Vec::new());
        let mut rng = Random::from_seed(0);
        assert_eq!(
            tuple.generate(&mut rng).unwrap_err(),
            GenerationError::Config(ConfigError::EmptyTuple)
        );
    }
}
