use std::hash::{Hash, Hasher};

/// Equality relation used to decide uniqueness on one side of a map.
///
/// `equals(a, b)` must imply that `hash_value` feeds the same data for `a`
/// and `b`. Lookups through a borrowed form `Q` of a stored type `T` require
/// the `Comparer<Q>` and `Comparer<T>` impls to agree, the same contract
/// [`Borrow`](std::borrow::Borrow) places on `Hash` and `Eq`.
pub trait Comparer<T: ?Sized> {
    fn equals(&self, a: &T, b: &T) -> bool;

    fn hash_value<H: Hasher>(&self, value: &T, state: &mut H);
}

/// Natural equality: delegates to the type's own [`Eq`] and [`Hash`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultComparer;

impl<T> Comparer<T> for DefaultComparer
where
    T: Hash + Eq + ?Sized,
{
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }

    fn hash_value<H: Hasher>(&self, value: &T, state: &mut H) {
        value.hash(state)
    }
}

impl<T, C> Comparer<T> for &C
where
    T: ?Sized,
    C: Comparer<T> + ?Sized,
{
    fn equals(&self, a: &T, b: &T) -> bool {
        (**self).equals(a, b)
    }

    fn hash_value<H: Hasher>(&self, value: &T, state: &mut H) {
        (**self).hash_value(value, state)
    }
}
