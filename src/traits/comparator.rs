use core::{cmp::Ordering, marker::PhantomData};

use ordered_float::{FloatCore, OrderedFloat};

/// Total-order policy used by a tree to place and deduplicate its values.
///
/// Policies are zero-sized types selected at the type level, so every tree derived from
/// a common ancestor is guaranteed to agree on the ordering it was built with.
///
/// # Type Parameters
///
/// * `T` - The type of the values being ordered
///
/// # Methods
///
/// * `compare(a: &T, b: &T) -> Ordering` - Returns how `a` orders relative to `b`
///
/// The policy must be a strict total order: reflexive equality, antisymmetric and
/// transitive. Values comparing [`Ordering::Equal`] are treated as the same key.
pub trait Comparator<T: ?Sized> {
    /// Compares two values under this policy
    fn compare(a: &T, b: &T) -> Ordering;

    /// Returns `true` if `a` sorts strictly before `b`
    #[inline]
    fn less(a: &T, b: &T) -> bool {
        Self::compare(a, b) == Ordering::Less
    }
}

/// Order policy delegating to [`Ord`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Natural;

/// Order policy reversing another policy
///
/// ```
/// # use persistent_rbtree::{RbTree, Natural, Reverse};
/// let tree = RbTree::<u32, Reverse<Natural>>::default().insert_many([1, 3, 2]);
/// assert_eq!(tree.to_vec(), vec![3, 2, 1]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reverse<O>(PhantomData<O>);

/// Order policy for floating point values
///
/// Wraps values in [`OrderedFloat`] so that NaN is ordered (above positive infinity) and
/// every bit pattern of NaN is a single key. `-0.0` and `0.0` compare equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FloatTotal;

impl<T: Ord + ?Sized> Comparator<T> for Natural {
    #[inline]
    fn compare(a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T: ?Sized, O: Comparator<T>> Comparator<T> for Reverse<O> {
    #[inline]
    fn compare(a: &T, b: &T) -> Ordering {
        O::compare(b, a)
    }
}

impl<T: FloatCore> Comparator<T> for FloatTotal {
    #[inline]
    fn compare(a: &T, b: &T) -> Ordering {
        OrderedFloat(*a).cmp(&OrderedFloat(*b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_order() {
        assert_eq!(Natural::compare(&1, &2), Ordering::Less);
        assert_eq!(Natural::compare(&2, &2), Ordering::Equal);
        assert_eq!(Natural::compare("b", "a"), Ordering::Greater);
        assert!(Natural::less(&1, &2));
        assert!(!Natural::less(&2, &2));
    }

    #[test]
    fn test_reverse_order() {
        assert_eq!(Reverse::<Natural>::compare(&1, &2), Ordering::Greater);
        assert_eq!(Reverse::<Natural>::compare(&2, &2), Ordering::Equal);
        assert_eq!(
            Reverse::<Reverse<Natural>>::compare(&1, &2),
            Ordering::Less
        );
    }

    #[test]
    fn test_float_total_order() {
        assert_eq!(FloatTotal::compare(&1.0_f64, &2.0), Ordering::Less);
        assert_eq!(FloatTotal::compare(&-0.0_f64, &0.0), Ordering::Equal);
        assert_eq!(
            FloatTotal::compare(&f64::NAN, &f64::INFINITY),
            Ordering::Greater
        );
        assert_eq!(FloatTotal::compare(&f64::NAN, &f64::NAN), Ordering::Equal);
        assert_eq!(
            FloatTotal::compare(&f64::NEG_INFINITY, &f64::MIN),
            Ordering::Less
        );
    }
}
