//! Key ordering.

use std::cmp::Ordering;
use std::fmt;

/// Total order over keys used by [`BTree`](crate::BTree).
///
/// The order must be strict and must not change while keys are stored in a tree.
/// Returning `None` means the pair cannot be ordered, which the tree reports as
/// [`Error::IncomparableKey`](crate::Error::IncomparableKey).
pub trait Comparator<K: ?Sized> {
    /// Compare `a` with `b`.
    fn compare(&self, a: &K, b: &K) -> Option<Ordering>;
}

/// Orders keys by their [`PartialOrd`] implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NaturalOrder;

impl<K: PartialOrd + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Option<Ordering> {
        a.partial_cmp(b)
    }
}

/// Adapts a closure returning [`Ordering`] into a [`Comparator`].
///
/// ```
/// use arena_btree::{BTree, FnComparator};
/// let mut t = BTree::with_comparator(3, FnComparator(|a: &i32, b: &i32| b.cmp(a)));
/// t.insert(1, "one").unwrap();
/// t.insert(2, "two").unwrap();
/// assert_eq!(t.first_key_value(), Some((&2, &"two")));
/// ```
#[derive(Clone, Copy)]
pub struct FnComparator<F>(pub F);

impl<F> fmt::Debug for FnComparator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnComparator")
    }
}

impl<K: ?Sized, F> Comparator<K> for FnComparator<F>
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Option<Ordering> {
        Some((self.0)(a, b))
    }
}
