use std::cmp::Ordering;

use crate::arena::NodeId;
use crate::compare::Comparator;
use crate::{Error, Result};

/// Outcome of [`Node::search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Search {
    /// Key is at this index.
    Found(usize),
    /// Key is absent, index is where it would be inserted ( or the child to descend into ).
    Missing(usize),
}

/// A B-tree node. Leaves have no children, internal nodes have `items.len() + 1` children.
#[derive(Debug)]
pub(crate) struct Node<K, V> {
    /// Key-value pairs in strictly ascending key order.
    pub items: Vec<(K, V)>,
    pub children: Vec<NodeId>,
    /// Items in this subtree, including descendants.
    pub length: usize,
}

impl<K, V> Node<K, V> {
    pub fn leaf(items: Vec<(K, V)>) -> Self {
        Self {
            length: items.len(),
            items,
            children: Vec::new(),
        }
    }

    pub fn internal(items: Vec<(K, V)>, children: Vec<NodeId>, length: usize) -> Self {
        debug_assert_eq!(items.len() + 1, children.len());
        Self {
            items,
            children,
            length,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Lower-bound binary search for `key`.
    pub fn search<C>(&self, key: &K, cmp: &C) -> Result<Search>
    where
        C: Comparator<K>,
    {
        let (mut lo, mut hi) = (0, self.items.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match cmp
                .compare(&self.items[mid].0, key)
                .ok_or(Error::IncomparableKey)?
            {
                Ordering::Less => lo = mid + 1,
                Ordering::Equal => return Ok(Search::Found(mid)),
                Ordering::Greater => hi = mid,
            }
        }
        Ok(Search::Missing(lo))
    }
}
