use std::fmt;
use std::iter::FusedIterator;

use crate::arena::{Arena, NodeId};

// Tree height is bounded by log2 of the item count, so 64 levels is never exceeded.
type StkVec<T> = arrayvec::ArrayVec<T, 64>;

/// Iterator returned by [`BTree::iter`](crate::BTree::iter).
///
/// Keeps a stack of `(node, next item)` positions from the root down to the current leaf.
pub struct Iter<'a, K, V> {
    arena: &'a Arena<K, V>,
    stk: StkVec<(NodeId, usize)>,
    len: usize,
}
impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(arena: &'a Arena<K, V>, root: Option<NodeId>, len: usize) -> Self {
        let mut x = Self {
            arena,
            stk: StkVec::new(),
            len,
        };
        if let Some(root) = root {
            x.push_left(root);
        }
        x
    }

    /// Push the path from `id` down to its leftmost leaf.
    fn push_left(&mut self, mut id: NodeId) {
        loop {
            self.stk.push((id, 0));
            match self.arena[id].children.first() {
                Some(&child) => id = child,
                None => break,
            }
        }
    }
}
impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        loop {
            let top = self.stk.last_mut()?;
            let node = &arena[top.0];
            if top.1 < node.items.len() {
                let (k, v) = &node.items[top.1];
                top.1 += 1;
                if !node.is_leaf() {
                    let child = node.children[top.1];
                    self.push_left(child);
                }
                self.len -= 1;
                return Some((k, v));
            }
            self.stk.pop();
        }
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}
impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {
    fn len(&self) -> usize {
        self.len
    }
}
impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}
impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            stk: self.stk.clone(),
            len: self.len,
        }
    }
}
impl<'a, K, V> fmt::Debug for Iter<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("len", &self.len).finish()
    }
}

/// Iterator returned by [`BTree::keys`](crate::BTree::keys).
#[derive(Clone, Debug)]
pub struct Keys<'a, K, V>(pub(crate) Iter<'a, K, V>);
impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, _)| k)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}
impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {
    fn len(&self) -> usize {
        self.0.len()
    }
}
impl<'a, K, V> FusedIterator for Keys<'a, K, V> {}

/// Iterator returned by [`BTree::values`](crate::BTree::values).
#[derive(Clone, Debug)]
pub struct Values<'a, K, V>(pub(crate) Iter<'a, K, V>);
impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}
impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> {
    fn len(&self) -> usize {
        self.0.len()
    }
}
impl<'a, K, V> FusedIterator for Values<'a, K, V> {}
