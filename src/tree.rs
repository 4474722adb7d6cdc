/// Ordered map on a B-tree whose degree is chosen at run time.
///
/// General guide to implementation:
///
/// [`BTree`] has a length, an optional root handle and an `Arena` that stores every node.
/// A node holds its key-value pairs, the handles of its children ( none for a leaf ) and the
/// number of items in its subtree.
///
/// Insert descends recursively. A full leaf reports `Insertion::Overflow` without changing
/// anything, handing the key and value back up. The parent splits the full child and retries
/// the insert on itself. If the parent is full too it reports overflow in turn, and when the
/// root overflows [`BTree::insert`] grows a new root and retries from the top.
///
/// Remove descends recursively, replacing a key found in an internal node with its
/// predecessor. Each level reports `Removal::Removed` with an underflow flag, and the parent
/// repairs an underflowed child by merging it with a sibling or borrowing one item from it.
pub struct BTree<K, V, C = NaturalOrder> {
    len: usize,
    root: Option<NodeId>,
    arena: Arena<K, V>,
    bounds: Bounds,
    cmp: C,
}

enum Insertion<K, V> {
    Added,
    Replaced(V),
    /// Node is full, the pair is handed back so the caller can split and retry.
    Overflow(K, V),
}

enum Removal<K, V> {
    Absent,
    Removed { item: (K, V), underflow: bool },
}

impl<K, V> Default for BTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> BTree<K, V> {
    /// Returns a new, empty map with degree [`DEFAULT_DEGREE`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_degree(DEFAULT_DEGREE)
    }

    /// Returns a new, empty map. A degree <= 0 is treated as [`DEFAULT_DEGREE`], a degree of 1 as 2.
    #[must_use]
    pub fn with_degree(degree: i64) -> Self {
        Self::with_comparator(degree, NaturalOrder)
    }

    /// Returns a new, empty map, or [`Error::InvalidDegree`](crate::Error::InvalidDegree) if degree < 2.
    pub fn try_with_degree(degree: i64) -> Result<Self> {
        Self::try_with_comparator(degree, NaturalOrder)
    }
}

impl<K, V, C> BTree<K, V, C> {
    /// Returns a new, empty map ordered by `cmp`, coercing the degree as [`BTree::with_degree`] does.
    pub fn with_comparator(degree: i64, cmp: C) -> Self {
        Self::from_bounds(Bounds::from_degree(degree), cmp)
    }

    /// Returns a new, empty map ordered by `cmp`, rejecting a degree < 2.
    pub fn try_with_comparator(degree: i64, cmp: C) -> Result<Self> {
        Ok(Self::from_bounds(Bounds::try_from_degree(degree)?, cmp))
    }

    fn from_bounds(bounds: Bounds, cmp: C) -> Self {
        Self {
            len: 0,
            root: None,
            arena: Arena::new(),
            bounds,
            cmp,
        }
    }

    /// Get number of key-value pairs in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Is the map empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Clear the map.
    pub fn clear(&mut self) {
        self.len = 0;
        self.root = None;
        self.arena.clear();
    }

    /// Effective degree, after any coercion.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.bounds.degree
    }

    /// Minimum number of items in a node other than the root.
    #[must_use]
    pub fn min_items(&self) -> usize {
        self.bounds.min
    }

    /// Maximum number of items in a node.
    #[must_use]
    pub fn max_items(&self) -> usize {
        self.bounds.max
    }

    /// Number of levels, 0 for an empty map.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut next = self.root;
        while let Some(id) = next {
            height += 1;
            next = self.arena[id].children.first().copied();
        }
        height
    }

    /// The comparator ordering the keys.
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Get references to first key and value.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let mut id = self.root?;
        loop {
            let node = &self.arena[id];
            match node.children.first() {
                Some(&child) => id = child,
                None => return node.items.first().map(|(k, v)| (k, v)),
            }
        }
    }

    /// Get references to last key and value.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let mut id = self.root?;
        loop {
            let node = &self.arena[id];
            match node.children.last() {
                Some(&child) => id = child,
                None => return node.items.last().map(|(k, v)| (k, v)),
            }
        }
    }

    /// Remove first key-value pair from map.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let root = self.root?;
        match self.pop_first_from(root) {
            Removal::Removed { item, .. } => Some(self.removed(item)),
            Removal::Absent => None,
        }
    }

    /// Remove last key-value pair from map.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let root = self.root?;
        match self.pop_last_from(root) {
            Removal::Removed { item, .. } => Some(self.removed(item)),
            Removal::Absent => None,
        }
    }

    /// Get iterator of references to key-value pairs, in ascending key order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.arena, self.root, self.len)
    }

    /// Get iterator of references to keys.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    /// Get iterator of references to values.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    /// Bookkeeping once a pair has left the tree.
    fn removed(&mut self, item: (K, V)) -> (K, V) {
        self.len -= 1;
        self.shrink_root();
        item
    }

    /// Drop an empty root. An internal root is replaced by its only child.
    fn shrink_root(&mut self) {
        let Some(root) = self.root else { return };
        let node = &self.arena[root];
        if !node.items.is_empty() {
            return;
        }
        if node.is_leaf() {
            self.clear();
        } else {
            let child = node.children[0];
            self.arena.release(root);
            self.root = Some(child);
            tracing::trace!(height = self.height(), "collapsed b-tree root");
        }
    }

    fn underflows(&self, id: NodeId) -> bool {
        self.arena[id].items.len() < self.bounds.min
    }

    /// Split a full node. The median and the handle of the new right sibling are returned.
    fn split(&mut self, id: NodeId) -> ((K, V), NodeId) {
        let mid = self.bounds.max / 2;
        let node = &mut self.arena[id];
        let total = node.length;
        let mut right_items = node.items.split_off(mid);
        let median = right_items.remove(0);
        let right_children = if node.is_leaf() {
            Vec::new()
        } else {
            node.children.split_off(mid + 1)
        };
        let right_len = right_items.len()
            + right_children
                .iter()
                .map(|&c| self.arena[c].length)
                .sum::<usize>();
        self.arena[id].length = total - right_len - 1;
        let right = if right_children.is_empty() {
            Node::leaf(right_items)
        } else {
            Node::internal(right_items, right_children, right_len)
        };
        (median, self.arena.alloc(right))
    }

    /// Split the root, making the tree one level taller.
    fn grow_root(&mut self, old: NodeId) -> NodeId {
        let length = self.arena[old].length;
        let (median, right) = self.split(old);
        let root = self
            .arena
            .alloc(Node::internal(vec![median], vec![old, right], length));
        self.root = Some(root);
        tracing::trace!(height = self.height(), "split b-tree root");
        root
    }

    /// Remove the largest item in the subtree.
    fn pop_last_from(&mut self, id: NodeId) -> Removal<K, V> {
        let node = &mut self.arena[id];
        if node.is_leaf() {
            return match node.items.pop() {
                Some(item) => {
                    node.length -= 1;
                    Removal::Removed {
                        item,
                        underflow: self.underflows(id),
                    }
                }
                None => Removal::Absent,
            };
        }
        let i = node.children.len() - 1;
        let child = node.children[i];
        match self.pop_last_from(child) {
            Removal::Removed { item, underflow } => self.child_removed(id, i, item, underflow),
            Removal::Absent => Removal::Absent,
        }
    }

    /// Remove the smallest item in the subtree.
    fn pop_first_from(&mut self, id: NodeId) -> Removal<K, V> {
        let node = &mut self.arena[id];
        if node.is_leaf() {
            if node.items.is_empty() {
                return Removal::Absent;
            }
            let item = node.items.remove(0);
            node.length -= 1;
            return Removal::Removed {
                item,
                underflow: self.underflows(id),
            };
        }
        let child = node.children[0];
        match self.pop_first_from(child) {
            Removal::Removed { item, underflow } => self.child_removed(id, 0, item, underflow),
            Removal::Absent => Removal::Absent,
        }
    }

    /// Child `i` of `id` lost an item; fix counts and occupancy at this level.
    fn child_removed(&mut self, id: NodeId, i: usize, item: (K, V), underflow: bool) -> Removal<K, V> {
        self.arena[id].length -= 1;
        if underflow {
            self.rebalance(id, i);
        }
        Removal::Removed {
            item,
            underflow: self.underflows(id),
        }
    }

    /// Restore occupancy of child `i` by merging with, or borrowing from, an adjacent sibling.
    fn rebalance(&mut self, parent: NodeId, i: usize) {
        let p = &self.arena[parent];
        if p.items.is_empty() {
            return;
        }
        let l = if i == p.items.len() { i - 1 } else { i };
        let (left, right) = (p.children[l], p.children[l + 1]);
        let (nl, nr) = (self.arena[left].items.len(), self.arena[right].items.len());
        if nl + nr < self.bounds.max {
            self.merge(parent, l);
        } else if nl > nr {
            self.rotate_right(parent, l);
        } else {
            self.rotate_left(parent, l);
        }
    }

    /// Merge child `l + 1` and separator `l` into child `l`.
    fn merge(&mut self, parent: NodeId, l: usize) {
        let p = &mut self.arena[parent];
        let separator = p.items.remove(l);
        let right = p.children.remove(l + 1);
        let left = p.children[l];
        let right = self.arena.release(right);
        let node = &mut self.arena[left];
        node.items.push(separator);
        node.items.extend(right.items);
        node.children.extend(right.children);
        node.length += right.length + 1;
    }

    /// Move the first item of child `l + 1` up into the parent, and separator `l` down into child `l`.
    fn rotate_left(&mut self, parent: NodeId, l: usize) {
        let (left, right) = {
            let p = &self.arena[parent];
            (p.children[l], p.children[l + 1])
        };
        let donor = &mut self.arena[right];
        let item = donor.items.remove(0);
        let child = if donor.is_leaf() {
            None
        } else {
            Some(donor.children.remove(0))
        };
        let moved = 1 + child.map_or(0, |c| self.arena[c].length);
        self.arena[right].length -= moved;
        let separator = std::mem::replace(&mut self.arena[parent].items[l], item);
        let node = &mut self.arena[left];
        node.items.push(separator);
        node.children.extend(child);
        node.length += moved;
    }

    /// Move the last item of child `l` up into the parent, and separator `l` down into child `l + 1`.
    fn rotate_right(&mut self, parent: NodeId, l: usize) {
        let (left, right) = {
            let p = &self.arena[parent];
            (p.children[l], p.children[l + 1])
        };
        let donor = &mut self.arena[left];
        let last = donor.items.len() - 1;
        let item = donor.items.remove(last);
        let child = if donor.is_leaf() {
            None
        } else {
            donor.children.pop()
        };
        let moved = 1 + child.map_or(0, |c| self.arena[c].length);
        self.arena[left].length -= moved;
        let separator = std::mem::replace(&mut self.arena[parent].items[l], item);
        let node = &mut self.arena[right];
        node.items.insert(0, separator);
        if let Some(c) = child {
            node.children.insert(0, c);
        }
        node.length += moved;
    }
} // End impl BTree

impl<K, V, C: Comparator<K>> BTree<K, V, C> {
    /// Insert key-value pair into map, or if key is already in map, replaces value and returns old value.
    ///
    /// Fails with [`Error::IncomparableKey`](crate::Error::IncomparableKey) if the comparator
    /// cannot order `key`, in which case the pair is dropped and the map is left valid.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        let Some(mut root) = self.root else {
            // A key that cannot be ordered against itself would poison every later search.
            self.cmp.compare(&key, &key).ok_or(Error::IncomparableKey)?;
            self.root = Some(self.arena.alloc(Node::leaf(vec![(key, value)])));
            self.len = 1;
            return Ok(None);
        };
        let (mut key, mut value) = (key, value);
        loop {
            match self.insert_into(root, key, value)? {
                Insertion::Added => {
                    self.len += 1;
                    return Ok(None);
                }
                Insertion::Replaced(old) => return Ok(Some(old)),
                Insertion::Overflow(k, v) => {
                    root = self.grow_root(root);
                    (key, value) = (k, v);
                }
            }
        }
    }

    fn insert_into(&mut self, id: NodeId, mut key: K, mut value: V) -> Result<Insertion<K, V>> {
        loop {
            let node = &mut self.arena[id];
            let i = match node.search(&key, &self.cmp)? {
                Search::Found(i) => {
                    let old = std::mem::replace(&mut node.items[i].1, value);
                    return Ok(Insertion::Replaced(old));
                }
                Search::Missing(i) => i,
            };
            if node.is_leaf() {
                if node.items.len() >= self.bounds.max {
                    return Ok(Insertion::Overflow(key, value));
                }
                node.items.insert(i, (key, value));
                node.length += 1;
                return Ok(Insertion::Added);
            }
            let child = node.children[i];
            match self.insert_into(child, key, value)? {
                Insertion::Added => {
                    self.arena[id].length += 1;
                    return Ok(Insertion::Added);
                }
                Insertion::Replaced(old) => return Ok(Insertion::Replaced(old)),
                Insertion::Overflow(k, v) => {
                    if self.arena[id].items.len() >= self.bounds.max {
                        return Ok(Insertion::Overflow(k, v));
                    }
                    let (median, right) = self.split(child);
                    let node = &mut self.arena[id];
                    node.items.insert(i, median);
                    node.children.insert(i + 1, right);
                    (key, value) = (k, v);
                }
            }
        }
    }

    /// Locate key, returning the node and index holding it.
    fn find(&self, key: &K) -> Result<Option<(NodeId, usize)>> {
        let Some(mut id) = self.root else {
            return Ok(None);
        };
        loop {
            let node = &self.arena[id];
            match node.search(key, &self.cmp)? {
                Search::Found(i) => return Ok(Some((id, i))),
                Search::Missing(_) if node.is_leaf() => return Ok(None),
                Search::Missing(i) => id = node.children[i],
            }
        }
    }

    /// Get reference to the value corresponding to the key.
    pub fn get(&self, key: &K) -> Result<Option<&V>> {
        Ok(self.get_key_value(key)?.map(|(_k, v)| v))
    }

    /// Get references to the corresponding key and value.
    pub fn get_key_value(&self, key: &K) -> Result<Option<(&K, &V)>> {
        Ok(self.find(key)?.map(|(id, i)| {
            let (k, v) = &self.arena[id].items[i];
            (k, v)
        }))
    }

    /// Get a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Result<Option<&mut V>> {
        Ok(match self.find(key)? {
            Some((id, i)) => Some(&mut self.arena[id].items[i].1),
            None => None,
        })
    }

    /// Does the map have an entry for the specified key.
    pub fn contains_key(&self, key: &K) -> Result<bool> {
        Ok(self.find(key)?.is_some())
    }

    /// Remove key-value pair from map, returning just the value.
    pub fn remove(&mut self, key: &K) -> Result<Option<V>> {
        Ok(self.remove_entry(key)?.map(|(_k, v)| v))
    }

    /// Remove key-value pair from map.
    pub fn remove_entry(&mut self, key: &K) -> Result<Option<(K, V)>> {
        let Some(root) = self.root else {
            return Ok(None);
        };
        Ok(match self.remove_from(root, key)? {
            Removal::Removed { item, .. } => Some(self.removed(item)),
            Removal::Absent => None,
        })
    }

    fn remove_from(&mut self, id: NodeId, key: &K) -> Result<Removal<K, V>> {
        let node = &mut self.arena[id];
        let search = node.search(key, &self.cmp)?;
        if node.is_leaf() {
            return Ok(match search {
                Search::Found(i) => {
                    let item = node.items.remove(i);
                    node.length -= 1;
                    Removal::Removed {
                        item,
                        underflow: self.underflows(id),
                    }
                }
                Search::Missing(_) => Removal::Absent,
            });
        }
        Ok(match search {
            // Replace with the predecessor, the largest item of the left subtree.
            Search::Found(i) => {
                let child = node.children[i];
                match self.pop_last_from(child) {
                    Removal::Removed {
                        item: pred,
                        underflow,
                    } => {
                        let item = std::mem::replace(&mut self.arena[id].items[i], pred);
                        self.child_removed(id, i, item, underflow)
                    }
                    Removal::Absent => Removal::Absent,
                }
            }
            Search::Missing(i) => {
                let child = node.children[i];
                match self.remove_from(child, key)? {
                    Removal::Removed { item, underflow } => {
                        self.child_removed(id, i, item, underflow)
                    }
                    Removal::Absent => Removal::Absent,
                }
            }
        })
    }
} // End impl BTree ( keyed operations )

impl<'a, K, V, C> IntoIterator for &'a BTree<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K: Debug, V: Debug, C> Debug for BTree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
impl<K, V, C: Comparator<K>> BTree<K, V, C> {
    /// Assert every structural invariant: ordering, occupancy, equal leaf depth, cached counts.
    pub(crate) fn check(&self) {
        let Some(root) = self.root else {
            assert_eq!(self.len, 0);
            assert_eq!(self.arena.live(), 0);
            return;
        };
        assert!(!self.arena[root].items.is_empty(), "empty root");
        let (mut leaf_depth, mut nodes) = (None, 0);
        let count = self.check_node(root, None, None, 1, &mut leaf_depth, &mut nodes);
        assert_eq!(count, self.len);
        assert_eq!(leaf_depth, Some(self.height()));
        assert_eq!(nodes, self.arena.live(), "unreachable nodes in arena");
    }

    fn check_node(
        &self,
        id: NodeId,
        lo: Option<&K>,
        hi: Option<&K>,
        depth: usize,
        leaf_depth: &mut Option<usize>,
        nodes: &mut usize,
    ) -> usize {
        use std::cmp::Ordering::Less;
        *nodes += 1;
        let node = &self.arena[id];
        if Some(id) != self.root {
            assert!(node.items.len() >= self.bounds.min, "node under min");
        }
        assert!(node.items.len() <= self.bounds.max, "node over max");
        for w in node.items.windows(2) {
            assert_eq!(self.cmp.compare(&w[0].0, &w[1].0), Some(Less));
        }
        if let (Some(lo), Some(first)) = (lo, node.items.first()) {
            assert_eq!(self.cmp.compare(lo, &first.0), Some(Less));
        }
        if let (Some(hi), Some(last)) = (hi, node.items.last()) {
            assert_eq!(self.cmp.compare(&last.0, hi), Some(Less));
        }
        let mut count = node.items.len();
        if node.is_leaf() {
            match leaf_depth {
                Some(d) => assert_eq!(*d, depth, "leaves at different depths"),
                None => *leaf_depth = Some(depth),
            }
        } else {
            assert_eq!(node.children.len(), node.items.len() + 1);
            for (j, &c) in node.children.iter().enumerate() {
                let clo = if j == 0 { lo } else { Some(&node.items[j - 1].0) };
                let chi = node.items.get(j).map(|kv| &kv.0).or(hi);
                count += self.check_node(c, clo, chi, depth + 1, leaf_depth, nodes);
            }
        }
        assert_eq!(count, node.length, "stale subtree count");
        count
    }
}

use std::{fmt, fmt::Debug};

use crate::arena::{Arena, NodeId};
use crate::compare::{Comparator, NaturalOrder};
use crate::config::{Bounds, DEFAULT_DEGREE};
use crate::iter::{Iter, Keys, Values};
use crate::node::{Node, Search};
use crate::{Error, Result};
