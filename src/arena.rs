use std::ops::{Index, IndexMut};

use crate::node::Node;

/// Handle to a node stored in an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
    #[inline]
    fn ix(self) -> usize {
        self.0 as usize
    }
}

/// Growable node store. Parents hold [`NodeId`] handles rather than owning their children.
///
/// Released slots are kept on a free list and handed out again by [`Arena::alloc`].
#[derive(Debug)]
pub(crate) struct Arena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<NodeId>,
}

impl<K, V> Default for Arena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Arena<K, V> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Store node, returning its handle.
    pub fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.slots[id.ix()] = Some(node);
            id
        } else {
            let id = NodeId(u32::try_from(self.slots.len()).unwrap_or_else(|_| {
                panic!("b-tree arena exceeded {} nodes", u32::MAX)
            }));
            self.slots.push(Some(node));
            id
        }
    }

    /// Remove node from the arena, the handle must not be used again.
    pub fn release(&mut self, id: NodeId) -> Node<K, V> {
        match self.slots[id.ix()].take() {
            Some(node) => {
                self.free.push(id);
                node
            }
            None => panic!("node {id:?} released twice"),
        }
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    /// Number of live nodes.
    pub fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Total slots, live or free.
    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl<K, V> Index<NodeId> for Arena<K, V> {
    type Output = Node<K, V>;

    #[inline]
    fn index(&self, id: NodeId) -> &Node<K, V> {
        match &self.slots[id.ix()] {
            Some(node) => node,
            None => panic!("node {id:?} used after release"),
        }
    }
}

impl<K, V> IndexMut<NodeId> for Arena<K, V> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match &mut self.slots[id.ix()] {
            Some(node) => node,
            None => panic!("node {id:?} used after release"),
        }
    }
}
