//! In-order traversal

use core::iter::FusedIterator;

use crate::node::NodeId;
use crate::RbTree;

/// In-order iterator over a tree's entries.
///
/// Steps through successors via parent links, so it needs no stack.
pub struct Iter<'a, K, V> {
    tree: &'a RbTree<K, V>,
    next: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(tree: &'a RbTree<K, V>) -> Self {
        Self {
            tree,
            next: tree.root.map(|root| tree.minimum(root)),
            remaining: tree.len(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.tree.successor(id);
        self.remaining = self.remaining.saturating_sub(1);
        Some(self.tree.entry(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
