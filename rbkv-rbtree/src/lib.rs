//! Ordered red-black map
//!
//! Nodes live in an [`Arena`] and link to each other by index: child links own
//! their subtrees, parent links are plain back-references. The map itself is
//! single-threaded; callers that share it wrap it in a lock.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod delete;
mod insert;
mod iter;
mod node;
mod rotate;
mod validate;

use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;

use rbkv_mm::{handle_exhaustion, Arena};

pub use iter::Iter;
pub use node::Color;
pub use validate::InvariantViolation;

use node::{Node, NodeId};

/// Red-black tree keyed by `K`.
///
/// Keys are owned by the tree. Lookups accept any borrowed form of the key,
/// so a `RbTree<String, _>` is queried with `&str`.
pub struct RbTree<K, V> {
    nodes: Arena<Node<K, V>>,
    root: Option<NodeId>,
}

static_assertions::assert_impl_all!(RbTree<alloc::string::String, i64>: Send, Sync);

impl<K, V> Default for RbTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> RbTree<K, V> {
    /// Create an empty tree
    pub const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    /// Create an empty tree with room for `capacity` nodes.
    ///
    /// Aborts the process if the memory cannot be reserved.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity).unwrap_or_else(|err| handle_exhaustion(&err)),
            root: None,
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Color of the root, `None` for an empty tree.
    pub fn root_color(&self) -> Option<Color> {
        self.root.map(|root| self.nodes[root].color)
    }

    /// Entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.root.map(|root| self.entry(self.minimum(root)))
    }

    /// Entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.root.map(|root| self.entry(self.maximum(root)))
    }

    /// Number of nodes on the longest root-to-leaf path; 0 when empty.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack = Vec::new();
        if let Some(root) = self.root {
            stack.push((root, 1));
        }

        while let Some((id, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.nodes[id];
            stack.extend(node.left.map(|child| (child, depth + 1)));
            stack.extend(node.right.map(|child| (child, depth + 1)));
        }

        height
    }

    /// In-order iterator over all entries.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    /// Release every node, returning how many were freed.
    ///
    /// Walks the tree with an explicit work stack, so teardown depth does not
    /// depend on tree shape.
    pub fn clear(&mut self) -> usize {
        let mut released = 0;
        let mut stack = Vec::new();
        stack.extend(self.root.take());

        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.free(id) {
                stack.extend(node.left);
                stack.extend(node.right);
                released += 1;
            }
        }

        debug_assert!(self.nodes.is_empty(), "unreachable nodes left in arena");
        self.nodes.clear();
        released
    }

    fn entry(&self, id: NodeId) -> (&K, &V) {
        let node = &self.nodes[id];
        (&node.key, &node.value)
    }

    fn is_red(&self, id: Option<NodeId>) -> bool {
        id.is_some_and(|id| self.nodes[id].is_red())
    }

    fn set_color(&mut self, id: NodeId, color: Color) {
        self.nodes[id].color = color;
    }

    /// Leftmost node of the subtree rooted at `id`.
    fn minimum(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.nodes[id].left {
            id = left;
        }
        id
    }

    /// Rightmost node of the subtree rooted at `id`.
    fn maximum(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.nodes[id].right {
            id = right;
        }
        id
    }

    /// In-order successor, climbing parent links when there is no right subtree.
    fn successor(&self, mut id: NodeId) -> Option<NodeId> {
        if let Some(right) = self.nodes[id].right {
            return Some(self.minimum(right));
        }

        while let Some(parent) = self.nodes[id].parent {
            if self.nodes[parent].left == Some(id) {
                return Some(parent);
            }
            id = parent;
        }
        None
    }
}

impl<K: Ord, V> RbTree<K, V> {
    /// Look up the value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| &self.nodes[id].value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find(key)?;
        Some(&mut self.nodes[id].value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Descend from the root comparing against each visited key.
    fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            cursor = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RbTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V> IntoIterator for &'a RbTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
