//! Insertion and insert-fixup

use core::cmp::Ordering;
use core::mem;

use rbkv_mm::handle_exhaustion;

use crate::node::{Node, NodeId};
use crate::{Color, RbTree};

impl<K: Ord, V> RbTree<K, V> {
    /// Insert `value` under `key`.
    ///
    /// If the key is already present its value is overwritten in place and
    /// the previous value returned; the stored key and the tree shape are left
    /// alone. Otherwise a red leaf is attached and the tree rebalanced.
    ///
    /// Aborts the process if a node cannot be allocated.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut parent = None;
        let mut went_left = false;
        let mut cursor = self.root;

        // Find insertion point
        while let Some(id) = cursor {
            let node = &mut self.nodes[id];
            match key.cmp(&node.key) {
                Ordering::Less => {
                    went_left = true;
                    cursor = node.left;
                }
                Ordering::Greater => {
                    went_left = false;
                    cursor = node.right;
                }
                Ordering::Equal => return Some(mem::replace(&mut node.value, value)),
            }
            parent = Some(id);
        }

        let id = self
            .nodes
            .alloc(Node::new(key, value, parent))
            .unwrap_or_else(|err| handle_exhaustion(&err));

        match parent {
            None => {
                self.root = Some(id);
                self.set_color(id, Color::Black);
            }
            Some(parent) => {
                if went_left {
                    self.nodes[parent].left = Some(id);
                } else {
                    self.nodes[parent].right = Some(id);
                }
                self.insert_fixup(id);
            }
        }

        None
    }

    /// Rebalance after attaching the red leaf `node`.
    fn insert_fixup(&mut self, mut node: NodeId) {
        while let Some(parent) = self.nodes[node].parent {
            if !self.nodes[parent].is_red() {
                break;
            }
            // A red parent is never the root, so the grandparent exists.
            let Some(grandparent) = self.nodes[parent].parent else {
                break;
            };

            if self.nodes[grandparent].left == Some(parent) {
                let uncle = self.nodes[grandparent].right;

                if let Some(uncle) = uncle.filter(|&uncle| self.nodes[uncle].is_red()) {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    node = grandparent;
                } else {
                    let mut parent = parent;
                    if self.nodes[parent].right == Some(node) {
                        self.rotate_left(parent);
                        mem::swap(&mut node, &mut parent);
                    }
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate_right(grandparent);
                    break;
                }
            } else {
                let uncle = self.nodes[grandparent].left;

                if let Some(uncle) = uncle.filter(|&uncle| self.nodes[uncle].is_red()) {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    node = grandparent;
                } else {
                    let mut parent = parent;
                    if self.nodes[parent].left == Some(node) {
                        self.rotate_right(parent);
                        mem::swap(&mut node, &mut parent);
                    }
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate_left(grandparent);
                    break;
                }
            }
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }
}
