//! Structural invariant checks

use alloc::vec::Vec;

use crate::node::NodeId;
use crate::RbTree;

/// A red-black or bookkeeping invariant that does not hold.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("root node is red")]
    RedRoot,

    #[error("root node has a parent link")]
    RootHasParent,

    #[error("node at depth {depth} has a child whose parent link points elsewhere")]
    BrokenParentLink { depth: usize },

    #[error("red node at depth {depth} has a red child")]
    RedRed { depth: usize },

    #[error("black height mismatch: expected {expected}, found {found}")]
    BlackHeight { expected: usize, found: usize },

    #[error("tree records {recorded} nodes but {reachable} are reachable")]
    SizeMismatch { recorded: usize, reachable: usize },

    #[error("keys out of order at in-order position {position}")]
    OutOfOrder { position: usize },
}

impl<K: Ord, V> RbTree<K, V> {
    /// Check every structural invariant.
    ///
    /// Links and colors are checked with a depth-first walk from the root;
    /// ordering is checked on the in-order sequence afterwards, once the
    /// parent links it depends on are known to be sound.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let Some(root) = self.root else {
            return match self.len() {
                0 => Ok(()),
                recorded => Err(InvariantViolation::SizeMismatch {
                    recorded,
                    reachable: 0,
                }),
            };
        };

        if self.nodes[root].is_red() {
            return Err(InvariantViolation::RedRoot);
        }
        if self.nodes[root].parent.is_some() {
            return Err(InvariantViolation::RootHasParent);
        }

        let mut reachable = 0;
        let mut expected_black_height = None;
        let mut stack: Vec<(NodeId, usize, usize)> = Vec::new();
        stack.push((root, 0, 0));

        while let Some((id, depth, blacks_above)) = stack.pop() {
            reachable += 1;
            let node = &self.nodes[id];
            let blacks = blacks_above + usize::from(!node.is_red());

            for child in [node.left, node.right] {
                let Some(child) = child else {
                    // Empty child position: every path must end with the same count.
                    match expected_black_height {
                        None => expected_black_height = Some(blacks),
                        Some(expected) if expected != blacks => {
                            return Err(InvariantViolation::BlackHeight {
                                expected,
                                found: blacks,
                            });
                        }
                        Some(_) => {}
                    }
                    continue;
                };

                let child_node = &self.nodes[child];
                if child_node.parent != Some(id) {
                    return Err(InvariantViolation::BrokenParentLink { depth });
                }
                if node.is_red() && child_node.is_red() {
                    return Err(InvariantViolation::RedRed { depth });
                }
                stack.push((child, depth + 1, blacks));
            }
        }

        if reachable != self.len() {
            return Err(InvariantViolation::SizeMismatch {
                recorded: self.len(),
                reachable,
            });
        }

        let mut keys = self.iter().map(|(key, _)| key);
        if let Some(mut previous) = keys.next() {
            for (position, key) in keys.enumerate() {
                if previous >= key {
                    return Err(InvariantViolation::OutOfOrder {
                        position: position + 1,
                    });
                }
                previous = key;
            }
        }

        Ok(())
    }
}
