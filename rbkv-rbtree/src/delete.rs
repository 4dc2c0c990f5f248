//! Deletion and delete-fixup

use core::borrow::Borrow;

use crate::node::NodeId;
use crate::{Color, RbTree};

impl<K: Ord, V> RbTree<K, V> {
    /// Remove `key`, returning its value. `None` if the key was absent.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let z = self.find(key)?;
        let z_left = self.nodes[z].left;
        let z_right = self.nodes[z].right;

        // `x` moves into the spliced-out node's position. It may be empty, so
        // its parent is tracked separately.
        let removed_color;
        let x;
        let x_parent;

        match (z_left, z_right) {
            (None, _) => {
                removed_color = self.nodes[z].color;
                x = z_right;
                x_parent = self.nodes[z].parent;
                self.transplant(z, z_right);
            }
            (Some(_), None) => {
                removed_color = self.nodes[z].color;
                x = z_left;
                x_parent = self.nodes[z].parent;
                self.transplant(z, z_left);
            }
            (Some(left), Some(right)) => {
                let y = self.minimum(right);
                removed_color = self.nodes[y].color;
                x = self.nodes[y].right;

                if self.nodes[y].parent == Some(z) {
                    x_parent = Some(y);
                } else {
                    x_parent = self.nodes[y].parent;
                    self.transplant(y, x);
                    self.nodes[y].right = Some(right);
                    self.nodes[right].parent = Some(y);
                }

                self.transplant(z, Some(y));
                self.nodes[y].left = Some(left);
                self.nodes[left].parent = Some(y);
                self.nodes[y].color = self.nodes[z].color;
            }
        }

        let Some(removed) = self.nodes.free(z) else {
            unreachable!("found node not in arena");
        };

        if removed_color == Color::Black {
            self.delete_fixup(x, x_parent);
        }

        Some(removed.value)
    }

    /// Restore black height after a black node left the path through `x`.
    fn delete_fixup(&mut self, mut x: Option<NodeId>, mut parent: Option<NodeId>) {
        while x != self.root && !self.is_red(x) {
            let Some(p) = parent else {
                break;
            };

            if self.nodes[p].left == x {
                // The short side has black height >= 0, so the sibling exists.
                let Some(mut sibling) = self.nodes[p].right else {
                    break;
                };

                if self.nodes[sibling].is_red() {
                    self.set_color(sibling, Color::Black);
                    self.set_color(p, Color::Red);
                    self.rotate_left(p);
                    sibling = match self.nodes[p].right {
                        Some(sibling) => sibling,
                        None => break,
                    };
                }

                let near = self.nodes[sibling].left;
                let far = self.nodes[sibling].right;
                if !self.is_red(near) && !self.is_red(far) {
                    self.set_color(sibling, Color::Red);
                    x = Some(p);
                    parent = self.nodes[p].parent;
                } else {
                    if !self.is_red(far) {
                        if let Some(near) = near {
                            self.set_color(near, Color::Black);
                        }
                        self.set_color(sibling, Color::Red);
                        self.rotate_right(sibling);
                        sibling = match self.nodes[p].right {
                            Some(sibling) => sibling,
                            None => break,
                        };
                    }

                    self.set_color(sibling, self.nodes[p].color);
                    self.set_color(p, Color::Black);
                    if let Some(far) = self.nodes[sibling].right {
                        self.set_color(far, Color::Black);
                    }
                    self.rotate_left(p);
                    x = self.root;
                    parent = None;
                }
            } else {
                let Some(mut sibling) = self.nodes[p].left else {
                    break;
                };

                if self.nodes[sibling].is_red() {
                    self.set_color(sibling, Color::Black);
                    self.set_color(p, Color::Red);
                    self.rotate_right(p);
                    sibling = match self.nodes[p].left {
                        Some(sibling) => sibling,
                        None => break,
                    };
                }

                let near = self.nodes[sibling].right;
                let far = self.nodes[sibling].left;
                if !self.is_red(near) && !self.is_red(far) {
                    self.set_color(sibling, Color::Red);
                    x = Some(p);
                    parent = self.nodes[p].parent;
                } else {
                    if !self.is_red(far) {
                        if let Some(near) = near {
                            self.set_color(near, Color::Black);
                        }
                        self.set_color(sibling, Color::Red);
                        self.rotate_left(sibling);
                        sibling = match self.nodes[p].left {
                            Some(sibling) => sibling,
                            None => break,
                        };
                    }

                    self.set_color(sibling, self.nodes[p].color);
                    self.set_color(p, Color::Black);
                    if let Some(far) = self.nodes[sibling].left {
                        self.set_color(far, Color::Black);
                    }
                    self.rotate_right(p);
                    x = self.root;
                    parent = None;
                }
            }
        }

        if let Some(x) = x {
            self.set_color(x, Color::Black);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::RbTree;

    fn tree_of(keys: &[u32]) -> RbTree<u32, u32> {
        let mut tree = RbTree::new();
        for &key in keys {
            tree.insert(key, key * 10);
        }
        tree
    }

    fn keys(tree: &RbTree<u32, u32>) -> Vec<u32> {
        tree.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_remove_missing_key() {
        let mut tree = tree_of(&[1, 2, 3]);
        assert_eq!(tree.remove(&9), None);
        assert_eq!(tree.len(), 3);

        let mut empty: RbTree<u32, u32> = RbTree::new();
        assert_eq!(empty.remove(&1), None);
    }

    #[test]
    fn test_remove_only_node() {
        let mut tree = tree_of(&[5]);
        assert_eq!(tree.remove(&5), Some(50));
        assert!(tree.is_empty());
        assert_eq!(tree.root_color(), None);
    }

    #[test]
    fn test_remove_leaf_scenario() {
        let mut tree = RbTree::new();
        tree.insert("b".to_string(), 2);
        tree.insert("a".to_string(), 1);
        tree.insert("c".to_string(), 3);

        assert_eq!(tree.remove("a"), Some(1));
        assert_eq!(tree.get("a"), None);
        assert_eq!(tree.get("b"), Some(&2));
        assert_eq!(tree.get("c"), Some(&3));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_remove_black_leaf_triggers_fixup() {
        let mut tree = tree_of(&[4, 2, 6, 1, 3, 5, 7]);
        // After the build 2 and 6 are black and the leaves red.
        tree.remove(&1);
        tree.remove(&3);
        // 2 is now a black leaf; removing it forces a sibling-side repair.
        assert_eq!(tree.remove(&2), Some(20));
        assert_eq!(keys(&tree), [4, 5, 6, 7]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_remove_node_with_two_children() {
        let mut tree = tree_of(&[4, 2, 6, 1, 3, 5, 7]);
        assert_eq!(tree.remove(&4), Some(40));
        assert_eq!(keys(&tree), [1, 2, 3, 5, 6, 7]);
        assert_eq!(tree.first().map(|(k, _)| *k), Some(1));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_remove_successor_deep_in_right_subtree() {
        let mut tree = tree_of(&[50, 30, 70, 20, 40, 60, 80, 65, 55]);
        assert_eq!(tree.remove(&50), Some(500));
        assert!(!tree.contains_key(&50));
        assert_eq!(keys(&tree), [20, 30, 40, 55, 60, 65, 70, 80]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_remove_everything_ascending() {
        let mut tree = tree_of(&(0..200).collect::<Vec<_>>());
        for key in 0..200 {
            assert_eq!(tree.remove(&key), Some(key * 10));
            assert!(tree.validate().is_ok(), "after removing {}", key);
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn test_remove_everything_interleaved() {
        let mut tree = tree_of(&(0..300).collect::<Vec<_>>());
        let order: Vec<u32> = (0..300).map(|i| (i * 97) % 300).collect();
        for (removed, &key) in order.iter().enumerate() {
            assert_eq!(tree.remove(&key), Some(key * 10));
            assert_eq!(tree.len(), 300 - removed - 1);
            assert!(tree.validate().is_ok(), "after removing {}", key);
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn test_other_keys_unaffected() {
        let mut tree = tree_of(&(0..50).collect::<Vec<_>>());
        tree.remove(&25);
        for key in (0..50).filter(|&k| k != 25) {
            assert_eq!(tree.get(&key), Some(&(key * 10)));
        }
    }

    #[test]
    fn test_slots_reused_after_remove() {
        let mut tree = tree_of(&[1, 2, 3]);
        let capacity = tree.nodes.capacity();
        tree.remove(&2);
        tree.insert(4, 40);
        assert_eq!(tree.nodes.capacity(), capacity);
        assert_eq!(keys(&tree), [1, 3, 4]);
    }
}
