//! Rotations and subtree replacement
//!
//! None of these touch colors; the fixup passes recolor around them.

use crate::node::NodeId;
use crate::RbTree;

impl<K, V> RbTree<K, V> {
    /// Point whatever referenced `old` (the root slot or a child link of
    /// `parent`) at `new`.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(parent) if self.nodes[parent].left == Some(old) => self.nodes[parent].left = new,
            Some(parent) => self.nodes[parent].right = new,
        }
    }

    /// Put the subtree rooted at `new` where `old` was.
    ///
    /// `old` keeps its own links; the caller frees or re-links it.
    pub(crate) fn transplant(&mut self, old: NodeId, new: Option<NodeId>) {
        let parent = self.nodes[old].parent;
        self.replace_child(parent, old, new);
        if let Some(new) = new {
            self.nodes[new].parent = parent;
        }
    }

    /// Rotate left: `x`'s right child takes its place and `x` becomes its left child.
    pub(crate) fn rotate_left(&mut self, x: NodeId) {
        let Some(y) = self.nodes[x].right else {
            unreachable!("rotate_left without a right child");
        };
        let x_parent = self.nodes[x].parent;

        let y_left = self.nodes[y].left;
        self.nodes[x].right = y_left;
        if let Some(y_left) = y_left {
            self.nodes[y_left].parent = Some(x);
        }

        self.nodes[y].parent = x_parent;
        self.replace_child(x_parent, x, Some(y));

        self.nodes[y].left = Some(x);
        self.nodes[x].parent = Some(y);
    }

    /// Rotate right: `x`'s left child takes its place and `x` becomes its right child.
    pub(crate) fn rotate_right(&mut self, x: NodeId) {
        let Some(y) = self.nodes[x].left else {
            unreachable!("rotate_right without a left child");
        };
        let x_parent = self.nodes[x].parent;

        let y_right = self.nodes[y].right;
        self.nodes[x].left = y_right;
        if let Some(y_right) = y_right {
            self.nodes[y_right].parent = Some(x);
        }

        self.nodes[y].parent = x_parent;
        self.replace_child(x_parent, x, Some(y));

        self.nodes[y].right = Some(x);
        self.nodes[x].parent = Some(y);
    }
}

#[cfg(test)]
mod tests {
    use crate::{Color, RbTree};

    /// Keys in order, plus a parent-link check on every node.
    fn in_order(tree: &RbTree<u32, ()>) -> Vec<u32> {
        let mut stack = Vec::new();
        stack.extend(tree.root);
        while let Some(id) = stack.pop() {
            let node = &tree.nodes[id];
            for child in [node.left, node.right].into_iter().flatten() {
                assert_eq!(tree.nodes[child].parent, Some(id));
                stack.push(child);
            }
        }
        tree.iter().map(|(k, _)| *k).collect()
    }

    fn balanced() -> RbTree<u32, ()> {
        let mut tree = RbTree::new();
        for key in [4, 2, 6, 1, 3, 5, 7] {
            tree.insert(key, ());
        }
        tree
    }

    #[test]
    fn test_rotate_left_at_root() {
        let mut tree = balanced();
        let root = tree.root.unwrap();
        let right = tree.nodes[root].right.unwrap();
        let colors: Vec<Color> = [root, right].iter().map(|&id| tree.nodes[id].color).collect();

        tree.rotate_left(root);

        assert_eq!(tree.root, Some(right));
        assert_eq!(tree.nodes[right].parent, None);
        assert_eq!(tree.nodes[right].left, Some(root));
        assert_eq!(tree.nodes[tree.nodes[root].right.unwrap()].key, 5);
        assert_eq!(in_order(&tree), (1..=7).collect::<Vec<_>>());
        assert_eq!(tree.nodes[root].color, colors[0]);
        assert_eq!(tree.nodes[right].color, colors[1]);
    }

    #[test]
    fn test_rotate_right_at_root() {
        let mut tree = balanced();
        let root = tree.root.unwrap();
        let left = tree.nodes[root].left.unwrap();

        tree.rotate_right(root);

        assert_eq!(tree.root, Some(left));
        assert_eq!(tree.nodes[left].right, Some(root));
        assert_eq!(tree.nodes[tree.nodes[root].left.unwrap()].key, 3);
        assert_eq!(in_order(&tree), (1..=7).collect::<Vec<_>>());
    }

    #[test]
    fn test_rotate_below_root_relinks_parent_once() {
        let mut tree = balanced();
        let root = tree.root.unwrap();
        let left = tree.nodes[root].left.unwrap();
        let left_right = tree.nodes[left].right.unwrap();

        tree.rotate_left(left);

        assert_eq!(tree.root, Some(root));
        assert_eq!(tree.nodes[root].left, Some(left_right));
        assert_eq!(tree.nodes[left_right].parent, Some(root));
        assert_eq!(tree.nodes[left_right].left, Some(left));
        assert_eq!(tree.nodes[root].right.map(|id| tree.nodes[id].key), Some(6));
        assert_eq!(in_order(&tree), (1..=7).collect::<Vec<_>>());
    }

    #[test]
    fn test_rotations_are_inverse() {
        let mut tree = balanced();
        let root = tree.root.unwrap();
        tree.rotate_left(root);
        tree.rotate_right(tree.root.unwrap());

        assert_eq!(tree.root, Some(root));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_transplant_to_empty() {
        let mut tree = balanced();
        let root = tree.root.unwrap();
        let left = tree.nodes[root].left.unwrap();
        let leaf = tree.nodes[left].left.unwrap();

        tree.transplant(leaf, None);

        assert_eq!(tree.nodes[left].left, None);
    }
}
