//! Tree node record

use rbkv_mm::SlotId;

/// Arena handle of a node.
pub(crate) type NodeId = SlotId;

/// Red-Black tree node color
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// One key/value pair plus its links.
///
/// `left` and `right` own their subtrees. `parent` is a back-reference used
/// for upward traversal only; it never decides when a node is freed.
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl<K, V> Node<K, V> {
    /// Fresh red leaf hanging off `parent`.
    pub(crate) fn new(key: K, value: V, parent: Option<NodeId>) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            left: None,
            right: None,
            parent,
        }
    }

    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}
