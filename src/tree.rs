//! Thread-safe ordered map.
//!
//! [`ConcurrentTree`] wraps one [`RbTree`] in a single [`Lock`]. Every
//! operation holds the lock for its full duration, so each one is
//! linearizable and readers never observe a tree mid-rebalance.

use std::borrow::Borrow;
use std::fmt;

use rbkv_rbtree::{Color, InvariantViolation, RbTree};
use rbkv_sync::{BlockingLock, Lock, RawLock};
use tracing::{debug, trace, warn};

use crate::config::{DuplicatePolicy, TreeConfig};
use crate::error::TreeError;

/// Red-black tree shared between threads behind one coarse lock.
///
/// `L` selects the lock: [`BlockingLock`] parks waiting threads,
/// [`SpinLock`](rbkv_sync::SpinLock) busy-waits.
pub struct ConcurrentTree<K, V, L: RawLock = BlockingLock> {
    inner: Lock<L, RbTree<K, V>>,
    config: TreeConfig,
}

static_assertions::assert_impl_all!(ConcurrentTree<String, i64>: Send, Sync);
static_assertions::assert_impl_all!(ConcurrentTree<String, i64, rbkv_sync::SpinLock>: Send, Sync);

impl<K, V, L: RawLock> ConcurrentTree<K, V, L> {
    /// Create an empty tree with the default configuration.
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Create an empty tree.
    pub fn with_config(config: TreeConfig) -> Self {
        debug!(
            initial_capacity = config.initial_capacity,
            duplicate_policy = ?config.duplicate_policy,
            "tree initialized"
        );
        Self {
            inner: Lock::new(RbTree::with_capacity(config.initial_capacity)),
            config,
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Nodes on the longest root-to-leaf path. `0` when empty.
    pub fn height(&self) -> usize {
        self.inner.lock().height()
    }

    /// Color of the root, `None` when empty.
    pub fn root_color(&self) -> Option<Color> {
        self.inner.lock().root_color()
    }

    /// Run `f` against the tree while holding the lock.
    ///
    /// Everything `f` observes belongs to one consistent state.
    pub fn read<R>(&self, f: impl FnOnce(&RbTree<K, V>) -> R) -> R {
        let tree = self.inner.lock();
        f(&tree)
    }

    /// Tear the tree down, returning how many entries were released.
    ///
    /// Taking `self` by value guarantees no other operation is in flight.
    pub fn destroy(self) -> usize {
        let mut tree = self.inner.into_inner();
        let released = tree.clear();
        debug!(released, "tree destroyed");
        released
    }
}

impl<K: Ord, V, L: RawLock> ConcurrentTree<K, V, L> {
    /// Insert `key` with `value`.
    ///
    /// Under [`DuplicatePolicy::Overwrite`] an existing entry has its value
    /// replaced and the old value is returned. Under
    /// [`DuplicatePolicy::Reject`] the tree is left unchanged and
    /// [`TreeError::DuplicateKey`] is returned.
    pub fn insert(&self, key: K, value: V) -> Result<Option<V>, TreeError> {
        let mut tree = self.inner.lock();

        if self.config.duplicate_policy == DuplicatePolicy::Reject && tree.contains_key(&key) {
            warn!(len = tree.len(), "insert rejected: duplicate key");
            return Err(TreeError::DuplicateKey);
        }

        let previous = tree.insert(key, value);
        trace!(len = tree.len(), replaced = previous.is_some(), "insert");
        Ok(previous)
    }

    /// Remove `key`, returning its value. Absent keys are not an error.
    pub fn delete<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut tree = self.inner.lock();
        let removed = tree.remove(key);
        trace!(len = tree.len(), found = removed.is_some(), "delete");
        removed
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.lock().contains_key(key)
    }

    /// Check every red-black and bookkeeping invariant.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        self.inner.lock().validate()
    }
}

impl<K: Ord, V: Clone, L: RawLock> ConcurrentTree<K, V, L> {
    /// Value stored under `key`, cloned out so the lock is not held by the caller.
    pub fn lookup<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let tree = self.inner.lock();
        let value = tree.get(key).cloned();
        trace!(found = value.is_some(), "lookup");
        value
    }
}

impl<K: Clone, V: Clone, L: RawLock> ConcurrentTree<K, V, L> {
    /// Entry with the smallest key.
    pub fn first(&self) -> Option<(K, V)> {
        let tree = self.inner.lock();
        tree.first().map(|(k, v)| (k.clone(), v.clone()))
    }

    /// Entry with the largest key.
    pub fn last(&self) -> Option<(K, V)> {
        let tree = self.inner.lock();
        tree.last().map(|(k, v)| (k.clone(), v.clone()))
    }

    /// All entries in ascending key order, taken under one lock hold.
    pub fn snapshot(&self) -> Vec<(K, V)> {
        let tree = self.inner.lock();
        tree.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl<K, V, L: RawLock> Default for ConcurrentTree<K, V, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, L: RawLock> fmt::Debug for ConcurrentTree<K, V, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentTree")
            .field("len", &self.len())
            .field("config", &self.config)
            .finish()
    }
}
