//! Tree operation errors.

/// Errors returned by [`ConcurrentTree`](crate::ConcurrentTree) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Insert refused because the key is already stored.
    #[error("key already present in tree")]
    DuplicateKey,
}
