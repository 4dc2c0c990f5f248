//! rbkv - concurrent ordered key/value store
//!
//! An in-memory map from totally ordered keys to values, kept as a
//! red-black tree and shared between threads behind one coarse lock.
//!
//! ```
//! use rbkv::ConcurrentTree;
//!
//! let tree: ConcurrentTree<String, u32> = ConcurrentTree::new();
//! tree.insert("b".to_string(), 2).unwrap();
//! tree.insert("a".to_string(), 1).unwrap();
//! assert_eq!(tree.lookup("a"), Some(1));
//! assert_eq!(tree.delete("b"), Some(2));
//! assert_eq!(tree.destroy(), 1);
//! ```

pub mod config;
pub mod error;
pub mod tree;
pub mod utils;

pub use config::{ConfigError, DuplicatePolicy, TreeConfig};
pub use error::TreeError;
pub use tree::ConcurrentTree;

pub use rbkv_rbtree::{Color, InvariantViolation, RbTree};
pub use rbkv_sync::{BlockingLock, RawLock, SpinLock};
