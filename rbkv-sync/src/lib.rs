//! Mutual-exclusion primitives
//!
//! [`RawLock`] is the seam between a lock algorithm and the data it guards.
//! [`Lock`] pairs a raw lock with a value and hands out RAII guards, so a lock
//! can never be left held on an early return.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod lock;
pub mod spinlock;

#[cfg(feature = "std")]
pub mod blocking;

pub use lock::*;
pub use spinlock::*;

#[cfg(feature = "std")]
pub use blocking::*;
