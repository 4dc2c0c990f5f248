//! Node memory management
//!
//! Slot arena that backs every tree node. Nodes refer to each other through
//! [`SlotId`] handles, so parent back-references never own anything.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod arena;

pub use arena::*;
