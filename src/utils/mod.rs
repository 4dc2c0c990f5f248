//! Process-level helpers shared by binaries and test harnesses.

pub mod bootstrap;
