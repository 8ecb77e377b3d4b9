//! Dev fleet orchestration modules.
//!
//! Covers child process launching, supervision and shutdown fan-out,
//! exit monitoring, and the staggered startup sequence.

pub mod child_monitor;
pub mod dev;
pub mod spawner;
pub mod supervisor;
