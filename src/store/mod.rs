//! Application state shared between the host and its modules.

pub mod host;
pub mod shared;
