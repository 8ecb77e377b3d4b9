//! Domain model module declarations.

pub mod module;
pub mod process;
pub mod route;
