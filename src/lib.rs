#![forbid(unsafe_code)]

//! `monodev`: development orchestrator and module route composition for
//! modular front-end workspaces.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod routing;
pub mod store;

pub use config::DevConfig;
pub use errors::{AppError, Result};
