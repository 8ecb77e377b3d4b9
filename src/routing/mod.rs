//! Host route composition.
//!
//! Merges the host's base routes with the contributions of every feature
//! module, under an explicitly chosen [`loader::RouteLoadingMode`].

pub mod loader;
pub mod resolver;
pub mod table;
