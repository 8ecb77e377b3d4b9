//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// A child process could not be spawned (command missing or not permitted).
    Spawn(String),
    /// A termination signal could not be delivered to a child process.
    Signal(String),
    /// A module's contribution (routes, store slice, metadata) failed to resolve.
    ModuleLoad(String),
    /// Two route entries share the same name within one table.
    DuplicateRoute(String),
    /// Process-wide shared state used outside its lifecycle.
    Store(String),
    /// Failure in the orchestration control path itself.
    Orchestration(String),
    /// File-system or I/O operation failure.
    Io(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Spawn(msg) => write!(f, "spawn: {msg}"),
            Self::Signal(msg) => write!(f, "signal: {msg}"),
            Self::ModuleLoad(msg) => write!(f, "module load: {msg}"),
            Self::DuplicateRoute(msg) => write!(f, "duplicate route: {msg}"),
            Self::Store(msg) => write!(f, "store: {msg}"),
            Self::Orchestration(msg) => write!(f, "orchestration: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
