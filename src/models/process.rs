//! Supervised process handle and lifecycle helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a supervised child process.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Handle registered, spawn in progress.
    Starting,
    /// Process spawned and believed alive.
    Running,
    /// Process exited, failed, or was signalled. Never revived.
    Terminated,
}

/// What a supervised process does for the dev fleet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProcessRole {
    /// The host application's serve command.
    Main,
    /// A module's watch-build command.
    ModuleWatch,
}

/// Supervisor-owned record of one child process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ProcessHandle {
    /// Registration-order identifier, starting at 1.
    pub id: u32,
    /// Human-readable label (application or module name).
    pub label: String,
    /// Role within the fleet.
    pub role: ProcessRole,
    /// Shell command line the process was started with.
    pub command: String,
    /// Current lifecycle state.
    pub state: ProcessState,
    /// OS process identifier once spawned.
    pub pid: Option<u32>,
    /// Registration timestamp.
    pub started_at: DateTime<Utc>,
}

impl ProcessHandle {
    /// Construct a new handle in the `Starting` state.
    #[must_use]
    pub fn new(id: u32, label: String, role: ProcessRole, command: String) -> Self {
        Self {
            id,
            label,
            role,
            command,
            state: ProcessState::Starting,
            pid: None,
            started_at: Utc::now(),
        }
    }

    /// Determine whether a lifecycle transition is permitted.
    #[must_use]
    pub fn can_transition_to(&self, next: ProcessState) -> bool {
        matches!(
            (self.state, next),
            (
                ProcessState::Starting,
                ProcessState::Running | ProcessState::Terminated
            ) | (ProcessState::Running, ProcessState::Terminated)
        )
    }

    /// Apply a transition, returning `false` if it is not permitted.
    pub fn transition_to(&mut self, next: ProcessState) -> bool {
        if self.can_transition_to(next) {
            self.state = next;
            true
        } else {
            false
        }
    }

    /// Whether the handle has reached its final state.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.state == ProcessState::Terminated
    }
}
