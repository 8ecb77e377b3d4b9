//! Process supervisor for the dev fleet.
//!
//! Owns every child it starts, in registration order. Handles move
//! `Starting → Running → Terminated` and never come back. Spawn failures
//! are logged and leave no live handle behind; they never stop the rest
//! of the fleet from starting.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, info_span, warn};

use crate::config::{DevConfig, MainAppConfig, ModuleDescriptor};
use crate::models::process::{ProcessHandle, ProcessRole, ProcessState};
use crate::orchestrator::spawner::{ChildProcess, CommandSpec, ExitInfo, ProcessLauncher};

/// Supervisor shared between the startup sequence, exit monitor, and
/// signal handling.
pub type SharedSupervisor = Arc<Mutex<ProcessSupervisor>>;

#[derive(Debug)]
struct Tracked {
    handle: ProcessHandle,
    child: Option<Box<dyn ChildProcess>>,
}

/// Outcome of one [`ProcessSupervisor::shutdown_all`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Handles moved to `Terminated` by this call.
    pub stopped: Vec<u32>,
    /// Handles whose signal could not be delivered (still marked `Terminated`).
    pub signal_failures: Vec<u32>,
}

/// Registry of supervised child processes.
pub struct ProcessSupervisor {
    launcher: Arc<dyn ProcessLauncher>,
    config: Arc<DevConfig>,
    processes: Vec<Tracked>,
    next_id: u32,
}

impl std::fmt::Debug for ProcessSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessSupervisor")
            .field("processes", &self.processes)
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl ProcessSupervisor {
    /// Create an empty supervisor.
    #[must_use]
    pub fn new(launcher: Arc<dyn ProcessLauncher>, config: Arc<DevConfig>) -> Self {
        Self {
            launcher,
            config,
            processes: Vec::new(),
            next_id: 1,
        }
    }

    /// Wrap in the shared form used by the run loop.
    #[must_use]
    pub fn into_shared(self) -> SharedSupervisor {
        Arc::new(Mutex::new(self))
    }

    /// Spawn the host application's serve command.
    ///
    /// Returns the handle id, or `None` if the spawn failed.
    pub fn start_main(&mut self) -> Option<u32> {
        let MainAppConfig {
            name,
            command,
            working_directory,
            ..
        } = &self.config.main;
        let spec = CommandSpec {
            label: name.clone(),
            command: command.clone(),
            working_directory: self.config.resolve_path(working_directory),
            env: self.child_env(),
        };
        self.start(spec, ProcessRole::Main)
    }

    /// Spawn a module's watch-build command in its working directory.
    ///
    /// Returns the handle id, or `None` if the spawn failed.
    pub fn start_module_watch(&mut self, descriptor: &ModuleDescriptor) -> Option<u32> {
        let spec = CommandSpec {
            label: descriptor.name.clone(),
            command: descriptor.watch_command.clone(),
            working_directory: self.config.resolve_path(&descriptor.working_directory),
            env: self.child_env(),
        };
        self.start(spec, ProcessRole::ModuleWatch)
    }

    fn child_env(&self) -> BTreeMap<String, String> {
        self.config.env.clone()
    }

    fn start(&mut self, spec: CommandSpec, role: ProcessRole) -> Option<u32> {
        let span = info_span!("start_process", label = spec.label);
        let _guard = span.enter();

        let id = self.next_id;
        let mut handle = ProcessHandle::new(id, spec.label.clone(), role, spec.command.clone());

        match self.launcher.launch(&spec) {
            Ok(child) => {
                handle.pid = child.pid();
                handle.transition_to(ProcessState::Running);
                info!(process_id = id, pid = handle.pid.unwrap_or(0), "✅ {} started", spec.label);
                self.next_id += 1;
                self.processes.push(Tracked {
                    handle,
                    child: Some(child),
                });
                Some(id)
            }
            Err(err) => {
                error!(%err, command = spec.command, "❌ {} failed to start", spec.label);
                None
            }
        }
    }

    /// Signal every handle that is not yet `Terminated`, in registration
    /// order, and mark it `Terminated`.
    ///
    /// Idempotent: a second call finds nothing left to signal. Does not wait
    /// for the children to actually exit.
    pub fn shutdown_all(&mut self) -> ShutdownReport {
        let span = info_span!("shutdown_all");
        let _guard = span.enter();

        let mut report = ShutdownReport::default();
        for tracked in &mut self.processes {
            if tracked.handle.is_terminated() {
                continue;
            }

            let id = tracked.handle.id;
            if let Some(child) = tracked.child.as_mut() {
                if let Err(err) = child.interrupt() {
                    warn!(process_id = id, %err, "failed to signal process");
                    report.signal_failures.push(id);
                }
            }
            tracked.handle.transition_to(ProcessState::Terminated);
            info!(process_id = id, label = tracked.handle.label, "process {id} stopped");
            report.stopped.push(id);
        }
        report
    }

    /// Mark handles whose process exited on its own as `Terminated`.
    ///
    /// Returns the ids that changed state during this poll.
    pub fn poll_exits(&mut self) -> Vec<u32> {
        let mut exited = Vec::new();
        for tracked in &mut self.processes {
            if tracked.handle.is_terminated() {
                continue;
            }
            let Some(child) = tracked.child.as_mut() else {
                continue;
            };

            let outcome: Option<Option<ExitInfo>> = match child.try_exit() {
                Ok(Some(info)) => Some(Some(info)),
                Ok(None) => None,
                Err(err) => {
                    warn!(process_id = tracked.handle.id, %err, "failed to poll process status");
                    Some(None)
                }
            };

            if let Some(info) = outcome {
                let status = info.map_or_else(|| "status unknown".to_owned(), |i| i.describe());
                warn!(
                    process_id = tracked.handle.id,
                    label = tracked.handle.label,
                    status = %status,
                    "supervised process exited"
                );
                tracked.handle.transition_to(ProcessState::Terminated);
                exited.push(tracked.handle.id);
            }
        }
        exited
    }

    /// Snapshot of all registered handles in registration order.
    #[must_use]
    pub fn handles(&self) -> Vec<ProcessHandle> {
        self.processes.iter().map(|t| t.handle.clone()).collect()
    }

    /// Number of handles not yet `Terminated`.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.processes
            .iter()
            .filter(|t| !t.handle.is_terminated())
            .count()
    }

    /// Workspace configuration the supervisor was built with.
    #[must_use]
    pub fn config(&self) -> &DevConfig {
        &self.config
    }
}
