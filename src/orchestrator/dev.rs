//! Dev fleet startup sequence and run loop.
//!
//! The host serve command starts first. Module watchers follow after
//! `main_delay`, each one trailed by `module_delay`, so the dev server has
//! bound its port before watchers start writing into the shared output
//! directory. Start order follows module registration order, not the order
//! the modules were named on the command line.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, warn, Instrument};

use crate::cli::DevOptions;
use crate::orchestrator::child_monitor::spawn_child_monitor;
use crate::orchestrator::supervisor::SharedSupervisor;
use crate::{AppError, Result};

/// Handles produced by one startup sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupSummary {
    /// Handle id of the host serve process, if it spawned.
    pub main: Option<u32>,
    /// Each requested module with its handle id, if it spawned.
    pub modules: Vec<(String, Option<u32>)>,
}

impl StartupSummary {
    /// Names of module watchers that spawned successfully.
    #[must_use]
    pub fn started_modules(&self) -> Vec<&str> {
        self.modules
            .iter()
            .filter(|(_, id)| id.is_some())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// How the orchestrator run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevExit {
    /// Interrupted by the operator; exit code 0.
    Interrupted,
    /// Unrecoverable orchestration failure; exit code 1.
    Failed,
}

impl DevExit {
    /// Process exit code for this outcome.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Interrupted => 0,
            Self::Failed => 1,
        }
    }
}

/// Start the fleet with the configured stagger.
///
/// Individual spawn failures are recorded in the summary and do not stop
/// the sequence.
///
/// # Errors
///
/// Returns `AppError::Orchestration` if a selected module has no
/// descriptor in the configuration.
pub async fn start_fleet(
    supervisor: &SharedSupervisor,
    options: &DevOptions,
) -> Result<StartupSummary> {
    let (main_delay, module_delay, descriptors) = {
        let guard = supervisor.lock().await;
        let config = guard.config();

        if options.main_only && !options.selected_modules.is_empty() {
            warn!(
                modules = ?options.selected_modules,
                "--main-only given; ignoring selected modules"
            );
        }

        let names = config.module_names();
        let to_start = options.modules_to_start(&names);
        for selected in &options.selected_modules {
            if !names.contains(&selected.as_str()) {
                return Err(AppError::Orchestration(format!(
                    "selected module {selected} is not configured"
                )));
            }
        }

        let descriptors = to_start
            .into_iter()
            .filter_map(|name| config.module(name).cloned())
            .collect::<Vec<_>>();
        (config.main_delay(), config.module_delay(), descriptors)
    };

    let mut summary = StartupSummary {
        main: supervisor.lock().await.start_main(),
        modules: Vec::with_capacity(descriptors.len()),
    };

    if descriptors.is_empty() {
        return Ok(summary);
    }

    tokio::time::sleep(main_delay).await;

    for descriptor in descriptors {
        info!(module = descriptor.name, "👀 starting watch build");
        let id = supervisor.lock().await.start_module_watch(&descriptor);
        summary.modules.push((descriptor.name, id));
        tokio::time::sleep(module_delay).await;
    }

    Ok(summary)
}

/// Drive one orchestrator session: start the fleet, wait for `shutdown`,
/// then fan the termination signal out to every live child.
///
/// A shutdown that arrives mid-startup abandons the remaining starts.
pub async fn run<F>(supervisor: SharedSupervisor, options: &DevOptions, shutdown: F) -> DevExit
where
    F: Future<Output = ()>,
{
    let fleet = supervisor.clone();
    let startup = async move { start_fleet(&fleet, options).await };
    supervise(supervisor, startup, shutdown).await
}

/// Run an arbitrary startup sequence under the exit monitor and the
/// shutdown fan-out.
///
/// A startup error stops every process the sequence already started and
/// yields [`DevExit::Failed`].
pub async fn supervise<S, F>(supervisor: SharedSupervisor, startup: S, shutdown: F) -> DevExit
where
    S: Future<Output = Result<StartupSummary>>,
    F: Future<Output = ()>,
{
    let cancel = CancellationToken::new();
    let monitor = spawn_child_monitor(supervisor.clone(), cancel.clone());
    tokio::pin!(shutdown);

    let startup = startup.instrument(info_span!("startup"));
    let outcome = tokio::select! {
        result = startup => Some(result),
        () = &mut shutdown => None,
    };

    let exit = match outcome {
        Some(Ok(summary)) => {
            announce_ready(&supervisor, &summary).await;
            shutdown.as_mut().await;
            DevExit::Interrupted
        }
        Some(Err(err)) => {
            error!(%err, "❌ failed to start dev environment");
            DevExit::Failed
        }
        None => {
            warn!("interrupted during startup");
            DevExit::Interrupted
        }
    };

    info!("🛑 stopping dev environment");
    let report = supervisor.lock().await.shutdown_all();
    info!(stopped = report.stopped.len(), "👋 dev environment stopped");

    cancel.cancel();
    if let Err(err) = monitor.await {
        warn!(%err, "child monitor task failed");
    }

    exit
}

async fn announce_ready(supervisor: &SharedSupervisor, summary: &StartupSummary) {
    let guard = supervisor.lock().await;
    let url = guard.config().main.url.clone().unwrap_or_default();
    info!(
        main = summary.main.is_some(),
        watchers = ?summary.started_modules(),
        url,
        "✅ dev environment ready; press Ctrl+C to stop"
    );
}
