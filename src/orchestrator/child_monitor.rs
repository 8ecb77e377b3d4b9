//! Child process monitor: detects fleet processes that exit on their own.
//!
//! Periodically polls the supervisor so handles of processes that died
//! (crashed watcher, dev server that could not bind its port) are marked
//! `Terminated` and skipped by the shutdown fan-out.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::orchestrator::supervisor::SharedSupervisor;

/// Interval between polls for child process exits.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Spawn a background task that polls the supervisor for exited children.
///
/// The task polls at [`POLL_INTERVAL`] until the `CancellationToken` fires.
#[must_use]
pub fn spawn_child_monitor(
    supervisor: SharedSupervisor,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!("child process monitor shutting down");
                    break;
                }
                () = tokio::time::sleep(POLL_INTERVAL) => {}
            }

            let exited = supervisor.lock().await.poll_exits();
            if !exited.is_empty() {
                info!(count = exited.len(), "marked exited processes terminated");
            }
        }
    })
}
