//! Integration tests for the background child exit monitor.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use monodev::models::process::ProcessState;
use monodev::orchestrator::child_monitor::{spawn_child_monitor, POLL_INTERVAL};

use super::test_helpers::{fake_supervisor, test_config, FakeLauncher};

#[tokio::test(start_paused = true)]
async fn monitor_marks_exited_child_terminated() {
    let launcher = FakeLauncher::default();
    let sup = fake_supervisor(&launcher, test_config(&[]));
    sup.lock().await.start_main();

    let cancel = CancellationToken::new();
    let monitor = spawn_child_monitor(sup.clone(), cancel.clone());

    launcher.mark_exited("host");
    tokio::time::sleep(POLL_INTERVAL + Duration::from_millis(100)).await;

    let handles = sup.lock().await.handles();
    assert_eq!(handles[0].state, ProcessState::Terminated);

    cancel.cancel();
    monitor.await.expect("monitor stops cleanly");
}

#[tokio::test(start_paused = true)]
async fn monitor_leaves_running_children_alone() {
    let launcher = FakeLauncher::default();
    let sup = fake_supervisor(&launcher, test_config(&[]));
    sup.lock().await.start_main();

    let cancel = CancellationToken::new();
    let monitor = spawn_child_monitor(sup.clone(), cancel.clone());
    tokio::time::sleep(POLL_INTERVAL * 3).await;

    assert_eq!(sup.lock().await.live_count(), 1);

    cancel.cancel();
    monitor.await.expect("monitor stops cleanly");
}

#[tokio::test]
async fn monitor_stops_on_cancel() {
    let launcher = FakeLauncher::default();
    let sup = fake_supervisor(&launcher, test_config(&[]));

    let cancel = CancellationToken::new();
    let monitor = spawn_child_monitor(sup, cancel.clone());
    cancel.cancel();

    tokio::time::timeout(Duration::from_secs(5), monitor)
        .await
        .expect("monitor exits promptly")
        .expect("monitor task does not panic");
}
