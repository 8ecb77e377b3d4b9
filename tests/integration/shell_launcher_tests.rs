//! Integration tests for `ShellLauncher` against real child processes.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use monodev::config::{DevConfig, MainAppConfig, ModuleDescriptor};
use monodev::models::process::ProcessState;
use monodev::orchestrator::spawner::{
    ChildProcess, CommandSpec, ExitInfo, ProcessLauncher, ShellLauncher,
};
use monodev::orchestrator::supervisor::ProcessSupervisor;

fn spec(command: &str, dir: &Path) -> CommandSpec {
    CommandSpec {
        label: "host".into(),
        command: command.into(),
        working_directory: dir.to_path_buf(),
        env: BTreeMap::new(),
    }
}

fn config_for(root: &Path, command: &str, working_directory: &str) -> DevConfig {
    DevConfig {
        root: root.to_path_buf(),
        main: MainAppConfig {
            name: "host".into(),
            command: command.into(),
            working_directory: working_directory.into(),
            url: None,
        },
        modules: Vec::new(),
        ..DevConfig::default()
    }
}

async fn wait_for_exit(child: &mut dyn ChildProcess, within: Duration) -> Option<ExitInfo> {
    let deadline = tokio::time::Instant::now() + within;
    while tokio::time::Instant::now() < deadline {
        if let Some(info) = child.try_exit().expect("status query succeeds") {
            return Some(info);
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    None
}

#[tokio::test]
async fn missing_working_directory_is_spawn_failure() {
    let dir = tempfile::tempdir().expect("tempdir");

    let err = ShellLauncher
        .launch(&spec("true", &dir.path().join("missing")))
        .expect_err("missing directory must fail");

    assert!(err.to_string().starts_with("spawn:"), "{err}");
}

#[tokio::test]
async fn missing_working_directory_registers_no_handle() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_for(dir.path(), "sleep 30", "projects/absent");
    let mut sup = ProcessSupervisor::new(Arc::new(ShellLauncher), Arc::new(config));

    assert!(sup.start_main().is_none());
    assert!(sup.handles().is_empty());
}

#[tokio::test]
async fn exit_code_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut child = ShellLauncher
        .launch(&spec("exit 3", dir.path()))
        .expect("spawn succeeds");

    let info = wait_for_exit(child.as_mut(), Duration::from_secs(5))
        .await
        .expect("child exits");

    assert_eq!(info.code, Some(3));
}

#[tokio::test]
async fn command_runs_in_working_directory_with_env() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut spec = spec("printf '%s' \"$BASE_URL\" > seen.txt", dir.path());
    spec.env.insert("BASE_URL".into(), "/app/".into());

    let mut child = ShellLauncher.launch(&spec).expect("spawn succeeds");
    wait_for_exit(child.as_mut(), Duration::from_secs(5))
        .await
        .expect("child exits");

    let seen = std::fs::read_to_string(dir.path().join("seen.txt")).expect("output written");
    assert_eq!(seen, "/app/");
}

#[tokio::test]
async fn supervisor_detects_self_exited_process() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_for(dir.path(), "exit 0", ".");
    let mut sup = ProcessSupervisor::new(Arc::new(ShellLauncher), Arc::new(config));
    let id = sup.start_main().expect("spawn succeeds");

    let mut exited = Vec::new();
    for _ in 0..200 {
        exited = sup.poll_exits();
        if !exited.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }

    assert_eq!(exited, [id]);
    assert_eq!(sup.handles()[0].state, ProcessState::Terminated);
    assert!(sup.shutdown_all().stopped.is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn interrupt_reaches_command_behind_shell() {
    let dir = tempfile::tempdir().expect("tempdir");

    for command in ["sleep 30", "sleep 30; true", "true && sleep 30"] {
        let mut child = ShellLauncher
            .launch(&spec(command, dir.path()))
            .expect("spawn succeeds");

        child.interrupt().expect("signal delivered");

        let exited = wait_for_exit(child.as_mut(), Duration::from_secs(5)).await;
        assert!(exited.is_some(), "`{command}` still running after SIGINT");
    }
}

#[cfg(unix)]
#[tokio::test]
async fn shutdown_all_signals_real_fleet() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = config_for(dir.path(), "sleep 30", ".");
    config.modules = vec![ModuleDescriptor::new("module-a", "sleep 30; echo rebuilt", ".")];
    let descriptor = config.modules[0].clone();
    let mut sup = ProcessSupervisor::new(Arc::new(ShellLauncher), Arc::new(config));
    sup.start_main().expect("main spawns");
    sup.start_module_watch(&descriptor).expect("watcher spawns");

    let report = sup.shutdown_all();

    assert_eq!(report.stopped, [1, 2]);
    assert!(report.signal_failures.is_empty());
    assert_eq!(sup.live_count(), 0);
}
