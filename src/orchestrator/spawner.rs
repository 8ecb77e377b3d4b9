//! Child process launching.
//!
//! The supervisor never touches `tokio::process` directly: it goes through
//! [`ProcessLauncher`] and [`ChildProcess`] so the dev fleet can be driven
//! by fakes in tests. [`ShellLauncher`] is the real implementation; it runs
//! each command through the platform shell with inherited stdout and stderr
//! so the children's output passes through unmodified.
//!
//! On Unix every child leads its own process group and is interrupted with
//! `killpg`, so the signal reaches the real command and not only the shell
//! wrapping it. Stdin is closed: a background process group that reads the
//! terminal would be stopped by `SIGTTIN`.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::info;

use crate::{AppError, Result};

/// Everything needed to start one long-running command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Label for logs (application or module name).
    pub label: String,
    /// Shell command line.
    pub command: String,
    /// Directory the command runs in.
    pub working_directory: PathBuf,
    /// Extra environment variables.
    pub env: BTreeMap<String, String>,
}

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitInfo {
    /// Exit code, or `None` when terminated by a signal.
    pub code: Option<i32>,
}

impl ExitInfo {
    /// Human-readable description of the exit.
    #[must_use]
    pub fn describe(&self) -> String {
        self.code.map_or_else(
            || "terminated by signal".to_owned(),
            |c| format!("exited with code {c}"),
        )
    }
}

/// A spawned child the supervisor can signal and poll.
pub trait ChildProcess: Send + Debug {
    /// OS process identifier, if still known.
    fn pid(&self) -> Option<u32>;

    /// Ask the process to stop (SIGINT on Unix). Does not wait for exit.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Signal` if the signal cannot be delivered.
    fn interrupt(&mut self) -> Result<()>;

    /// Non-blocking exit check.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the status cannot be queried.
    fn try_exit(&mut self) -> Result<Option<ExitInfo>>;
}

/// Starts child processes from a [`CommandSpec`].
pub trait ProcessLauncher: Send + Sync {
    /// Spawn the command.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Spawn` if the process cannot be started.
    fn launch(&self, spec: &CommandSpec) -> Result<Box<dyn ChildProcess>>;
}

/// Runs commands through `sh -c` (or `cmd /C` on Windows).
///
/// Must be used from within a Tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellLauncher;

fn shell_command(command_line: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command_line);
        cmd
    }

    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command_line);
        cmd
    }
}

impl ProcessLauncher for ShellLauncher {
    fn launch(&self, spec: &CommandSpec) -> Result<Box<dyn ChildProcess>> {
        if !spec.working_directory.is_dir() {
            return Err(AppError::Spawn(format!(
                "working directory {} does not exist",
                spec.working_directory.display()
            )));
        }

        let mut cmd = shell_command(&spec.command);
        cmd.envs(&spec.env)
            .current_dir(&spec.working_directory)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd.spawn().map_err(|err| {
            AppError::Spawn(format!("failed to spawn `{}`: {err}", spec.command))
        })?;

        info!(
            label = spec.label,
            pid = child.id().unwrap_or(0),
            command = spec.command,
            "process spawned"
        );

        Ok(Box::new(ShellChild { child }))
    }
}

/// Real child process behind [`ShellLauncher`].
#[derive(Debug)]
struct ShellChild {
    child: Child,
}

impl ChildProcess for ShellChild {
    fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    #[cfg(unix)]
    fn interrupt(&mut self) -> Result<()> {
        use nix::sys::signal::{self, Signal};
        use nix::unistd::Pid;

        let Some(pid) = self.child.id() else {
            tracing::debug!("child already reaped; nothing to signal");
            return Ok(());
        };
        let raw = i32::try_from(pid)
            .map_err(|_| AppError::Signal(format!("pid {pid} out of range")))?;
        // The child's pid is also its process group id.
        signal::killpg(Pid::from_raw(raw), Signal::SIGINT).map_err(|err| {
            AppError::Signal(format!("failed to send SIGINT to process group {pid}: {err}"))
        })
    }

    #[cfg(not(unix))]
    fn interrupt(&mut self) -> Result<()> {
        self.child
            .start_kill()
            .map_err(|err| AppError::Signal(format!("failed to kill child: {err}")))
    }

    fn try_exit(&mut self) -> Result<Option<ExitInfo>> {
        let status = self.child.try_wait()?;
        Ok(status.map(|s| ExitInfo { code: s.code() }))
    }
}
