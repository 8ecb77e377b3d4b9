#![forbid(unsafe_code)]

//! `dev` starts the host application dev server and the selected module
//! watch-builders, and stops them all on Ctrl+C.
//!
//! Usage: `dev [--main-only] [--help|-h] [module...]`. Log output format is
//! chosen with `MONODEV_LOG_FORMAT` (`text` or `json`).

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use monodev::cli::{resolve_args, usage, wants_help, ArgsOutcome};
use monodev::orchestrator::dev;
use monodev::orchestrator::spawner::ShellLauncher;
use monodev::orchestrator::supervisor::ProcessSupervisor;
use monodev::{AppError, DevConfig, Result};

/// Environment variable selecting the log format.
const LOG_FORMAT_ENV_VAR: &str = "MONODEV_LOG_FORMAT";

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV_VAR).as_deref() {
            Ok("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

fn main() {
    let code = match bootstrap() {
        Ok(code) => code,
        Err(err) => {
            error!(%err, "❌ failed to start dev environment");
            eprintln!("❌ failed to start dev environment: {err}");
            1
        }
    };
    std::process::exit(code);
}

fn bootstrap() -> Result<i32> {
    init_tracing(LogFormat::from_env())?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match DevConfig::discover() {
        Ok(config) => config,
        Err(err) if wants_help(&args) => {
            warn!(%err, "workspace config unavailable; listing built-in modules");
            DevConfig::default()
        }
        Err(err) => return Err(err),
    };
    let known = config.module_names();
    let options = match resolve_args(&args, &known) {
        ArgsOutcome::Help => {
            print!("{}", usage(&known));
            return Ok(0);
        }
        ArgsOutcome::Run(options) => options,
    };

    println!("🔧 starting dev environment...");
    info!(?options, "dev options resolved");

    let config = Arc::new(config);
    let supervisor =
        ProcessSupervisor::new(Arc::new(ShellLauncher), Arc::clone(&config)).into_shared();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Orchestration(format!("failed to build tokio runtime: {err}")))?;

    let exit = runtime.block_on(async {
        if let Some(url) = &config.main.url {
            println!("📱 host application: {url}");
        }
        println!("press Ctrl+C to stop all services");
        dev::run(supervisor, &options, shutdown_signal()).await
    });

    // Children are signalled, not awaited; do not let runtime teardown block on them.
    runtime.shutdown_background();
    Ok(exit.code())
}

/// Resolves once the operator asks the fleet to stop.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(err), _) | (_, Err(err)) => {
                    warn!(%err, "failed to register signal handlers, using ctrl-c only");
                    if let Err(err) = tokio::signal::ctrl_c().await {
                        error!(%err, "ctrl-c signal handler failed");
                    }
                    info!(signal = "ctrl-c", "shutdown signal received");
                    return;
                }
            };

        let source = tokio::select! {
            _ = sigint.recv() => "SIGINT",
            _ = sigterm.recv() => "SIGTERM",
        };
        info!(signal = source, "shutdown signal received");
    }

    #[cfg(not(unix))]
    {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!(signal = "ctrl-c", "shutdown signal received"),
            Err(err) => error!(%err, "ctrl-c signal handler failed"),
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
