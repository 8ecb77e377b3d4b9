#![forbid(unsafe_code)]

//! `monodev-ctl`: inspection companion for the `dev` orchestrator.
//!
//! Shows the merged route table, module manifests, an architecture check
//! of the workspace layout, and build artifact sizes.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use monodev::analysis::{analyze, BuildReport};
use monodev::routing::loader::{ModuleRouteLoader, RouteLoadingMode};
use monodev::routing::resolver::{ManifestResolver, ModuleResolver};
use monodev::routing::table::RouteTable;
use monodev::store::host::HostStore;
use monodev::{AppError, DevConfig, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "monodev-ctl",
    about = "Inspect a monodev workspace",
    version,
    long_about = None
)]
struct Cli {
    /// Path to the workspace TOML configuration.
    ///
    /// When omitted, `MONODEV_CONFIG` and then `./monodev.toml` are tried
    /// before falling back to the built-in layout.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the merged route table.
    Routes {
        /// Loading strategy; defaults to the configured one.
        #[arg(long, value_enum)]
        mode: Option<RouteLoadingMode>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Print each module's manifest metadata.
    Modules,

    /// Check the workspace layout and module manifests.
    Check,

    /// Report build artifact sizes.
    Analyze {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let args = Cli::parse();
    if let Err(err) = init_tracing(args.log_format) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }

    let config = match &args.config {
        Some(path) => DevConfig::load_from_path(path),
        None => DevConfig::discover(),
    };
    let result = config.and_then(|config| match args.command {
        Command::Routes { mode, json } => {
            print_routes(&config, mode.unwrap_or(config.route_loading), json)
        }
        Command::Modules => {
            print_modules(&config);
            Ok(())
        }
        Command::Check => run_check(&config),
        Command::Analyze { json } => print_analysis(&config, json),
    });

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn build_table(config: &DevConfig, mode: RouteLoadingMode) -> Result<RouteTable> {
    let loader = ModuleRouteLoader::from_config(config);
    match mode {
        RouteLoadingMode::Eager => Ok(loader.load_eager(config.base_routes.clone())),
        RouteLoadingMode::Lazy => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|err| AppError::Io(format!("failed to build tokio runtime: {err}")))?;
            runtime.block_on(async {
                let (table, task) = loader.load_lazy(config.base_routes.clone());
                tracing::info!(routes = table.len(), "router ready with base routes");
                if let Err(err) = task.await {
                    tracing::warn!(%err, "route loading task failed");
                }
                Ok(table.snapshot())
            })
        }
    }
}

fn print_routes(config: &DevConfig, mode: RouteLoadingMode, json: bool) -> Result<()> {
    let table = build_table(config, mode)?;

    if json {
        let text = serde_json::to_string_pretty(table.entries())
            .map_err(|err| AppError::Io(format!("failed to encode routes: {err}")))?;
        println!("{text}");
    } else {
        for entry in table.entries() {
            let module = entry.meta.get("module").map_or("host", String::as_str);
            let lazy = if entry.component.lazy { " (lazy)" } else { "" };
            println!(
                "{:<28} {:<20} {:<10} {}{lazy}",
                entry.path, entry.name, module, entry.component.target
            );
        }
        println!("{} route(s)", table.len());
    }

    table.validate()
}

fn print_modules(config: &DevConfig) {
    let resolvers = ManifestResolver::for_config(config);
    for resolver in &resolvers {
        match resolver.resolve() {
            Ok(manifest) => {
                println!("📦 {} {}", manifest.name, manifest.version);
                if !manifest.description.is_empty() {
                    println!("   {}", manifest.description);
                }
                println!("   routes: {}", manifest.routes.len());
                if !manifest.dependencies.is_empty() {
                    println!("   dependencies: {}", manifest.dependencies.join(", "));
                }
                if !manifest.permissions.is_empty() {
                    println!("   permissions: {}", manifest.permissions.join(", "));
                }
            }
            Err(err) => println!("❌ {}: {err}", resolver.module_name()),
        }
    }

    let store = HostStore::compose(&resolvers);
    println!("store namespaces: {}", store.namespaces().join(", "));
}

fn run_check(config: &DevConfig) -> Result<()> {
    let mut checks: Vec<(String, Result<()>)> = Vec::new();

    let main_dir = config.resolve_path(&config.main.working_directory);
    checks.push((
        format!("{} directory", config.main.name),
        if main_dir.is_dir() {
            Ok(())
        } else {
            Err(AppError::Config(format!("missing {}", main_dir.display())))
        },
    ));

    for module in &config.modules {
        let resolver = ManifestResolver::new(module.name.clone(), config.manifest_path(module));
        let outcome = resolver.resolve().and_then(|manifest| {
            if manifest.routes.is_empty() {
                Err(AppError::ModuleLoad(format!("{} declares no routes", module.name)))
            } else {
                Ok(())
            }
        });
        checks.push((format!("{} manifest", module.name), outcome));
    }

    let table = ModuleRouteLoader::from_config(config).load_eager(config.base_routes.clone());
    checks.push(("route name uniqueness".into(), table.validate()));

    let total = checks.len();
    let mut passed = 0;
    for (name, outcome) in checks {
        match outcome {
            Ok(()) => {
                passed += 1;
                println!("  ✅ {name}");
            }
            Err(err) => println!("  ❌ {name}: {err}"),
        }
    }
    println!("📊 {passed}/{total} checks passed");

    if passed == total {
        Ok(())
    } else {
        Err(AppError::Config(format!("{} check(s) failed", total - passed)))
    }
}

#[allow(clippy::cast_precision_loss)]
fn kib(bytes: u64) -> f64 {
    bytes as f64 / 1024.0
}

fn print_analysis(config: &DevConfig, json: bool) -> Result<()> {
    let report: BuildReport = analyze(&config.root, &config.artifacts);

    if json {
        let text = serde_json::to_string_pretty(&report)
            .map_err(|err| AppError::Io(format!("failed to encode report: {err}")))?;
        println!("{text}");
        return Ok(());
    }

    for artifact in &report.artifacts {
        match artifact.size {
            Some(size) => println!("{}: {:.2} KB", artifact.label, kib(size)),
            None => println!("{}: missing", artifact.label),
        }
    }
    println!("total: {:.2} MB", kib(report.total_bytes) / 1024.0);
    Ok(())
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = fmt().with_env_filter(env_filter).with_writer(std::io::stderr);

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
