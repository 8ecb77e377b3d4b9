//! Workspace configuration parsing, discovery, and validation.

use std::collections::{BTreeMap, HashSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::analysis::ArtifactSpec;
use crate::models::route::{ComponentRef, RouteEntry};
use crate::routing::loader::RouteLoadingMode;
use crate::{AppError, Result};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "MONODEV_CONFIG";

/// File name looked up in the current directory when no override is set.
pub const DEFAULT_CONFIG_FILE: &str = "monodev.toml";

/// Host application serve settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct MainAppConfig {
    /// Label used in logs and status lines.
    #[serde(default = "default_main_name")]
    pub name: String,
    /// Long-running serve command, run through the platform shell.
    pub command: String,
    /// Directory the serve command runs in, relative to `root`.
    pub working_directory: PathBuf,
    /// Address announced once the fleet is up.
    #[serde(default)]
    pub url: Option<String>,
}

/// Immutable description of one feature module.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ModuleDescriptor {
    /// Module name; also the CLI token that selects it.
    pub name: String,
    /// Long-running watch-build command, run through the platform shell.
    pub watch_command: String,
    /// Directory the watch command runs in, relative to `root`.
    pub working_directory: PathBuf,
    /// Manifest file, relative to `working_directory`.
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
}

impl ModuleDescriptor {
    /// Construct a descriptor with the default manifest file name.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        watch_command: impl Into<String>,
        working_directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            watch_command: watch_command.into(),
            working_directory: working_directory.into(),
            manifest: default_manifest(),
        }
    }
}

/// Stagger between process starts.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct StartupConfig {
    /// Delay after the main start before the first module watcher.
    #[serde(default = "default_main_delay_ms")]
    pub main_delay_ms: u64,
    /// Delay after each module watcher start.
    #[serde(default = "default_module_delay_ms")]
    pub module_delay_ms: u64,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            main_delay_ms: default_main_delay_ms(),
            module_delay_ms: default_module_delay_ms(),
        }
    }
}

fn default_main_name() -> String {
    "vue2-app".into()
}

fn default_manifest() -> PathBuf {
    PathBuf::from("module.toml")
}

fn default_main_delay_ms() -> u64 {
    2000
}

fn default_module_delay_ms() -> u64 {
    1000
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_base_routes() -> Vec<RouteEntry> {
    vec![
        RouteEntry::new("/", "home", ComponentRef::eager("./views/HomeView.vue")),
        RouteEntry::new("/about", "about", ComponentRef::lazy("./views/AboutView.vue")),
    ]
}

fn default_modules() -> Vec<ModuleDescriptor> {
    ["module-a", "module-b"]
        .into_iter()
        .map(|name| {
            ModuleDescriptor::new(
                name,
                "pnpm run build:watch",
                Path::new("packages").join(name),
            )
        })
        .collect()
}

/// Workspace configuration parsed from `monodev.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DevConfig {
    /// Workspace root; other relative paths resolve against it.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Host application settings.
    pub main: MainAppConfig,
    /// Startup stagger.
    #[serde(default)]
    pub startup: StartupConfig,
    /// Known modules in registration order.
    #[serde(default)]
    pub modules: Vec<ModuleDescriptor>,
    /// Variables passed to every spawned command (e.g. `BASE_URL`).
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Strategy the host uses to merge module routes.
    #[serde(default)]
    pub route_loading: RouteLoadingMode,
    /// Routes the host declares itself.
    #[serde(default = "default_base_routes")]
    pub base_routes: Vec<RouteEntry>,
    /// Build artifacts inspected by the analyzer.
    #[serde(default)]
    pub artifacts: Vec<ArtifactSpec>,
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            main: MainAppConfig {
                name: default_main_name(),
                command: "pnpm run serve".into(),
                working_directory: PathBuf::from("projects/vue2-app"),
                url: Some("http://localhost:8081".into()),
            },
            startup: StartupConfig::default(),
            modules: default_modules(),
            env: BTreeMap::new(),
            route_loading: RouteLoadingMode::default(),
            base_routes: default_base_routes(),
            artifacts: vec![
                ArtifactSpec::new("host app (app.js)", "projects/vue2-app/dist/js/app.*.js"),
                ArtifactSpec::new(
                    "host app (vendor.js)",
                    "projects/vue2-app/dist/js/chunk-vendors.*.js",
                ),
                ArtifactSpec::new("module-a (module-a.js)", "packages/module-a/dist/module-a.js"),
                ArtifactSpec::new("module-b (module-b.js)", "packages/module-b/dist/module-b.js"),
            ],
        }
    }
}

impl DevConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// A relative `root` is resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read {}: {err}", path.display())))?;
        let mut config = Self::from_toml_str(&raw)?;
        if config.root.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.root = base.join(&config.root);
        }
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Locate the configuration for this invocation.
    ///
    /// Order: the file named by `MONODEV_CONFIG`, then `./monodev.toml`,
    /// then the built-in layout rooted at the current directory.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a located file fails to load.
    pub fn discover() -> Result<Self> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            info!(path, "loading config from {CONFIG_ENV_VAR}");
            return Self::load_from_path(path);
        }

        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            info!(path = %local.display(), "loading workspace config");
            return Self::load_from_path(local);
        }

        info!("no config file found; using built-in workspace layout");
        Ok(Self::default())
    }

    /// Names of all known modules in registration order.
    #[must_use]
    pub fn module_names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name.as_str()).collect()
    }

    /// Look up a module descriptor by name.
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&ModuleDescriptor> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Resolve a workspace-relative path.
    #[must_use]
    pub fn resolve_path(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// Absolute location of a module's manifest file.
    #[must_use]
    pub fn manifest_path(&self, module: &ModuleDescriptor) -> PathBuf {
        self.resolve_path(&module.working_directory)
            .join(&module.manifest)
    }

    /// Delay between the main start and the first module watcher.
    #[must_use]
    pub fn main_delay(&self) -> Duration {
        Duration::from_millis(self.startup.main_delay_ms)
    }

    /// Delay following each module watcher start.
    #[must_use]
    pub fn module_delay(&self) -> Duration {
        Duration::from_millis(self.startup.module_delay_ms)
    }

    /// Check structural invariants.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` describing the first violation found.
    pub fn validate(&self) -> Result<()> {
        if self.main.command.trim().is_empty() {
            return Err(AppError::Config("main.command must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for module in &self.modules {
            if module.name.trim().is_empty() {
                return Err(AppError::Config("module name must not be empty".into()));
            }
            if module.name.starts_with('-') {
                return Err(AppError::Config(format!(
                    "module name {} must not start with '-'",
                    module.name
                )));
            }
            if module.watch_command.trim().is_empty() {
                return Err(AppError::Config(format!(
                    "module {} has an empty watch_command",
                    module.name
                )));
            }
            if !seen.insert(module.name.as_str()) {
                return Err(AppError::Config(format!(
                    "module {} is declared more than once",
                    module.name
                )));
            }
        }

        let mut route_names = HashSet::new();
        for route in &self.base_routes {
            if !route_names.insert(route.name.as_str()) {
                return Err(AppError::Config(format!(
                    "base route name {} is declared more than once",
                    route.name
                )));
            }
        }

        Ok(())
    }
}
