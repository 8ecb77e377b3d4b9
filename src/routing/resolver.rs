//! Per-module contribution resolution.
//!
//! [`ModuleResolver`] is the seam between the host and each module's build
//! output. Resolution either yields the module's manifest or fails with
//! `AppError::ModuleLoad`; callers branch on the result explicitly.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use crate::config::DevConfig;
use crate::models::module::ModuleManifest;
use crate::{AppError, Result};

/// Resolves one module's contribution.
pub trait ModuleResolver: Send + Sync {
    /// Name of the module this resolver serves.
    fn module_name(&self) -> &str;

    /// Resolve synchronously (eager strategy).
    ///
    /// # Errors
    ///
    /// Returns `AppError::ModuleLoad` if the contribution is unavailable.
    fn resolve(&self) -> Result<ModuleManifest>;

    /// Resolve without blocking the router (lazy strategy).
    ///
    /// Defaults to the synchronous call.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ModuleLoad` if the contribution is unavailable.
    fn resolve_async(&self) -> Pin<Box<dyn Future<Output = Result<ModuleManifest>> + Send + '_>> {
        Box::pin(std::future::ready(self.resolve()))
    }
}

/// Reads a module's `module.toml` from its working directory.
#[derive(Debug, Clone)]
pub struct ManifestResolver {
    name: String,
    path: PathBuf,
}

impl ManifestResolver {
    /// Resolver for an explicit manifest path.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// One resolver per configured module, in registration order.
    #[must_use]
    pub fn for_config(config: &DevConfig) -> Vec<Arc<dyn ModuleResolver>> {
        config
            .modules
            .iter()
            .map(|m| {
                Arc::new(Self::new(m.name.clone(), config.manifest_path(m)))
                    as Arc<dyn ModuleResolver>
            })
            .collect()
    }

    /// Manifest location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(&self, raw: &str) -> Result<ModuleManifest> {
        let manifest: ModuleManifest = toml::from_str(raw).map_err(|err| {
            AppError::ModuleLoad(format!("invalid manifest {}: {err}", self.path.display()))
        })?;
        if manifest.name != self.name {
            return Err(AppError::ModuleLoad(format!(
                "{} declares module {} but was resolved for {}",
                self.path.display(),
                manifest.name,
                self.name
            )));
        }
        Ok(manifest)
    }

    fn read_error(&self, err: &std::io::Error) -> AppError {
        AppError::ModuleLoad(format!(
            "cannot read manifest for {} at {}: {err}",
            self.name,
            self.path.display()
        ))
    }
}

impl ModuleResolver for ManifestResolver {
    fn module_name(&self) -> &str {
        &self.name
    }

    fn resolve(&self) -> Result<ModuleManifest> {
        let raw = std::fs::read_to_string(&self.path).map_err(|err| self.read_error(&err))?;
        self.parse(&raw)
    }

    fn resolve_async(&self) -> Pin<Box<dyn Future<Output = Result<ModuleManifest>> + Send + '_>> {
        Box::pin(async move {
            let raw = tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|err| self.read_error(&err))?;
            self.parse(&raw)
        })
    }
}
