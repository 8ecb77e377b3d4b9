//! Module route loading under the eager and lazy strategies.
//!
//! - **Eager**: every module is resolved before the router exists. A module
//!   that fails to resolve contributes nothing; the others and the base
//!   routes are unaffected. The result is frozen.
//! - **Lazy**: the router starts with the base routes only. Modules are
//!   resolved one after another in registration order and their routes
//!   appended in a single step once all of them succeed. Any failure leaves
//!   the table at its base routes; there is no retry.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, Instrument};

use crate::config::DevConfig;
use crate::models::route::RouteEntry;
use crate::routing::resolver::{ManifestResolver, ModuleResolver};
use crate::routing::table::{LiveRouteTable, RouteTable};
use crate::Result;

/// When module routes are merged relative to router construction.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum RouteLoadingMode {
    /// Merge before the router is constructed.
    #[default]
    Eager,
    /// Construct with base routes, merge once modules resolve.
    Lazy,
}

/// Produces the host route table from base routes and module contributions.
#[derive(Clone)]
pub struct ModuleRouteLoader {
    resolvers: Vec<Arc<dyn ModuleResolver>>,
}

impl std::fmt::Debug for ModuleRouteLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.resolvers.iter().map(|r| r.module_name()).collect();
        f.debug_struct("ModuleRouteLoader")
            .field("modules", &names)
            .finish()
    }
}

impl ModuleRouteLoader {
    /// Loader over resolvers in registration order.
    #[must_use]
    pub fn new(resolvers: Vec<Arc<dyn ModuleResolver>>) -> Self {
        Self { resolvers }
    }

    /// Loader reading each configured module's manifest.
    #[must_use]
    pub fn from_config(config: &DevConfig) -> Self {
        Self::new(ManifestResolver::for_config(config))
    }

    /// Resolve every module now and return the frozen table.
    #[must_use]
    pub fn load_eager(&self, base: Vec<RouteEntry>) -> RouteTable {
        let _span = info_span!("load_routes_eager").entered();

        let mut table = RouteTable::new(base);
        for resolver in &self.resolvers {
            let module = resolver.module_name();
            match resolver.resolve() {
                Ok(manifest) => {
                    info!(module, routes = manifest.routes.len(), "module routes loaded");
                    table.append(manifest.routes);
                }
                Err(err) => {
                    error!(module, %err, "failed to load module routes; continuing without them");
                }
            }
        }
        table
    }

    /// Resolve all modules in order and concatenate their routes.
    ///
    /// # Errors
    ///
    /// Returns the first module's `AppError::ModuleLoad`.
    pub async fn resolve_combined(&self) -> Result<Vec<RouteEntry>> {
        let mut combined = Vec::new();
        for resolver in &self.resolvers {
            let manifest = resolver.resolve_async().await?;
            combined.extend(manifest.routes);
        }
        Ok(combined)
    }

    /// Resolve all modules and append their routes to `table` in one step.
    ///
    /// Returns the number of routes appended.
    pub async fn populate(&self, table: &LiveRouteTable) -> usize {
        match self.resolve_combined().await {
            Ok(routes) if routes.is_empty() => 0,
            Ok(routes) => {
                let count = routes.len();
                table.append(routes);
                info!(routes = count, "module routes registered");
                count
            }
            Err(err) => {
                error!(%err, "failed to load module routes; serving base routes only");
                0
            }
        }
    }

    /// Build a live table holding `base` and resolve modules in the background.
    ///
    /// The table is usable immediately. The returned task yields the number
    /// of routes it appended. Must be called from within a Tokio runtime.
    #[must_use]
    pub fn load_lazy(&self, base: Vec<RouteEntry>) -> (LiveRouteTable, JoinHandle<usize>) {
        let table = LiveRouteTable::new(RouteTable::new(base));
        let loader = self.clone();
        let live = table.clone();
        let task = tokio::spawn(
            async move { loader.populate(&live).await }.instrument(info_span!("load_routes_lazy")),
        );
        (table, task)
    }
}
