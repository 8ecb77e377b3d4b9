//! Host application store composed with module state slices.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::routing::resolver::ModuleResolver;

/// Signed-in operator as seen by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct HostUser {
    /// Display name.
    pub name: String,
    /// Role name.
    pub role: String,
}

/// Host application metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct HostAppConfig {
    /// Application title.
    pub title: String,
    /// Application version.
    pub version: String,
    /// UI theme.
    pub theme: String,
}

/// Root (non-namespaced) host state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct RootState {
    /// Current user.
    pub user: HostUser,
    /// Application metadata.
    pub app_config: HostAppConfig,
}

impl Default for RootState {
    fn default() -> Self {
        Self {
            user: HostUser {
                name: "Admin".into(),
                role: "administrator".into(),
            },
            app_config: HostAppConfig {
                title: "Vue2 Monorepo App".into(),
                version: "1.0.0".into(),
                theme: "light".into(),
            },
        }
    }
}

/// Partial host user update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostUserPatch {
    /// New display name.
    pub name: Option<String>,
    /// New role.
    pub role: Option<String>,
}

/// Partial host metadata update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostAppConfigPatch {
    /// New title.
    pub title: Option<String>,
    /// New version.
    pub version: Option<String>,
    /// New theme.
    pub theme: Option<String>,
}

/// Host store: root state plus one namespaced slice per loaded module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostStore {
    root: RootState,
    modules: Vec<(String, serde_json::Value)>,
}

impl HostStore {
    /// Compose the store, resolving each module's slice in registration order.
    ///
    /// A module that fails to resolve or has no slice is skipped. A slice
    /// whose namespace is already taken is skipped with a warning.
    #[must_use]
    pub fn compose(resolvers: &[Arc<dyn ModuleResolver>]) -> Self {
        let mut store = Self::default();
        for resolver in resolvers {
            let module = resolver.module_name();
            let slice = match resolver.resolve() {
                Ok(manifest) => manifest.store,
                Err(err) => {
                    warn!(module, %err, "failed to load module store");
                    continue;
                }
            };
            let Some(slice) = slice else {
                continue;
            };
            if store.module_state(&slice.namespace).is_some() {
                warn!(module, namespace = slice.namespace, "store namespace already registered");
                continue;
            }
            info!(module, namespace = slice.namespace, "module store registered");
            store.modules.push((slice.namespace, slice.state));
        }
        store
    }

    /// Root state.
    #[must_use]
    pub fn root(&self) -> &RootState {
        &self.root
    }

    /// Registered namespaces in registration order.
    #[must_use]
    pub fn namespaces(&self) -> Vec<&str> {
        self.modules.iter().map(|(ns, _)| ns.as_str()).collect()
    }

    /// State of one module slice.
    #[must_use]
    pub fn module_state(&self, namespace: &str) -> Option<&serde_json::Value> {
        self.modules
            .iter()
            .find(|(ns, _)| ns == namespace)
            .map(|(_, state)| state)
    }

    /// Merge a partial user update into the root state.
    pub fn set_user(&mut self, patch: HostUserPatch) {
        if let Some(name) = patch.name {
            self.root.user.name = name;
        }
        if let Some(role) = patch.role {
            self.root.user.role = role;
        }
    }

    /// Merge a partial metadata update into the root state.
    pub fn set_app_config(&mut self, patch: HostAppConfigPatch) {
        if let Some(title) = patch.title {
            self.root.app_config.title = title;
        }
        if let Some(version) = patch.version {
            self.root.app_config.version = version;
        }
        if let Some(theme) = patch.theme {
            self.root.app_config.theme = theme;
        }
    }
}
