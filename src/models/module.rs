//! Feature module manifest: the build artifact a module exposes to the host.

use serde::{Deserialize, Serialize};

use crate::models::route::RouteEntry;

/// A module's namespaced slice of host state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct StoreSlice {
    /// Namespace the slice is registered under (e.g. `moduleA`).
    pub namespace: String,
    /// Initial state of the slice.
    #[serde(default = "empty_state")]
    pub state: serde_json::Value,
}

fn empty_state() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Everything a module contributes to the host application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ModuleManifest {
    /// Module name; must match the descriptor it was resolved for.
    pub name: String,
    /// Module version.
    #[serde(default)]
    pub version: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Other workspace packages the module relies on.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Permission identifiers the module declares.
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Route contributions in declared order.
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
    /// Optional state slice.
    #[serde(default)]
    pub store: Option<StoreSlice>,
}

impl ModuleManifest {
    /// Manifest with a name and routes only.
    #[must_use]
    pub fn with_routes(name: impl Into<String>, routes: Vec<RouteEntry>) -> Self {
        Self {
            name: name.into(),
            version: String::new(),
            description: String::new(),
            dependencies: Vec::new(),
            permissions: Vec::new(),
            routes,
            store: None,
        }
    }
}
