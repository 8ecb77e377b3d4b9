//! Route entries served by the host router.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Reference to the component a route renders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ComponentRef {
    /// Import specifier of the component (e.g. `./components/Page1.vue`).
    pub target: String,
    /// Code-split component imported on first navigation.
    #[serde(default)]
    pub lazy: bool,
}

impl ComponentRef {
    /// Component bundled into the host entry chunk.
    #[must_use]
    pub fn eager(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            lazy: false,
        }
    }

    /// Component imported on demand.
    #[must_use]
    pub fn lazy(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            lazy: true,
        }
    }
}

/// One path-to-component binding.
///
/// `name` must be unique within a [`RouteTable`](crate::routing::table::RouteTable).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct RouteEntry {
    /// URL path pattern.
    pub path: String,
    /// Unique route name used for named navigation.
    pub name: String,
    /// Component rendered for the route.
    pub component: ComponentRef,
    /// Free-form route metadata (`title`, `module`, ...).
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

impl RouteEntry {
    /// Construct a route without metadata.
    #[must_use]
    pub fn new(path: impl Into<String>, name: impl Into<String>, component: ComponentRef) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            component,
            meta: BTreeMap::new(),
        }
    }

    /// Attach a metadata value.
    #[must_use]
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }
}
