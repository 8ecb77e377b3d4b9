//! Route tables served by the host router.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use crate::models::route::RouteEntry;
use crate::{AppError, Result};

/// Ordered route collection: base routes first, then each module's
/// contribution in registration order.
///
/// Loaders never deduplicate; use [`RouteTable::validate`] to detect
/// name collisions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Build a table from entries without validation.
    #[must_use]
    pub fn new(entries: Vec<RouteEntry>) -> Self {
        Self { entries }
    }

    /// Build a table, rejecting duplicate route names.
    ///
    /// # Errors
    ///
    /// Returns `AppError::DuplicateRoute` naming every colliding route.
    pub fn try_new(entries: Vec<RouteEntry>) -> Result<Self> {
        let table = Self::new(entries);
        table.validate()?;
        Ok(table)
    }

    /// Entries in serving order.
    #[must_use]
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Route names in serving order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Find a route by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&RouteEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Append routes after the existing ones.
    pub fn append(&mut self, routes: impl IntoIterator<Item = RouteEntry>) {
        self.entries.extend(routes);
    }

    /// Names that appear more than once, each reported once, in first-seen order.
    #[must_use]
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();
        for entry in &self.entries {
            let name = entry.name.as_str();
            if !seen.insert(name) && reported.insert(name) {
                duplicates.push(name);
            }
        }
        duplicates
    }

    /// Check route name uniqueness.
    ///
    /// # Errors
    ///
    /// Returns `AppError::DuplicateRoute` naming every colliding route.
    pub fn validate(&self) -> Result<()> {
        let duplicates = self.duplicate_names();
        if duplicates.is_empty() {
            Ok(())
        } else {
            Err(AppError::DuplicateRoute(duplicates.join(", ")))
        }
    }
}

/// Route table shared with a running router that may still grow.
///
/// Appends happen under one write lock, so readers observe either the
/// table before a merge or after it, never a partial merge.
#[derive(Debug, Clone, Default)]
pub struct LiveRouteTable {
    inner: Arc<RwLock<RouteTable>>,
}

impl LiveRouteTable {
    /// Start from the given table.
    #[must_use]
    pub fn new(table: RouteTable) -> Self {
        Self {
            inner: Arc::new(RwLock::new(table)),
        }
    }

    /// Copy of the current table.
    #[must_use]
    pub fn snapshot(&self) -> RouteTable {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append routes in one atomic step.
    pub fn append(&self, routes: Vec<RouteEntry>) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .append(routes);
    }
}
