//! Process-wide shared state.
//!
//! One instance per process with an explicit lifecycle:
//! [`init`] creates the initial value, [`commit`] applies a
//! [`SharedMutation`], [`teardown`] removes it. Fields are never written
//! directly from outside this module.

use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{AppError, Result};

/// Shared application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SharedAppConfig {
    /// UI theme name.
    pub theme: String,
    /// Locale identifier.
    pub language: String,
    /// Whether the navigation sidebar is collapsed.
    pub sidebar_collapsed: bool,
}

impl Default for SharedAppConfig {
    fn default() -> Self {
        Self {
            theme: "light".into(),
            language: "zh-CN".into(),
            sidebar_collapsed: false,
        }
    }
}

/// Signed-in user shared across modules.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SharedUser {
    /// User identifier; `None` when signed out.
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Avatar URL.
    pub avatar: String,
    /// Granted permissions.
    pub permissions: Vec<String>,
}

/// Partial user update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct UserPatch {
    /// New identifier.
    pub id: Option<String>,
    /// New display name.
    pub name: Option<String>,
    /// New avatar URL.
    pub avatar: Option<String>,
    /// Replacement permission list.
    pub permissions: Option<Vec<String>>,
}

/// The shared state value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SharedState {
    /// Shared application settings.
    pub app_config: SharedAppConfig,
    /// Shared user information.
    pub user: SharedUser,
}

/// The only ways shared state may change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharedMutation {
    /// Replace the theme.
    SetTheme(String),
    /// Replace the language.
    SetLanguage(String),
    /// Flip the sidebar collapsed flag.
    ToggleSidebar,
    /// Merge a partial user update.
    SetUser(UserPatch),
    /// Reset the user to signed-out defaults.
    ClearUser,
}

impl SharedState {
    /// Apply one mutation.
    pub fn apply(&mut self, mutation: SharedMutation) {
        match mutation {
            SharedMutation::SetTheme(theme) => self.app_config.theme = theme,
            SharedMutation::SetLanguage(language) => self.app_config.language = language,
            SharedMutation::ToggleSidebar => {
                self.app_config.sidebar_collapsed = !self.app_config.sidebar_collapsed;
            }
            SharedMutation::SetUser(patch) => {
                if let Some(id) = patch.id {
                    self.user.id = Some(id);
                }
                if let Some(name) = patch.name {
                    self.user.name = name;
                }
                if let Some(avatar) = patch.avatar {
                    self.user.avatar = avatar;
                }
                if let Some(permissions) = patch.permissions {
                    self.user.permissions = permissions;
                }
            }
            SharedMutation::ClearUser => self.user = SharedUser::default(),
        }
    }
}

static SHARED: RwLock<Option<SharedState>> = RwLock::new(None);

/// Create the process-wide state with its initial value.
///
/// # Errors
///
/// Returns `AppError::Store` if the state already exists.
pub fn init() -> Result<SharedState> {
    let mut slot = SHARED.write().unwrap_or_else(PoisonError::into_inner);
    if slot.is_some() {
        return Err(AppError::Store("shared state already initialized".into()));
    }
    let state = SharedState::default();
    *slot = Some(state.clone());
    info!("shared state initialized");
    Ok(state)
}

/// Apply a mutation and return the resulting state.
///
/// # Errors
///
/// Returns `AppError::Store` if [`init`] has not been called.
pub fn commit(mutation: SharedMutation) -> Result<SharedState> {
    let mut slot = SHARED.write().unwrap_or_else(PoisonError::into_inner);
    let state = slot
        .as_mut()
        .ok_or_else(|| AppError::Store("shared state not initialized".into()))?;
    debug!(?mutation, "shared state mutation");
    state.apply(mutation);
    Ok(state.clone())
}

/// Current state.
///
/// # Errors
///
/// Returns `AppError::Store` if [`init`] has not been called.
pub fn snapshot() -> Result<SharedState> {
    SHARED
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .ok_or_else(|| AppError::Store("shared state not initialized".into()))
}

/// Remove the state, returning its final value if it existed.
pub fn teardown() -> Option<SharedState> {
    let last = SHARED.write().unwrap_or_else(PoisonError::into_inner).take();
    if last.is_some() {
        info!("shared state torn down");
    }
    last
}
