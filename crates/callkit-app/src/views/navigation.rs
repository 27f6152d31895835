//! # Navigation and Lifecycle View State

use serde::{Deserialize, Serialize};

/// Which screen the composite should show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavigationStatus {
    /// Pre-call setup screen
    #[default]
    Setup,
    /// In-call screen
    InCall,
    /// The composite should close
    Exit,
}

/// Navigation state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    /// Current destination
    pub status: NavigationStatus,
}

/// Whether the host app is visible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleStatus {
    /// App visible
    #[default]
    Foreground,
    /// App hidden
    Background,
}

/// Host lifecycle state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleState {
    /// Current status
    pub status: LifecycleStatus,
}

impl LifecycleState {
    /// App is hidden
    #[must_use]
    pub fn is_background(&self) -> bool {
        self.status == LifecycleStatus::Background
    }
}
