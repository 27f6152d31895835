//! # Permission View State

use serde::{Deserialize, Serialize};

/// OS permission status for a device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionStatus {
    /// Not checked yet
    #[default]
    Unknown,
    /// Never asked
    NotAsked,
    /// Asked, not answered
    Requesting,
    /// Granted
    Granted,
    /// Denied
    Denied,
}

/// Microphone and camera permissions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionState {
    /// Microphone permission
    pub audio: PermissionStatus,
    /// Camera permission
    pub camera: PermissionStatus,
}
