//! # Call Diagnostics View State

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Network quality bucket reported by the engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkQuality {
    /// No report yet
    #[default]
    Unknown,
    /// Healthy
    Good,
    /// Degraded
    Poor,
    /// Unusable
    Bad,
}

/// Media diagnostics the engine raises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MediaDiagnostic {
    /// Speaker not working
    SpeakerNotFunctioning,
    /// Microphone not working
    MicrophoneNotFunctioning,
    /// Microphone muted by the OS
    MicrophoneMutedUnexpectedly,
    /// Camera stopped
    CameraStartFailed,
    /// Camera frozen
    CameraFrozen,
}

/// Diagnostics state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallDiagnosticsState {
    /// Latest network quality
    pub network_quality: NetworkQuality,
    /// Active media diagnostics
    pub media_diagnostics: BTreeMap<MediaDiagnostic, bool>,
}
