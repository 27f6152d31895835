//! # Audio Session View State

use serde::{Deserialize, Serialize};

/// Platform audio focus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioFocusStatus {
    /// Focus not requested yet
    #[default]
    None,
    /// Focus requested, waiting for approval
    Requesting,
    /// Focus held
    Approved,
    /// Focus refused
    Rejected,
    /// Focus taken by another app
    Interrupted,
}

/// Audio session state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSessionState {
    /// Audio focus
    pub audio_focus: AudioFocusStatus,
}
