//! # Captions View State

use serde::{Deserialize, Serialize};

use crate::core::CallingError;

/// Live captions status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaptionsStatus {
    /// Never started
    #[default]
    None,
    /// Start in flight
    Starting,
    /// Running
    Started,
    /// Stop in flight
    Stopping,
    /// Stopped
    Stopped,
}

impl CaptionsStatus {
    /// Whether a start/stop is in flight
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Starting | Self::Stopping)
    }
}

/// Captions state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionsState {
    /// Status
    pub status: CaptionsStatus,
    /// Language being transcribed
    pub spoken_language: Option<String>,
    /// Last captions failure
    pub error: Option<CallingError>,
}
