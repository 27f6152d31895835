//! # Call View State

use serde::{Deserialize, Serialize};

/// Status of the call as reported by the calling engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallStatus {
    /// No call has been started yet (or a new call is being prepared)
    #[default]
    None,
    /// Joining the call
    Connecting,
    /// In the call
    Connected,
    /// The local user put the call on hold
    LocalHold,
    /// Leaving the call
    Disconnecting,
    /// The call has ended
    Disconnected,
}

impl CallStatus {
    /// Whether the engine may move from `self` to `next`.
    ///
    /// The graph only moves forward; the single way out of `Disconnected`
    /// is a new call start, which the reducer handles separately by
    /// resetting to `None`.
    #[must_use]
    pub fn can_transition_to(&self, next: CallStatus) -> bool {
        if *self == next {
            return true;
        }
        match (self, next) {
            (Self::Disconnected, _) => false,
            (_, Self::Disconnected) => true,
            (Self::None, Self::Connecting | Self::Connected) => true,
            (Self::Connecting, Self::Connected | Self::Disconnecting) => true,
            (Self::Connected, Self::LocalHold | Self::Disconnecting) => true,
            (Self::LocalHold, Self::Connected | Self::Disconnecting) => true,
            _ => false,
        }
    }

    /// Whether the local user is currently part of a live call.
    #[must_use]
    pub fn is_in_call(&self) -> bool {
        matches!(self, Self::Connected | Self::LocalHold)
    }

    /// Whether a call has been started and not yet torn down.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Connecting | Self::Connected | Self::LocalHold)
    }

    /// Lowercase label for logging
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::LocalHold => "local_hold",
            Self::Disconnecting => "disconnecting",
            Self::Disconnected => "disconnected",
        }
    }
}

/// How the composite was asked to run the current call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationStatus {
    /// Regular flow: setup screen first, then the call
    #[default]
    None,
    /// The host asked to join directly without a setup screen
    SkipSetupScreen,
}

/// Call-level state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallState {
    /// Engine-reported status
    pub status: CallStatus,
    /// Launch mode of the current call
    pub operation_status: OperationStatus,
    /// Engine call identifier, once known
    pub call_id: Option<String>,
    /// A `start_call` request is in flight; further starts are dropped
    pub start_in_flight: bool,
    /// Whether the call is being recorded
    pub is_recording: bool,
    /// Whether the call is being transcribed
    pub is_transcribing: bool,
}

impl CallState {
    /// Connected and not on hold
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.status == CallStatus::Connected
    }

    /// On local hold
    #[must_use]
    pub fn is_on_hold(&self) -> bool {
        self.status == CallStatus::LocalHold
    }
}
