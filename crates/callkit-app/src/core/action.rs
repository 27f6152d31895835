//! # Actions: Intents and Outcomes
//!
//! Every state change starts as an [`Action`] dispatched into the store.
//! Actions are grouped by domain; each group is a closed enum so the
//! reducer and the middleware match exhaustively.
//!
//! ## Flow
//!
//! ```text
//! dispatch → Middleware (effects) → Reducer → Snapshot → Subscribers
//!                 │
//!                 └── CallingBridge call ──► *Succeeded / *Failed dispatch
//! ```
//!
//! Request actions (`TurnCameraOn`, `AdmitRequested`, ...) describe intent.
//! Outcome actions (`CameraOnSucceeded`, `LobbyErrorOccurred`, ...) are only
//! dispatched by middleware once the bridge has answered.

use serde::{Deserialize, Serialize};

use super::error::{CallStateError, CallingError, FatalError, LobbyErrorCode, OperationError};
use crate::views::{
    AudioDevice, AudioDeviceSelectionStatus, CallStatus, CameraDeviceSelectionStatus,
    MediaDiagnostic, NetworkQuality, ParticipantId, ParticipantRole, PermissionStatus,
    RemoteParticipant,
};

/// Root action type accepted by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Call lifecycle and call-level flags
    Calling(CallingAction),
    /// Local camera, microphone, routing, and identity
    LocalParticipant(LocalParticipantAction),
    /// Host foreground/background
    Lifecycle(LifecycleAction),
    /// Screen routing
    Navigation(NavigationAction),
    /// Remote roster and lobby
    Participant(ParticipantAction),
    /// OS permissions
    Permission(PermissionAction),
    /// Audio focus handshake
    AudioSession(AudioSessionAction),
    /// Live captions
    Captions(CaptionsAction),
    /// Errors for the presentation layer
    Error(ErrorAction),
    /// Network and media diagnostics
    CallDiagnostics(CallDiagnosticsAction),
}

impl Action {
    /// Short name of the action group, for log fields
    #[must_use]
    pub fn group(&self) -> &'static str {
        match self {
            Self::Calling(_) => "calling",
            Self::LocalParticipant(_) => "local_participant",
            Self::Lifecycle(_) => "lifecycle",
            Self::Navigation(_) => "navigation",
            Self::Participant(_) => "participant",
            Self::Permission(_) => "permission",
            Self::AudioSession(_) => "audio_session",
            Self::Captions(_) => "captions",
            Self::Error(_) => "error",
            Self::CallDiagnostics(_) => "call_diagnostics",
        }
    }
}

// =========================================================================
// Calling
// =========================================================================

/// Call lifecycle actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallingAction {
    /// Prepare the engine (setup screen shown)
    SetupCallRequested,
    /// Join the call with the current camera and microphone state
    CallStartRequested,
    /// Hang up
    CallEndRequested,
    /// Put the call on hold
    HoldRequested,
    /// Resume a held call
    ResumeRequested,
    /// Engine-reported call status
    StateUpdated(CallStatus),
    /// Engine call identifier became known
    CallIdUpdated(String),
    /// Recording flag changed
    IsRecordingUpdated(bool),
    /// Transcription flag changed
    IsTranscribingUpdated(bool),
}

// =========================================================================
// Local Participant
// =========================================================================

/// What the one-shot camera recovery did before a switch failure was reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryOutcome {
    /// The failure was not eligible for recovery
    NotAttempted,
    /// Turning the camera off failed; the original stream is still live
    Aborted,
    /// The camera was turned off and could not be turned back on
    CameraLeftOff,
    /// The camera was restarted with a new stream, but the retried switch failed
    CameraRestarted {
        /// Stream produced by the restart
        video_stream_id: String,
    },
}

/// Local camera, microphone, and audio routing actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocalParticipantAction {
    // ---------------------------------------------------------------------
    // Camera
    // ---------------------------------------------------------------------
    /// User asked for the camera to be turned on
    TurnCameraOn,
    /// User asked for the camera to be turned off
    TurnCameraOff,
    /// User asked to switch between front and back camera
    SwitchCamera,
    /// Camera is on and streaming
    CameraOnSucceeded {
        /// New local video stream
        video_stream_id: String,
    },
    /// Camera could not be turned on
    CameraOnFailed {
        /// Cause
        error: CallingError,
    },
    /// Camera is off
    CameraOffSucceeded,
    /// Camera could not be turned off
    CameraOffFailed {
        /// Cause
        error: CallingError,
    },
    /// Switch completed
    CameraSwitchSucceeded {
        /// Device now in use
        device: CameraDeviceSelectionStatus,
        /// New stream when the switch needed a camera restart
        restarted_stream_id: Option<String>,
    },
    /// Switch failed
    CameraSwitchFailed {
        /// Device selected before the switch was requested
        previous_device: CameraDeviceSelectionStatus,
        /// Latest cause
        error: CallingError,
        /// What recovery left behind
        recovery: RecoveryOutcome,
    },
    /// Pause the camera because the app is in background
    CameraPauseRequested,
    /// Camera paused for background
    CameraPauseSucceeded,
    /// Camera could not be paused
    CameraPauseFailed {
        /// Cause
        error: CallingError,
    },
    /// Restart local preview only (call on hold)
    CameraPreviewOnTriggered,
    /// Local preview running
    CameraPreviewOnSucceeded {
        /// Preview stream
        video_stream_id: String,
    },
    /// Local preview could not start
    CameraPreviewOnFailed {
        /// Cause
        error: CallingError,
    },
    /// Number of cameras the device exposes
    CamerasCountUpdated(u32),

    // ---------------------------------------------------------------------
    // Microphone
    // ---------------------------------------------------------------------
    /// User asked to unmute
    TurnMicOn,
    /// User asked to mute
    TurnMicOff,
    /// Microphone live
    MicOnSucceeded,
    /// Unmute failed
    MicOnFailed {
        /// Cause
        error: CallingError,
    },
    /// Microphone muted
    MicOffSucceeded,
    /// Mute failed
    MicOffFailed {
        /// Cause
        error: CallingError,
    },

    // ---------------------------------------------------------------------
    // Audio routing
    // ---------------------------------------------------------------------
    /// User picked an output device
    AudioDeviceChangeRequested(AudioDevice),
    /// Routing confirmed
    AudioDeviceChangeSucceeded(AudioDevice),
    /// Routing failed
    AudioDeviceChangeFailed {
        /// Selection to restore
        previous: AudioDeviceSelectionStatus,
        /// Cause
        error: CallingError,
    },
    /// Bluetooth headset connected or disconnected
    BluetoothStateChanged {
        /// A headset is connected
        available: bool,
        /// Headset name, if reported
        device_name: Option<String>,
    },

    // ---------------------------------------------------------------------
    // Identity
    // ---------------------------------------------------------------------
    /// Local display name set
    DisplayNameSet(String),
    /// Engine-reported local role
    RoleChanged(ParticipantRole),
}

// =========================================================================
// Lifecycle & Navigation
// =========================================================================

/// Host lifecycle actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleAction {
    /// Host app moved to background
    EnterBackgroundTriggered,
    /// Background transition applied
    EnterBackgroundSucceeded,
    /// Host app returned to foreground
    EnterForegroundTriggered,
    /// Foreground transition applied
    EnterForegroundSucceeded,
}

/// Screen routing actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavigationAction {
    /// Show the in-call screen
    CallLaunched,
    /// Return to the setup screen
    SetupLaunched,
    /// Close the composite
    Exit,
}

// =========================================================================
// Remote Participants
// =========================================================================

/// Roster and lobby actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticipantAction {
    /// Engine roster snapshot
    ParticipantsUpdated {
        /// Participants currently known
        participants: Vec<RemoteParticipant>,
        /// Engine-reported total
        total_count: usize,
    },
    /// Dominant speakers, most recent first
    DominantSpeakersUpdated(Vec<ParticipantId>),
    /// Admit one lobby participant
    AdmitRequested(ParticipantId),
    /// Admit everyone in the lobby
    AdmitAllRequested,
    /// Decline one lobby participant
    DeclineRequested(ParticipantId),
    /// Admit or decline failed
    LobbyErrorOccurred(LobbyErrorCode),
    /// User dismissed the lobby error
    LobbyErrorCleared,
}

// =========================================================================
// Permissions & Audio Session
// =========================================================================

/// OS permission actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionAction {
    /// Microphone permission changed
    AudioPermissionChanged(PermissionStatus),
    /// Camera permission changed
    CameraPermissionChanged(PermissionStatus),
}

/// Audio focus handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioSessionAction {
    /// Platform is asking for audio focus
    AudioFocusRequesting,
    /// Focus granted
    AudioFocusApproved,
    /// Focus refused
    AudioFocusRejected,
    /// Focus lost to another app
    AudioFocusInterrupted,
}

// =========================================================================
// Captions
// =========================================================================

/// Live captions actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptionsAction {
    /// Start captions
    StartRequested {
        /// Spoken language, engine default when absent
        language: Option<String>,
    },
    /// Captions running
    Started {
        /// Language being transcribed
        language: Option<String>,
    },
    /// Stop captions
    StopRequested,
    /// Captions stopped
    Stopped,
    /// Start or stop failed
    Failed {
        /// Cause
        error: CallingError,
    },
}

// =========================================================================
// Errors & Diagnostics
// =========================================================================

/// Error reporting actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorAction {
    /// Session cannot continue
    FatalErrorOccurred(FatalError),
    /// Error that accompanied a call termination
    CallStateErrorOccurred(CallStateError),
    /// End, hold, or resume failed
    OperationFailed(OperationError),
    /// User dismissed the operation error
    OperationErrorCleared,
}

/// Diagnostics actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallDiagnosticsAction {
    /// Network quality changed
    NetworkQualityChanged(NetworkQuality),
    /// Media diagnostic raised or cleared
    MediaDiagnosticChanged {
        /// Which diagnostic
        diagnostic: MediaDiagnostic,
        /// Raised (true) or cleared (false)
        active: bool,
    },
}

// =========================================================================
// Conversions
// =========================================================================

macro_rules! impl_from_group {
    ($($group:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$group> for Action {
                fn from(action: $group) -> Self {
                    Action::$variant(action)
                }
            }
        )*
    };
}

impl_from_group! {
    CallingAction => Calling,
    LocalParticipantAction => LocalParticipant,
    LifecycleAction => Lifecycle,
    NavigationAction => Navigation,
    ParticipantAction => Participant,
    PermissionAction => Permission,
    AudioSessionAction => AudioSession,
    CaptionsAction => Captions,
    ErrorAction => Error,
    CallDiagnosticsAction => CallDiagnostics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_convert_into_root() {
        let action: Action = LocalParticipantAction::TurnCameraOn.into();
        assert_eq!(
            action,
            Action::LocalParticipant(LocalParticipantAction::TurnCameraOn)
        );
        assert_eq!(action.group(), "local_participant");

        let action: Action = NavigationAction::Exit.into();
        assert_eq!(action.group(), "navigation");
    }
}
