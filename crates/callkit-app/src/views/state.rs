//! # Application State
//!
//! The root snapshot owned by the store. Every field is replaced by the
//! reducer; nothing mutates a published snapshot in place.

use serde::{Deserialize, Serialize};

use super::{
    AudioSessionState, CallDiagnosticsState, CallState, CallStatus, CameraOperationalStatus,
    CaptionsState, ErrorState, LifecycleState, LocalUserState, NavigationState, PermissionState,
    RemoteParticipantsState,
};

/// What returning to foreground does to a paused camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForegroundCamera {
    /// Camera was paused in a live call: turn it back on
    Resume,
    /// Camera was paused on hold or during setup: restart the local preview only
    Preview,
    /// Camera was not paused; leave it alone
    Untouched,
}

/// Root state for one composite session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    /// Call status
    pub call: CallState,
    /// Local camera, microphone, role
    pub local_user: LocalUserState,
    /// Screen routing
    pub navigation: NavigationState,
    /// Host foreground/background
    pub lifecycle: LifecycleState,
    /// Remote roster
    pub remote_participants: RemoteParticipantsState,
    /// OS permissions
    pub permissions: PermissionState,
    /// Audio focus
    pub audio_session: AudioSessionState,
    /// Live captions
    pub captions: CaptionsState,
    /// Errors for the presentation layer
    pub errors: ErrorState,
    /// Network and media diagnostics
    pub diagnostics: CallDiagnosticsState,
}

impl AppState {
    /// Whether the local camera is streaming
    #[must_use]
    pub fn camera_is_on(&self) -> bool {
        self.local_user.camera.operation == CameraOperationalStatus::On
    }

    /// Camera handling for the next foreground transition
    #[must_use]
    pub fn foreground_camera(&self) -> ForegroundCamera {
        if self.local_user.camera.operation != CameraOperationalStatus::Paused {
            return ForegroundCamera::Untouched;
        }
        if self.call.is_connected() {
            ForegroundCamera::Resume
        } else if self.call.is_on_hold() || self.call.status == CallStatus::None {
            ForegroundCamera::Preview
        } else {
            ForegroundCamera::Untouched
        }
    }
}
