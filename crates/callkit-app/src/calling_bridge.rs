//! # CallingBridge: Abstract Calling Engine
//!
//! This module defines the `CallingBridge` trait, the boundary between the
//! orchestration core and whatever calling engine the host links in. The
//! core never talks to an engine directly; middleware calls the bridge and
//! turns each answer into an outcome action.
//!
//! ## Design
//!
//! ```text
//! callkit-app (headless)         host
//! ┌───────────────────┐      ┌──────────────────┐
//! │ CallingMiddleware │      │ engine adapter   │
//! │   ┌─────────────┐ │      │   implements     │
//! │   │CallingBridge│◄───────│   CallingBridge  │
//! │   └─────────────┘ │      │                  │
//! └───────────────────┘      └──────────────────┘
//! ```
//!
//! Operations resolve to a single result. Event streams are push-based and
//! start from "now": a stream obtained later does not replay earlier events.
//! Errors carry a [`CallingErrorKind`](crate::core::CallingErrorKind) so retry
//! decisions never depend on message text.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};

use crate::core::{CallStateError, CallingError};
use crate::views::{
    AudioOperationalStatus, AudioRoute, CallStatus, CameraDeviceSelectionStatus,
    CameraOperationalStatus, MediaDiagnostic, NetworkQuality, ParticipantId, ParticipantRole,
    RemoteParticipant,
};

/// Push-based engine event stream
pub type EventStream<T> = BoxStream<'static, T>;

// =============================================================================
// Event Types
// =============================================================================

/// Call status report, with the error that accompanied it if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallInfo {
    /// Reported status
    pub status: CallStatus,
    /// Error behind the status (set on abnormal termination)
    pub error: Option<CallStateError>,
}

impl CallInfo {
    /// Status without an error
    pub fn status(status: CallStatus) -> Self {
        Self {
            status,
            error: None,
        }
    }

    /// Status with an accompanying error
    pub fn with_error(status: CallStatus, error: CallStateError) -> Self {
        Self {
            status,
            error: Some(error),
        }
    }
}

/// Roster snapshot from the engine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterUpdate {
    /// Participants currently known
    pub participants: Vec<RemoteParticipant>,
    /// Engine-reported total
    pub total_count: usize,
}

/// Network or media diagnostic raised by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticEvent {
    /// Network quality bucket changed
    NetworkQuality(NetworkQuality),
    /// Media diagnostic raised or cleared
    Media {
        /// Which diagnostic
        diagnostic: MediaDiagnostic,
        /// Raised (true) or cleared (false)
        active: bool,
    },
}

// =============================================================================
// Bridge Trait
// =============================================================================

/// Bridge trait for calling-engine operations
///
/// - **Decoupling**: the core does not know which engine it drives
/// - **Testability**: scripted implementations drive every middleware path
/// - **Typed failures**: every operation reports a [`CallingError`]
#[async_trait]
pub trait CallingBridge: Send + Sync {
    // =========================================================================
    // Call Control
    // =========================================================================

    /// Prepare the engine (devices, preview) before joining
    async fn setup_call(&self) -> Result<(), CallingError>;

    /// Join the call; returns the engine call id
    async fn start_call(
        &self,
        camera: CameraOperationalStatus,
        audio: AudioOperationalStatus,
    ) -> Result<String, CallingError>;

    /// Hang up
    async fn end_call(&self) -> Result<(), CallingError>;

    /// Put the call on hold
    async fn hold(&self) -> Result<(), CallingError>;

    /// Resume a held call
    async fn resume(&self) -> Result<(), CallingError>;

    // =========================================================================
    // Camera
    // =========================================================================

    /// Start sending local video; returns the new stream id
    async fn turn_camera_on(&self) -> Result<String, CallingError>;

    /// Stop the local camera
    async fn turn_camera_off(&self) -> Result<(), CallingError>;

    /// Start local preview without transmitting; returns the preview stream id
    async fn turn_camera_preview_on(&self) -> Result<String, CallingError>;

    /// Toggle front/back; returns the device now selected
    async fn switch_camera(&self) -> Result<CameraDeviceSelectionStatus, CallingError>;

    // =========================================================================
    // Microphone
    // =========================================================================

    /// Unmute
    async fn turn_mic_on(&self) -> Result<(), CallingError>;

    /// Mute
    async fn turn_mic_off(&self) -> Result<(), CallingError>;

    // =========================================================================
    // Lobby
    // =========================================================================

    /// Admit one lobby participant
    async fn admit(&self, participant: &str) -> Result<(), CallingError>;

    /// Decline one lobby participant
    async fn decline(&self, participant: &str) -> Result<(), CallingError>;

    /// Admit everyone waiting in the lobby
    async fn admit_all(&self) -> Result<(), CallingError>;

    // =========================================================================
    // Audio Routing & Captions
    // =========================================================================

    /// Forward a route to the external telecom integration
    async fn set_external_audio_route(&self, route: AudioRoute) -> Result<(), CallingError>;

    /// Start live captions
    async fn start_captions(&self, language: Option<String>) -> Result<(), CallingError>;

    /// Stop live captions
    async fn stop_captions(&self) -> Result<(), CallingError>;

    // =========================================================================
    // Event Streams
    // =========================================================================

    /// Call status and termination errors
    fn call_info_stream(&self) -> EventStream<CallInfo>;

    /// Remote roster snapshots
    fn participants_stream(&self) -> EventStream<RosterUpdate>;

    /// Dominant speakers, most recent first
    fn dominant_speakers_stream(&self) -> EventStream<Vec<ParticipantId>>;

    /// Number of cameras on the device
    fn cameras_count_stream(&self) -> EventStream<u32>;

    /// Recording flag
    fn recording_stream(&self) -> EventStream<bool>;

    /// Transcription flag
    fn transcribing_stream(&self) -> EventStream<bool>;

    /// Local participant role
    fn local_role_stream(&self) -> EventStream<ParticipantRole>;

    /// Network and media diagnostics
    fn diagnostics_stream(&self) -> EventStream<DiagnosticEvent>;
}

/// Shared bridge handle
pub type BoxedCallingBridge = Arc<dyn CallingBridge>;

// =============================================================================
// Offline Implementation
// =============================================================================

/// Bridge with no engine behind it.
///
/// Every operation fails with `NotConnected` and every stream ends
/// immediately. Useful for driving the presentation layer headless.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineCallingBridge;

impl OfflineCallingBridge {
    /// Create a new offline bridge
    pub fn new() -> Self {
        Self
    }

    fn unavailable<T>(operation: &str) -> Result<T, CallingError> {
        Err(CallingError::not_connected(format!(
            "{operation} not available in offline mode"
        )))
    }
}

#[async_trait]
impl CallingBridge for OfflineCallingBridge {
    async fn setup_call(&self) -> Result<(), CallingError> {
        Self::unavailable("setup_call")
    }

    async fn start_call(
        &self,
        _camera: CameraOperationalStatus,
        _audio: AudioOperationalStatus,
    ) -> Result<String, CallingError> {
        Self::unavailable("start_call")
    }

    async fn end_call(&self) -> Result<(), CallingError> {
        Self::unavailable("end_call")
    }

    async fn hold(&self) -> Result<(), CallingError> {
        Self::unavailable("hold")
    }

    async fn resume(&self) -> Result<(), CallingError> {
        Self::unavailable("resume")
    }

    async fn turn_camera_on(&self) -> Result<String, CallingError> {
        Self::unavailable("turn_camera_on")
    }

    async fn turn_camera_off(&self) -> Result<(), CallingError> {
        Self::unavailable("turn_camera_off")
    }

    async fn turn_camera_preview_on(&self) -> Result<String, CallingError> {
        Self::unavailable("turn_camera_preview_on")
    }

    async fn switch_camera(&self) -> Result<CameraDeviceSelectionStatus, CallingError> {
        Self::unavailable("switch_camera")
    }

    async fn turn_mic_on(&self) -> Result<(), CallingError> {
        Self::unavailable("turn_mic_on")
    }

    async fn turn_mic_off(&self) -> Result<(), CallingError> {
        Self::unavailable("turn_mic_off")
    }

    async fn admit(&self, _participant: &str) -> Result<(), CallingError> {
        Self::unavailable("admit")
    }

    async fn decline(&self, _participant: &str) -> Result<(), CallingError> {
        Self::unavailable("decline")
    }

    async fn admit_all(&self) -> Result<(), CallingError> {
        Self::unavailable("admit_all")
    }

    async fn set_external_audio_route(&self, _route: AudioRoute) -> Result<(), CallingError> {
        Self::unavailable("set_external_audio_route")
    }

    async fn start_captions(&self, _language: Option<String>) -> Result<(), CallingError> {
        Self::unavailable("start_captions")
    }

    async fn stop_captions(&self) -> Result<(), CallingError> {
        Self::unavailable("stop_captions")
    }

    fn call_info_stream(&self) -> EventStream<CallInfo> {
        stream::empty().boxed()
    }

    fn participants_stream(&self) -> EventStream<RosterUpdate> {
        stream::empty().boxed()
    }

    fn dominant_speakers_stream(&self) -> EventStream<Vec<ParticipantId>> {
        stream::empty().boxed()
    }

    fn cameras_count_stream(&self) -> EventStream<u32> {
        stream::empty().boxed()
    }

    fn recording_stream(&self) -> EventStream<bool> {
        stream::empty().boxed()
    }

    fn transcribing_stream(&self) -> EventStream<bool> {
        stream::empty().boxed()
    }

    fn local_role_stream(&self) -> EventStream<ParticipantRole> {
        stream::empty().boxed()
    }

    fn diagnostics_stream(&self) -> EventStream<DiagnosticEvent> {
        stream::empty().boxed()
    }
}
