//! # View State Module
//!
//! This module contains the state types that make up one [`AppState`]
//! snapshot. These types are plain data and can be:
//!
//! - Serialized for debugging
//! - Compared for change detection before publication
//! - Cloned freely by subscribers

mod state;

pub mod audio_session;
pub mod call;
pub mod captions;
pub mod diagnostics;
pub mod errors;
pub mod local_user;
pub mod navigation;
pub mod permissions;
pub mod remote_participants;

pub use state::{AppState, ForegroundCamera};

// Re-export state types for convenience
pub use audio_session::{AudioFocusStatus, AudioSessionState};
pub use call::{CallState, CallStatus, OperationStatus};
pub use captions::{CaptionsState, CaptionsStatus};
pub use diagnostics::{CallDiagnosticsState, MediaDiagnostic, NetworkQuality};
pub use errors::ErrorState;
pub use local_user::{
    AudioDevice, AudioDeviceSelectionStatus, AudioOperationalStatus, AudioRoute, AudioState,
    BluetoothState, CameraDeviceSelectionStatus, CameraOperationalStatus, CameraState,
    CameraTransmissionStatus, LocalUserState, ParticipantRole, SelectionPhase,
};
pub use navigation::{LifecycleState, LifecycleStatus, NavigationState, NavigationStatus};
pub use permissions::{PermissionState, PermissionStatus};
pub use remote_participants::{
    ParticipantId, ParticipantStatus, RemoteParticipant, RemoteParticipantsState, StreamKind,
    VideoStream,
};
