//! # Local Participant View State
//!
//! Camera and microphone state for the local user. The in-flight variants
//! (`Pending`, `Switching`, `*Requested`) double as per-resource locks:
//! while one is set, the middleware drops new requests for that resource.

use serde::{Deserialize, Serialize};

use crate::core::CallingError;

// ============================================================================
// Camera
// ============================================================================

/// Operational status of the local camera
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraOperationalStatus {
    /// Camera is off
    #[default]
    Off,
    /// An on/off/pause/resume request is in flight
    Pending,
    /// Camera is on
    On,
    /// Camera was turned off by the app going to background
    Paused,
    /// A front/back switch is in flight
    Switching,
}

impl CameraOperationalStatus {
    /// Whether a camera request is in flight
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Pending | Self::Switching)
    }
}

/// Which physical camera is selected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraDeviceSelectionStatus {
    /// Front-facing camera
    #[default]
    Front,
    /// Back-facing camera
    Back,
    /// A switch is in flight
    Switching,
}

impl CameraDeviceSelectionStatus {
    /// The device a successful switch from `self` lands on
    #[must_use]
    pub fn toggled(&self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
            Self::Switching => Self::Switching,
        }
    }
}

/// Where the local video is being sent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraTransmissionStatus {
    /// Local preview only
    #[default]
    Local,
    /// Sent to remote participants
    Remote,
}

/// Local camera state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraState {
    /// Operational status
    pub operation: CameraOperationalStatus,
    /// Selected device
    pub device: CameraDeviceSelectionStatus,
    /// Transmission target
    pub transmission: CameraTransmissionStatus,
    /// Number of cameras the device exposes
    pub cameras_count: u32,
    /// Identifier of the current local video stream
    pub video_stream_id: Option<String>,
    /// Last camera failure
    pub error: Option<CallingError>,
}

// ============================================================================
// Audio
// ============================================================================

/// Operational status of the local microphone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioOperationalStatus {
    /// Microphone muted
    #[default]
    Off,
    /// Microphone live
    On,
    /// A mute/unmute request is in flight
    Pending,
}

/// Audio output devices the composite can route to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioDevice {
    /// Loudspeaker
    Speaker,
    /// Earpiece / receiver
    Receiver,
    /// Bluetooth headset over SCO
    BluetoothSco,
}

/// Routing identifier understood by an external telecom integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioRoute(pub u32);

impl AudioRoute {
    /// Earpiece route
    pub const EARPIECE: AudioRoute = AudioRoute(1);
    /// Bluetooth route
    pub const BLUETOOTH: AudioRoute = AudioRoute(2);
    /// Wired headset route
    pub const WIRED_HEADSET: AudioRoute = AudioRoute(4);
    /// Speaker route
    pub const SPEAKER: AudioRoute = AudioRoute(8);
}

impl AudioDevice {
    /// Routing identifier for this device
    #[must_use]
    pub fn route(&self) -> AudioRoute {
        match self {
            Self::Speaker => AudioRoute::SPEAKER,
            Self::Receiver => AudioRoute::EARPIECE,
            Self::BluetoothSco => AudioRoute::BLUETOOTH,
        }
    }
}

/// Whether the device selection is settled or still being applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionPhase {
    /// Change requested, routing not confirmed yet
    Requested,
    /// Routing confirmed
    Selected,
}

/// Device selection: which device, and whether routing is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioDeviceSelectionStatus {
    /// Target device
    pub device: AudioDevice,
    /// Requested or selected
    pub phase: SelectionPhase,
}

impl AudioDeviceSelectionStatus {
    /// A settled selection
    #[must_use]
    pub fn selected(device: AudioDevice) -> Self {
        Self {
            device,
            phase: SelectionPhase::Selected,
        }
    }

    /// A pending selection
    #[must_use]
    pub fn requested(device: AudioDevice) -> Self {
        Self {
            device,
            phase: SelectionPhase::Requested,
        }
    }

    /// Whether a device change is in flight
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.phase == SelectionPhase::Requested
    }
}

impl Default for AudioDeviceSelectionStatus {
    fn default() -> Self {
        Self::selected(AudioDevice::Speaker)
    }
}

/// Bluetooth headset availability
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BluetoothState {
    /// A headset is connected
    pub available: bool,
    /// Headset name, if reported
    pub device_name: Option<String>,
}

/// Local microphone and routing state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioState {
    /// Operational status
    pub operation: AudioOperationalStatus,
    /// Output device selection
    pub device: AudioDeviceSelectionStatus,
    /// Bluetooth headset availability
    pub bluetooth: BluetoothState,
    /// Last audio failure
    pub error: Option<CallingError>,
}

// ============================================================================
// Participant
// ============================================================================

/// Role of a participant in the call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticipantRole {
    /// Role not reported
    #[default]
    Unknown,
    /// Regular attendee
    Attendee,
    /// Can present
    Presenter,
    /// Meeting organizer
    Organizer,
    /// Receive-only
    Consumer,
}

/// Local participant state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalUserState {
    /// Camera state
    pub camera: CameraState,
    /// Microphone and routing state
    pub audio: AudioState,
    /// Name shown to other participants
    pub display_name: Option<String>,
    /// Local role
    pub role: ParticipantRole,
}
