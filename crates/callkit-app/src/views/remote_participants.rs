//! # Remote Participants View State

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::LobbyErrorCode;

/// Engine-side identifier of a participant
pub type ParticipantId = String;

/// Connection status of a remote participant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticipantStatus {
    /// Not yet in the call
    #[default]
    Idle,
    /// Joining
    Connecting,
    /// Being rung
    Ringing,
    /// In the call
    Connected,
    /// Put the call on hold
    Hold,
    /// Waiting in the lobby for admission
    InLobby,
    /// Left the call
    Disconnected,
}

/// Kind of a remote video stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamKind {
    /// Camera video
    Video,
    /// Screen sharing
    ScreenSharing,
}

/// A remote video stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStream {
    /// Stream identifier
    pub stream_id: String,
    /// What the stream carries
    pub kind: StreamKind,
}

/// Snapshot of one remote participant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteParticipant {
    /// Participant identifier
    pub id: ParticipantId,
    /// Name shown in the roster
    pub display_name: String,
    /// Muted
    pub is_muted: bool,
    /// Currently speaking
    pub is_speaking: bool,
    /// Camera stream, if any
    pub camera_stream: Option<VideoStream>,
    /// Screen share stream, if any
    pub screen_share_stream: Option<VideoStream>,
    /// Connection status
    pub status: ParticipantStatus,
}

impl RemoteParticipant {
    /// Whether this participant is waiting in the lobby
    #[must_use]
    pub fn is_in_lobby(&self) -> bool {
        self.status == ParticipantStatus::InLobby
    }
}

/// Remote roster state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteParticipantsState {
    /// Participants keyed by id
    pub participants: HashMap<ParticipantId, RemoteParticipant>,
    /// Engine-reported total (may exceed the roster for large calls)
    pub total_participant_count: usize,
    /// Dominant speakers, most recent first
    pub dominant_speakers: Vec<ParticipantId>,
    /// Bumped on every roster change
    pub modified_timestamp: u64,
    /// Last lobby admit/decline failure
    pub lobby_error_code: Option<LobbyErrorCode>,
}

impl RemoteParticipantsState {
    /// Ids of participants waiting in the lobby, sorted for stable display
    #[must_use]
    pub fn lobby_participants(&self) -> Vec<&ParticipantId> {
        let mut ids: Vec<_> = self
            .participants
            .values()
            .filter(|p| p.is_in_lobby())
            .map(|p| &p.id)
            .collect();
        ids.sort();
        ids
    }
}
