//! Error types for the orchestration core
//!
//! Provides structured error types that enable:
//! - Typed retry decisions (transient vs permanent engine failures)
//! - Call-termination classification (back to setup vs exit)
//! - Failure actions that carry their original cause to the presentation layer

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Engine Errors
// ============================================================================

/// Classification of a calling-engine failure.
///
/// Engines report a kind instead of free text so retry eligibility never
/// depends on message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallingErrorKind {
    /// The request was made while the resource could not accept it
    PreconditionViolation,
    /// The camera session was torn down underneath us; recoverable by
    /// restarting the camera
    CameraSessionNotInitialized,
    /// No usable camera
    CameraUnavailable,
    /// The OS refused access to a device
    PermissionDenied,
    /// Connectivity failure
    NetworkFailure,
    /// No call or engine to talk to
    NotConnected,
    /// Any other engine failure
    Engine,
}

impl CallingErrorKind {
    /// Short label for logging
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::PreconditionViolation => "precondition_violation",
            Self::CameraSessionNotInitialized => "camera_session_not_initialized",
            Self::CameraUnavailable => "camera_unavailable",
            Self::PermissionDenied => "permission_denied",
            Self::NetworkFailure => "network_failure",
            Self::NotConnected => "not_connected",
            Self::Engine => "engine",
        }
    }
}

impl fmt::Display for CallingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Failure reported by the calling bridge, or raised locally when a
/// precondition does not hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct CallingError {
    /// Classification
    pub kind: CallingErrorKind,
    /// Human-readable cause
    pub message: String,
}

impl CallingError {
    /// Create an error of the given kind
    pub fn new(kind: CallingErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Request made while the resource is not in a state that permits it
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::new(CallingErrorKind::PreconditionViolation, message)
    }

    /// Camera session lost; eligible for the one-shot camera restart
    pub fn camera_session_not_initialized(message: impl Into<String>) -> Self {
        Self::new(CallingErrorKind::CameraSessionNotInitialized, message)
    }

    /// No engine available
    pub fn not_connected(message: impl Into<String>) -> Self {
        Self::new(CallingErrorKind::NotConnected, message)
    }

    /// Generic engine failure
    pub fn engine(message: impl Into<String>) -> Self {
        Self::new(CallingErrorKind::Engine, message)
    }

    /// Whether a bounded recovery may be attempted
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.kind == CallingErrorKind::CameraSessionNotInitialized
    }

    /// Whether this was raised locally without contacting the engine
    #[must_use]
    pub fn is_precondition_violation(&self) -> bool {
        self.kind == CallingErrorKind::PreconditionViolation
    }
}

// ============================================================================
// Call-level Errors
// ============================================================================

/// Error codes attached to call terminations and fatal failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Engine could not be prepared
    CallSetupFailed,
    /// Call could not be started
    CallStartFailed,
    /// Joining failed after the call started
    CallJoinFailed,
    /// The call ended abnormally
    CallEndFailed,
    /// Credentials expired
    TokenExpired,
    /// Connectivity lost
    NetworkFailure,
    /// Microphone could not be acquired
    MicrophoneNotAvailable,
}

/// Distinguishing event behind a call termination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallEventCode {
    /// Removed by another participant
    CallEvicted,
    /// Declined from the lobby or by the callee
    CallDeclined,
}

/// Error reported together with a call status
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[error("call state error {code:?} (event: {event_code:?})")]
pub struct CallStateError {
    /// Error code
    pub code: ErrorCode,
    /// Distinguishing event, when applicable
    pub event_code: Option<CallEventCode>,
}

impl CallStateError {
    /// Error without an event code
    #[must_use]
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            event_code: None,
        }
    }

    /// Error with an event code
    #[must_use]
    pub fn with_event(code: ErrorCode, event_code: CallEventCode) -> Self {
        Self {
            code,
            event_code: Some(event_code),
        }
    }
}

/// Error that ends the composite session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[error("fatal {code:?}: {cause}")]
pub struct FatalError {
    /// Error code
    pub code: ErrorCode,
    /// Original engine failure
    pub cause: CallingError,
}

/// Call-control operations whose failures are surfaced without ending the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallOperation {
    /// Hang up
    End,
    /// Put on hold
    Hold,
    /// Resume from hold
    Resume,
}

/// Failed call-control operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[error("{operation:?} failed: {cause}")]
pub struct OperationError {
    /// What was attempted
    pub operation: CallOperation,
    /// Original engine failure
    pub cause: CallingError,
}

/// Lobby admit/decline failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LobbyErrorCode {
    /// Lobby is disabled by policy
    LobbyDisabledByConfigurations,
    /// Local role may not admit or decline
    LobbyMeetingRoleNotAllowed,
    /// Conversation type does not support lobby actions
    LobbyConversationTypeNotSupported,
    /// Participant is no longer in the lobby
    RemoveParticipantOperationFailure,
    /// Anything else
    UnknownError,
}

impl LobbyErrorCode {
    /// Map an engine failure to the lobby code shown to the user
    #[must_use]
    pub fn from_error(error: &CallingError) -> Self {
        match error.kind {
            CallingErrorKind::PreconditionViolation => Self::RemoveParticipantOperationFailure,
            CallingErrorKind::PermissionDenied => Self::LobbyMeetingRoleNotAllowed,
            _ => Self::UnknownError,
        }
    }
}

// ============================================================================
// Store Errors
// ============================================================================

/// Errors returned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The session's store loop has stopped; nothing more is applied
    #[error("store is closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_camera_session_loss_is_transient() {
        assert!(CallingError::camera_session_not_initialized("lost").is_transient());
        assert!(!CallingError::engine("boom").is_transient());
        assert!(!CallingError::precondition("camera off").is_transient());
        assert!(!CallingError::new(CallingErrorKind::NetworkFailure, "down").is_transient());
    }

    #[test]
    fn display_includes_kind_and_message() {
        let err = CallingError::engine("device busy");
        assert_eq!(err.to_string(), "engine: device busy");
    }

    #[test]
    fn lobby_code_from_error() {
        let err = CallingError::precondition("gone");
        assert_eq!(
            LobbyErrorCode::from_error(&err),
            LobbyErrorCode::RemoveParticipantOperationFailure
        );
        assert_eq!(
            LobbyErrorCode::from_error(&CallingError::engine("x")),
            LobbyErrorCode::UnknownError
        );
    }
}
