//! # Core Module
//!
//! This module contains the core types and logic:
//!
//! - [`Action`]: Intents and outcomes dispatched into the store
//! - [`reduce`]: The pure state transition function
//! - [`CallCompositeConfig`]: Session configuration
//! - [`CallSession`]: Per-session composition root
//! - [`CallingError`]: Typed engine failures

mod action;
mod config;
mod error;
mod reducer;
mod session;

pub use action::{
    Action, AudioSessionAction, CallDiagnosticsAction, CallingAction, CaptionsAction,
    ErrorAction, LifecycleAction, LocalParticipantAction, NavigationAction, ParticipantAction,
    PermissionAction, RecoveryOutcome,
};
pub use config::{CallCompositeConfig, TelecomIntegration};
pub use error::{
    CallEventCode, CallOperation, CallStateError, CallingError, CallingErrorKind, ErrorCode,
    FatalError, LobbyErrorCode, OperationError, StoreError,
};
pub use reducer::{reduce, AppReducer, Reducer};
pub use session::{initial_state, CallSession};
pub(crate) use session::join_actions;
