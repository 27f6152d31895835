//! # Callkit App - Headless Calling Orchestration
//!
//! This crate keeps the single authoritative state of a calling composite and
//! coordinates every asynchronous interaction with the calling engine, so the
//! presentation layer reacts to one consistent, ordered sequence of snapshots.
//!
//! ## Architecture
//!
//! ```text
//! UI / host ──dispatch(Action)──► Store ──► CallingMiddleware ──► CallingBridge
//!     ▲                             │              │                   │
//!     │                             ▼              └── *Succeeded ◄────┘
//!     └──── subscribe() ◄──── AppState snapshots       / *Failed
//! ```
//!
//! - **Actions** ([`core::Action`]): closed, per-domain enums
//! - **State** ([`views::AppState`]): immutable snapshot of every sub-state
//! - **Reducer** ([`core::reduce`]): pure `(state, action) -> state`
//! - **Store** ([`store::Store`]): single writer, ordered, change-only publication
//! - **Bridge** ([`calling_bridge::CallingBridge`]): the engine, as async
//!   operations and event streams
//! - **Middleware** ([`middleware::CallingMiddleware`]): effect handlers for
//!   camera, audio, lifecycle, call control, lobby, captions
//!
//! ## Usage
//!
//! ```rust,ignore
//! use callkit_app::{CallCompositeConfig, CallSession, TelecomIntegration};
//!
//! let config = CallCompositeConfig::default()
//!     .with_telecom_integration(TelecomIntegration::SdkProvided);
//! let session = CallSession::start(config, engine_bridge);
//!
//! let mut states = session.subscribe();
//! session.join()?;
//! while let Some(state) = states.next().await {
//!     render(&state);
//! }
//! ```
//!
//! The crate installs no `tracing` subscriber; hosts choose their own.

pub mod calling_bridge;
pub mod core;
pub mod middleware;
pub mod store;
pub mod views;

mod task_registry;

pub use calling_bridge::{
    BoxedCallingBridge, CallInfo, CallingBridge, DiagnosticEvent, EventStream,
    OfflineCallingBridge, RosterUpdate,
};
pub use crate::core::{
    Action, CallCompositeConfig, CallSession, CallingError, CallingErrorKind, StoreError,
    TelecomIntegration,
};
pub use middleware::CallingMiddleware;
pub use store::{Flow, Middleware, StateStream, Store, StoreBuilder, StoreHandle};
pub use views::AppState;
