//! Per-session composition root.
//!
//! One `CallSession` owns one store. Nothing is global: two sessions in the
//! same process share no state.

use std::sync::Arc;

use super::{Action, CallCompositeConfig, CallingAction, NavigationAction, StoreError};
use crate::calling_bridge::BoxedCallingBridge;
use crate::middleware::CallingMiddleware;
use crate::store::{StateStream, Store, StoreHandle};
use crate::views::{AppState, OperationStatus};

/// A running composite session
pub struct CallSession {
    store: Store,
    config: CallCompositeConfig,
}

impl CallSession {
    /// Build the store, install the calling middleware, and prepare the call.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start(config: CallCompositeConfig, bridge: BoxedCallingBridge) -> Self {
        let store = Store::builder(initial_state(&config))
            .middleware(CallingMiddleware::new(bridge, config.clone()))
            .build();
        tracing::info!(
            telecom = ?config.telecom_integration,
            skip_setup = config.skip_setup_screen,
            "call session started"
        );
        if store.dispatch(CallingAction::SetupCallRequested).is_err() {
            tracing::warn!("store closed before setup");
        }
        Self { store, config }
    }

    /// Join the call from the setup screen
    pub fn join(&self) -> Result<(), StoreError> {
        self.store.handle().dispatch_all(join_actions())
    }

    /// Leave the call
    pub fn leave(&self) -> Result<(), StoreError> {
        self.store.dispatch(CallingAction::CallEndRequested)
    }

    /// Dispatch any action
    pub fn dispatch(&self, action: impl Into<Action>) -> Result<(), StoreError> {
        self.store.dispatch(action)
    }

    /// Latest committed snapshot
    pub fn current_state(&self) -> Arc<AppState> {
        self.store.current_state()
    }

    /// Snapshot stream, current snapshot first
    pub fn subscribe(&self) -> StateStream {
        self.store.subscribe()
    }

    /// Handle for dispatching from other tasks
    pub fn handle(&self) -> StoreHandle {
        self.store.handle()
    }

    /// Configuration the session was started with
    pub fn config(&self) -> &CallCompositeConfig {
        &self.config
    }
}

/// Actions that move from setup into the call
pub(crate) fn join_actions() -> Vec<Action> {
    vec![
        CallingAction::CallStartRequested.into(),
        NavigationAction::CallLaunched.into(),
    ]
}

/// Seed state for a session
pub fn initial_state(config: &CallCompositeConfig) -> AppState {
    let mut state = AppState::default();
    state.local_user.display_name = config.display_name.clone();
    state.local_user.role = config.role;
    if config.skip_setup_screen {
        state.call.operation_status = OperationStatus::SkipSetupScreen;
    }
    state
}
