//! Store + calling middleware + mock bridge, wired the way a session is
//!
//! ```rust,ignore
//! let session = TestSession::builder()
//!     .in_call(CameraOperationalStatus::On)
//!     .build();
//! session.dispatch(LocalParticipantAction::SwitchCamera);
//! session.wait_for(LocalParticipantAction::CameraSwitchSucceeded { .. }).await;
//! ```
//!
//! Unlike `CallSession::start`, the harness does not request setup; tests
//! begin from whatever state the builder was given.

use std::sync::Arc;
use std::time::Duration;

use callkit_app::core::CallCompositeConfig;
use callkit_app::views::{CallStatus, CameraOperationalStatus, LifecycleStatus};
use callkit_app::{Action, AppState, CallingMiddleware, Store, StoreHandle};

use crate::mock_bridge::MockCallingBridge;
use crate::recording::RecordingMiddleware;

/// Upper bound for waiting on asynchronous outcomes
pub const WAIT: Duration = Duration::from_secs(2);

/// Builder for [`TestSession`]
#[derive(Debug, Default)]
pub struct TestSessionBuilder {
    state: AppState,
    config: CallCompositeConfig,
    bridge: Option<MockCallingBridge>,
}

impl TestSessionBuilder {
    /// Start from `state`
    pub fn state(mut self, state: AppState) -> Self {
        self.state = state;
        self
    }

    /// Connected call with the camera in `camera`
    pub fn in_call(mut self, camera: CameraOperationalStatus) -> Self {
        self.state.call.status = CallStatus::Connected;
        self.state.local_user.camera.operation = camera;
        if camera == CameraOperationalStatus::On {
            self.state.local_user.camera.video_stream_id = Some("stream-0".to_string());
        }
        self
    }

    /// Override the call status
    pub fn call_status(mut self, status: CallStatus) -> Self {
        self.state.call.status = status;
        self
    }

    /// Start in background
    pub fn in_background(mut self) -> Self {
        self.state.lifecycle.status = LifecycleStatus::Background;
        self
    }

    /// Session configuration
    pub fn config(mut self, config: CallCompositeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a pre-scripted bridge
    pub fn bridge(mut self, bridge: MockCallingBridge) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Spawn the store on the current runtime
    pub fn build(self) -> TestSession {
        let bridge = self.bridge.unwrap_or_default();
        let recorder = RecordingMiddleware::new();
        let store = Store::builder(self.state)
            .middleware(recorder.clone())
            .middleware(CallingMiddleware::new(Arc::new(bridge.clone()), self.config))
            .build();
        TestSession {
            store,
            bridge,
            recorder,
        }
    }
}

/// A running store driven against [`MockCallingBridge`]
pub struct TestSession {
    store: Store,
    /// The engine double
    pub bridge: MockCallingBridge,
    /// Every action the store admitted
    pub recorder: RecordingMiddleware,
}

impl TestSession {
    pub fn builder() -> TestSessionBuilder {
        TestSessionBuilder::default()
    }

    pub fn handle(&self) -> StoreHandle {
        self.store.handle()
    }

    /// Dispatch one action; panics if the store is closed
    pub fn dispatch(&self, action: impl Into<Action>) {
        self.store.dispatch(action).expect("store is running");
    }

    /// Dispatch a batch; panics if the store is closed
    pub fn dispatch_all(&self, actions: Vec<Action>) {
        self.store
            .handle()
            .dispatch_all(actions)
            .expect("store is running");
    }

    /// Wait for every admitted action to be applied
    pub async fn flush(&self) {
        self.store.flush().await.expect("store is running");
    }

    /// Committed state after a flush
    pub async fn state(&self) -> Arc<AppState> {
        self.flush().await;
        self.store.current_state()
    }

    /// Wait until `action` has been recorded, then until it is applied
    pub async fn wait_for(&self, action: impl Into<Action>) {
        self.wait_for_count(action, 1).await;
    }

    /// Wait until `action` has been recorded `times` times, then flush
    pub async fn wait_for_count(&self, action: impl Into<Action>, times: usize) {
        let action = action.into();
        let seen = self.recorder.wait_for_count(&action, times, WAIT).await;
        assert!(
            seen,
            "timed out waiting for {action:?} x{times}; recorded: {:#?}",
            self.recorder.actions()
        );
        self.flush().await;
    }

    /// Wait until an action matching `predicate` has been recorded, then flush
    pub async fn wait_for_match<F>(&self, predicate: F) -> Action
    where
        F: Fn(&Action) -> bool,
    {
        let seen = self
            .recorder
            .wait_until(|actions| actions.iter().any(&predicate), WAIT)
            .await;
        assert!(
            seen,
            "timed out waiting for a matching action; recorded: {:#?}",
            self.recorder.actions()
        );
        self.flush().await;
        self.recorder
            .actions()
            .into_iter()
            .find(|action| predicate(action))
            .expect("matching action was recorded")
    }

    /// Let spawned handler tasks run, then flush.
    ///
    /// For asserting that something did not happen.
    pub async fn settle(&self) {
        for _ in 0..5 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.flush().await;
        }
    }

    /// Recorded actions in apply order
    pub fn actions(&self) -> Vec<Action> {
        self.recorder.actions()
    }
}
