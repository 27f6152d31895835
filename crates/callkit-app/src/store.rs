//! # Store
//!
//! Single-writer state container for one composite session.
//!
//! ```text
//! producers ──dispatch──► mpsc queue ──► writer loop ──► watch<Arc<AppState>>
//!                                         │  middleware (may Consume)
//!                                         │  reducer
//!                                         └─ publish if changed
//! ```
//!
//! Any number of tasks may dispatch concurrently; admission is serialized by
//! the queue and the loop applies one action at a time. A batch submitted
//! with [`StoreHandle::dispatch_all`] is one queue item and is applied
//! back-to-back, so nothing dispatched elsewhere lands in the middle of it.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;

use crate::core::{Action, AppReducer, Reducer, StoreError};
use crate::views::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Middleware
// ─────────────────────────────────────────────────────────────────────────────

/// What happens to an action after a middleware has seen it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    /// Pass the action on to the next middleware and the reducer
    Continue,
    /// Drop the action; it never reaches the reducer
    Consume,
}

/// Effect handler run by the writer loop before the reducer.
///
/// `state` is the committed snapshot the reducer is about to apply `action`
/// to. Implementations must not block: anything asynchronous is spawned, and
/// its outcome comes back through `store.dispatch`.
pub trait Middleware: Send + Sync {
    /// Inspect `action`, start effects, and decide whether it continues
    fn handle(&self, action: &Action, state: &AppState, store: &StoreHandle) -> Flow;
}

// ─────────────────────────────────────────────────────────────────────────────
// Handle
// ─────────────────────────────────────────────────────────────────────────────

enum Command {
    Dispatch(Vec<Action>),
    Flush(oneshot::Sender<()>),
}

/// Cheap, cloneable access to a running store
#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::UnboundedSender<Command>,
    state_rx: watch::Receiver<Arc<AppState>>,
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle")
            .field("closed", &self.tx.is_closed())
            .finish_non_exhaustive()
    }
}

impl StoreHandle {
    /// Enqueue one action
    pub fn dispatch(&self, action: impl Into<Action>) -> Result<(), StoreError> {
        self.send(Command::Dispatch(vec![action.into()]))
    }

    /// Enqueue a batch applied in order with nothing interleaved
    pub fn dispatch_all(&self, actions: Vec<Action>) -> Result<(), StoreError> {
        if actions.is_empty() {
            return Ok(());
        }
        self.send(Command::Dispatch(actions))
    }

    /// Latest committed snapshot
    pub fn current_state(&self) -> Arc<AppState> {
        self.state_rx.borrow().clone()
    }

    /// Snapshots in commit order, starting with the current one.
    ///
    /// Slow subscribers see the latest snapshot, not every intermediate one.
    pub fn subscribe(&self) -> StateStream {
        StateStream {
            inner: WatchStream::new(self.state_rx.clone()),
        }
    }

    /// Resolve once every action admitted before this call has been applied
    pub async fn flush(&self) -> Result<(), StoreError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.send(Command::Flush(done_tx))?;
        done_rx.await.map_err(|_| StoreError::Closed)
    }

    /// Whether the writer loop has stopped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn send(&self, command: Command) -> Result<(), StoreError> {
        self.tx.send(command).map_err(|_| {
            tracing::warn!("dispatch after store shutdown");
            StoreError::Closed
        })
    }
}

/// Stream of committed snapshots
pub struct StateStream {
    inner: WatchStream<Arc<AppState>>,
}

impl Stream for StateStream {
    type Item = Arc<AppState>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Store
// ─────────────────────────────────────────────────────────────────────────────

/// Owner of the writer loop. Dropping it stops the loop; outstanding
/// handles then report [`StoreError::Closed`].
pub struct Store {
    handle: StoreHandle,
    task: JoinHandle<()>,
}

impl Store {
    /// Start building a store seeded with `initial`
    pub fn builder(initial: AppState) -> StoreBuilder {
        StoreBuilder {
            initial,
            middleware: Vec::new(),
            reducer: Arc::new(AppReducer),
        }
    }

    /// A handle for dispatching and observing
    pub fn handle(&self) -> StoreHandle {
        self.handle.clone()
    }

    /// See [`StoreHandle::dispatch`]
    pub fn dispatch(&self, action: impl Into<Action>) -> Result<(), StoreError> {
        self.handle.dispatch(action)
    }

    /// See [`StoreHandle::current_state`]
    pub fn current_state(&self) -> Arc<AppState> {
        self.handle.current_state()
    }

    /// See [`StoreHandle::subscribe`]
    pub fn subscribe(&self) -> StateStream {
        self.handle.subscribe()
    }

    /// See [`StoreHandle::flush`]
    pub async fn flush(&self) -> Result<(), StoreError> {
        self.handle.flush().await
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Builder for [`Store`]
pub struct StoreBuilder {
    initial: AppState,
    middleware: Vec<Arc<dyn Middleware>>,
    reducer: Arc<dyn Reducer>,
}

impl StoreBuilder {
    /// Append a middleware; middleware runs in insertion order
    pub fn middleware(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Append a shared middleware
    pub fn middleware_arc(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Replace the reducer
    pub fn reducer(mut self, reducer: impl Reducer + 'static) -> Self {
        self.reducer = Arc::new(reducer);
        self
    }

    /// Spawn the writer loop on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn build(self) -> Store {
        let (tx, rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(Arc::new(self.initial));
        let handle = StoreHandle { tx, state_rx };
        let writer = Writer {
            state_tx,
            handle: handle.clone(),
            middleware: self.middleware,
            reducer: self.reducer,
        };
        let task = tokio::spawn(writer.run(rx));
        tracing::info!("store started");
        Store { handle, task }
    }
}

struct Writer {
    state_tx: watch::Sender<Arc<AppState>>,
    handle: StoreHandle,
    middleware: Vec<Arc<dyn Middleware>>,
    reducer: Arc<dyn Reducer>,
}

impl Writer {
    async fn run(self, mut rx: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = rx.recv().await {
            match command {
                Command::Dispatch(actions) => {
                    for action in actions {
                        self.apply(action);
                    }
                }
                Command::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
        tracing::info!("store stopped");
    }

    fn apply(&self, action: Action) {
        let current = self.state_tx.borrow().clone();
        for middleware in &self.middleware {
            if middleware.handle(&action, &current, &self.handle) == Flow::Consume {
                tracing::debug!(group = action.group(), action = ?action, "action consumed");
                return;
            }
        }
        let next = self.reducer.reduce(&current, &action);
        if next != *current {
            tracing::trace!(group = action.group(), action = ?action, "state committed");
            self.state_tx.send_replace(Arc::new(next));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CallingAction, LocalParticipantAction, NavigationAction};
    use crate::views::{CallStatus, CameraOperationalStatus, NavigationStatus};
    use futures::StreamExt;
    use parking_lot::Mutex;

    struct Log(Arc<Mutex<Vec<Action>>>);

    impl Middleware for Log {
        fn handle(&self, action: &Action, _: &AppState, _: &StoreHandle) -> Flow {
            self.0.lock().push(action.clone());
            Flow::Continue
        }
    }

    struct DropCameraRequests;

    impl Middleware for DropCameraRequests {
        fn handle(&self, action: &Action, _: &AppState, _: &StoreHandle) -> Flow {
            match action {
                Action::LocalParticipant(LocalParticipantAction::TurnCameraOn) => Flow::Consume,
                _ => Flow::Continue,
            }
        }
    }

    #[tokio::test]
    async fn applies_in_dispatch_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let store = Store::builder(AppState::default())
            .middleware(Log(log.clone()))
            .build();

        store
            .dispatch(CallingAction::StateUpdated(CallStatus::Connecting))
            .unwrap();
        store
            .dispatch(CallingAction::StateUpdated(CallStatus::Connected))
            .unwrap();
        store.flush().await.unwrap();

        assert_eq!(store.current_state().call.status, CallStatus::Connected);
        assert_eq!(log.lock().len(), 2);
    }

    #[tokio::test]
    async fn subscriber_sees_current_snapshot_first() {
        let store = Store::builder(AppState::default()).build();
        store.dispatch(NavigationAction::CallLaunched).unwrap();
        store.flush().await.unwrap();

        let mut states = store.subscribe();
        let first = states.next().await.unwrap();
        assert_eq!(first.navigation.status, NavigationStatus::InCall);
    }

    #[tokio::test]
    async fn consumed_actions_do_not_reach_reducer() {
        let store = Store::builder(AppState::default())
            .middleware(DropCameraRequests)
            .build();
        store.dispatch(LocalParticipantAction::TurnCameraOn).unwrap();
        store.flush().await.unwrap();
        assert_eq!(
            store.current_state().local_user.camera.operation,
            CameraOperationalStatus::Off
        );
    }

    #[tokio::test]
    async fn dispatch_after_drop_is_closed() {
        let store = Store::builder(AppState::default()).build();
        let handle = store.handle();
        drop(store);
        tokio::task::yield_now().await;
        // The aborted loop releases its receiver once the runtime polls it.
        let mut closed = false;
        for _ in 0..100 {
            if handle.dispatch(NavigationAction::Exit).is_err() {
                closed = true;
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(closed);
        assert_eq!(handle.flush().await, Err(StoreError::Closed));
    }
}
