//! Action recorder middleware
//!
//! Installed first in the chain, it sees every admitted action in apply
//! order, including the ones a later middleware consumes.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;

use callkit_app::store::{Flow, Middleware, StoreHandle};
use callkit_app::{Action, AppState};

#[derive(Debug, Default)]
struct ActionLog {
    actions: Mutex<Vec<Action>>,
    changed: Notify,
}

/// Middleware that records actions and lets tests wait on them
#[derive(Debug, Clone, Default)]
pub struct RecordingMiddleware {
    log: Arc<ActionLog>,
}

impl RecordingMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every action seen so far, in apply order
    pub fn actions(&self) -> Vec<Action> {
        self.log.actions.lock().clone()
    }

    /// Number of recorded actions equal to `action`
    pub fn count(&self, action: &Action) -> usize {
        self.log
            .actions
            .lock()
            .iter()
            .filter(|seen| *seen == action)
            .count()
    }

    /// Position of the first recorded action equal to `action`
    pub fn position(&self, action: &Action) -> Option<usize> {
        self.log.actions.lock().iter().position(|seen| seen == action)
    }

    /// Wait until `predicate` holds for the recorded actions.
    ///
    /// Returns whether it held before `timeout` ran out.
    pub async fn wait_until<F>(&self, predicate: F, timeout: Duration) -> bool
    where
        F: Fn(&[Action]) -> bool,
    {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let changed = self.log.changed.notified();
            tokio::pin!(changed);
            changed.as_mut().enable();

            if predicate(&self.log.actions.lock()) {
                return true;
            }
            if tokio::time::timeout_at(deadline, changed).await.is_err() {
                return predicate(&self.log.actions.lock());
            }
        }
    }

    /// Wait until `action` has been recorded at least `times` times
    pub async fn wait_for_count(&self, action: &Action, times: usize, timeout: Duration) -> bool {
        self.wait_until(
            |actions| actions.iter().filter(|seen| *seen == action).count() >= times,
            timeout,
        )
        .await
    }
}

impl Middleware for RecordingMiddleware {
    fn handle(&self, action: &Action, _state: &AppState, _store: &StoreHandle) -> Flow {
        self.log.actions.lock().push(action.clone());
        self.log.changed.notify_waiters();
        Flow::Continue
    }
}
