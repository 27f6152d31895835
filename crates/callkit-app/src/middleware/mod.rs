//! # Calling Middleware
//!
//! Effect handlers that sit between dispatch and the reducer. Each handler
//! checks the pre-reduction snapshot, performs at most one bridge call on a
//! background task, and reports the answer as an outcome action.
//!
//! ## Handler contract
//!
//! - Preconditions are read from the snapshot the action is applied to.
//! - A request for a resource whose in-flight flag is set is consumed.
//! - Completions wait for the store to settle, re-read the snapshot, and
//!   drop their result when the in-flight flag they started under is gone.
//! - Bridge failures become `*Failed` actions carrying the cause; nothing
//!   escapes a handler task.
//!
//! | Module        | Actions                                                |
//! |---------------|--------------------------------------------------------|
//! | `camera`      | turn on/off, switch (with one-shot recovery), pause, preview |
//! | `audio`       | microphone, device routing, audio focus                |
//! | `lifecycle`   | background/foreground, camera restore on connect       |
//! | `call`        | setup, start, end, hold, resume, stream attachment     |
//! | `call_state`  | status stream classification                           |
//! | `lobby`       | admit, decline, admit all                              |
//! | `captions`    | start, stop                                            |

mod audio;
mod call;
mod call_state;
mod camera;
mod captions;
mod lifecycle;
mod lobby;

use std::future::Future;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use crate::calling_bridge::BoxedCallingBridge;
use crate::core::{Action, CallCompositeConfig};
use crate::store::{Flow, Middleware, StoreHandle};
use crate::task_registry::TaskRegistry;
use crate::views::AppState;

pub use call_state::classify_call_info;

/// Shared context for handler tasks
pub(crate) struct EffectContext {
    pub(crate) bridge: BoxedCallingBridge,
    pub(crate) config: CallCompositeConfig,
    pub(crate) tasks: TaskRegistry,
    /// Bumped on every call start that attaches streams
    pub(crate) call_generation: AtomicU64,
}

impl EffectContext {
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.spawn(fut);
    }
}

/// Middleware that drives the calling bridge
pub struct CallingMiddleware {
    ctx: Arc<EffectContext>,
}

impl CallingMiddleware {
    /// Create the middleware for one session
    pub fn new(bridge: BoxedCallingBridge, config: CallCompositeConfig) -> Self {
        Self {
            ctx: Arc::new(EffectContext {
                bridge,
                config,
                tasks: TaskRegistry::new(),
                call_generation: AtomicU64::new(0),
            }),
        }
    }
}

impl Middleware for CallingMiddleware {
    fn handle(&self, action: &Action, state: &AppState, store: &StoreHandle) -> Flow {
        let ctx = &self.ctx;
        match action {
            Action::Calling(action) => {
                lifecycle::on_calling(action, state, store);
                call::handle(ctx, action, state, store)
            }
            Action::LocalParticipant(action) => {
                let flow = camera::handle(ctx, action, state, store);
                if flow == Flow::Consume {
                    return flow;
                }
                audio::handle_local(ctx, action, state, store)
            }
            Action::Lifecycle(action) => lifecycle::handle(ctx, *action, state, store),
            Action::Participant(action) => lobby::handle(ctx, action, store),
            Action::AudioSession(action) => audio::handle_session(ctx, *action, store),
            Action::Captions(action) => captions::handle(ctx, action, state, store),
            Action::Navigation(_)
            | Action::Permission(_)
            | Action::Error(_)
            | Action::CallDiagnostics(_) => Flow::Continue,
        }
    }
}

impl Drop for CallingMiddleware {
    fn drop(&mut self) {
        self.ctx.tasks.shutdown();
    }
}

/// Dispatch from a handler; a closed store means the session is over.
fn emit(store: &StoreHandle, action: impl Into<Action>) {
    if store.dispatch(action).is_err() {
        tracing::debug!("session closed; outcome dropped");
    }
}

fn emit_all(store: &StoreHandle, actions: Vec<Action>) {
    if store.dispatch_all(actions).is_err() {
        tracing::debug!("session closed; outcomes dropped");
    }
}

/// Snapshot after everything admitted so far has been applied.
///
/// Completions call this before checking preconditions so the action that
/// started them has been reduced.
async fn settled_state(store: &StoreHandle) -> Option<Arc<AppState>> {
    store.flush().await.ok()?;
    Some(store.current_state())
}
