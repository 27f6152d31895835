//! Foreground/background coordination.
//!
//! The `*Triggered` actions always answer with their `*Succeeded` action.
//! Camera work is decided when the `*Succeeded` action is applied, against
//! the same snapshot the reducer sees, so the handler and the reducer agree
//! on whether the camera went `Pending`.

use std::sync::Arc;

use tracing::debug;

use super::{camera, emit, EffectContext};
use crate::core::{CallingAction, LifecycleAction, LocalParticipantAction};
use crate::store::{Flow, StoreHandle};
use crate::views::{AppState, CallStatus, CameraOperationalStatus, ForegroundCamera};

pub(super) fn handle(
    ctx: &Arc<EffectContext>,
    action: LifecycleAction,
    state: &AppState,
    store: &StoreHandle,
) -> Flow {
    match action {
        LifecycleAction::EnterBackgroundTriggered => {
            emit(store, LifecycleAction::EnterBackgroundSucceeded);
        }
        LifecycleAction::EnterForegroundTriggered => {
            emit(store, LifecycleAction::EnterForegroundSucceeded);
        }
        LifecycleAction::EnterBackgroundSucceeded => {
            if camera::pause(ctx, state, store) {
                debug!("pausing camera for background");
            }
        }
        LifecycleAction::EnterForegroundSucceeded => match state.foreground_camera() {
            ForegroundCamera::Resume => {
                debug!("resuming paused camera");
                camera::resume(ctx, store);
            }
            ForegroundCamera::Preview => {
                debug!(status = state.call.status.label(), "restarting camera preview only");
                emit(store, LocalParticipantAction::CameraPreviewOnTriggered);
            }
            ForegroundCamera::Untouched => {}
        },
    }
    Flow::Continue
}

/// A call that becomes connected in foreground turns its paused camera back on.
///
/// Covers resuming from hold and a call that connects after the camera was
/// paused while it was still connecting.
pub(super) fn on_calling(action: &CallingAction, state: &AppState, store: &StoreHandle) {
    let CallingAction::StateUpdated(CallStatus::Connected) = action else {
        return;
    };
    let from = state.call.status;
    if from != CallStatus::Connected
        && from.can_transition_to(CallStatus::Connected)
        && !state.lifecycle.is_background()
        && state.local_user.camera.operation == CameraOperationalStatus::Paused
    {
        debug!(from = from.label(), "call connected; turning paused camera back on");
        emit(store, LocalParticipantAction::TurnCameraOn);
    }
}
