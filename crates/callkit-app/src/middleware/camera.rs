//! Camera on/off, switching, pause, and preview.
//!
//! ```text
//! Off ──TurnCameraOn──► Pending ──► On ──SwitchCamera──► Switching ──► On
//!  ▲                                │ ▲
//!  └──────── TurnCameraOff ◄────────┘ └── foreground (connected) ── Paused ◄── background
//! ```
//!
//! A switch that fails because the camera session was lost gets exactly one
//! recovery: camera off, camera on, switch again. The sequence is written out
//! linearly below; there is no retry loop.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{emit, emit_all, settled_state, EffectContext};
use crate::calling_bridge::CallingBridge;
use crate::core::{Action, CallingError, LocalParticipantAction, RecoveryOutcome};
use crate::store::{Flow, StoreHandle};
use crate::views::{AppState, CallStatus, CameraDeviceSelectionStatus, CameraOperationalStatus};

pub(super) fn handle(
    ctx: &Arc<EffectContext>,
    action: &LocalParticipantAction,
    state: &AppState,
    store: &StoreHandle,
) -> Flow {
    match action {
        LocalParticipantAction::TurnCameraOn => turn_on(ctx, state, store),
        LocalParticipantAction::TurnCameraOff => turn_off(ctx, state, store),
        LocalParticipantAction::SwitchCamera => switch(ctx, state, store),
        LocalParticipantAction::CameraPauseRequested => {
            if pause(ctx, state, store) {
                Flow::Continue
            } else {
                debug!(operation = ?state.local_user.camera.operation, "camera not on; nothing to pause");
                Flow::Consume
            }
        }
        LocalParticipantAction::CameraPreviewOnTriggered => {
            preview(ctx, store, state.local_user.camera.operation);
            Flow::Continue
        }
        _ => Flow::Continue,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// On / Off
// ─────────────────────────────────────────────────────────────────────────────

fn turn_on(ctx: &Arc<EffectContext>, state: &AppState, store: &StoreHandle) -> Flow {
    let operation = state.local_user.camera.operation;
    if !matches!(
        operation,
        CameraOperationalStatus::Off | CameraOperationalStatus::Paused
    ) {
        debug!(?operation, "camera busy or already on; turn on ignored");
        return Flow::Consume;
    }
    match state.call.status {
        // Setup screen: local preview only
        CallStatus::None => preview(ctx, store, CameraOperationalStatus::Pending),
        status if status.is_active() => resume(ctx, store),
        status => {
            debug!(status = status.label(), "call is over; turn on ignored");
            return Flow::Consume;
        }
    }
    Flow::Continue
}

/// Turn the camera on and report `CameraOnSucceeded` / `CameraOnFailed`.
///
/// Expects the camera to be `Pending` once the triggering action is reduced.
pub(super) fn resume(ctx: &Arc<EffectContext>, store: &StoreHandle) {
    let bridge = ctx.bridge.clone();
    let store = store.clone();
    ctx.spawn(async move {
        let result = bridge.turn_camera_on().await;
        let Some(state) = settled_state(&store).await else {
            return;
        };
        if state.local_user.camera.operation != CameraOperationalStatus::Pending {
            debug!(?result, "camera on result is stale; dropped");
            return;
        }
        match result {
            Ok(video_stream_id) => emit_all(
                &store,
                with_pause_if_background(
                    &state,
                    LocalParticipantAction::CameraOnSucceeded { video_stream_id },
                    true,
                ),
            ),
            Err(error) => {
                warn!(%error, "camera on failed");
                emit(&store, LocalParticipantAction::CameraOnFailed { error });
            }
        }
    });
}

fn turn_off(ctx: &Arc<EffectContext>, state: &AppState, store: &StoreHandle) -> Flow {
    match state.local_user.camera.operation {
        CameraOperationalStatus::On => {}
        CameraOperationalStatus::Paused => {
            // Already off at the engine; only the state needs to follow.
            emit(store, LocalParticipantAction::CameraOffSucceeded);
            return Flow::Continue;
        }
        operation => {
            debug!(?operation, "camera busy or already off; turn off ignored");
            return Flow::Consume;
        }
    }

    let bridge = ctx.bridge.clone();
    let store = store.clone();
    ctx.spawn(async move {
        let result = bridge.turn_camera_off().await;
        let Some(state) = settled_state(&store).await else {
            return;
        };
        if state.local_user.camera.operation != CameraOperationalStatus::Pending {
            debug!(?result, "camera off result is stale; dropped");
            return;
        }
        match result {
            Ok(()) => emit(&store, LocalParticipantAction::CameraOffSucceeded),
            Err(error) => {
                warn!(%error, "camera off failed");
                emit(&store, LocalParticipantAction::CameraOffFailed { error });
            }
        }
    });
    Flow::Continue
}

// ─────────────────────────────────────────────────────────────────────────────
// Pause / Preview
// ─────────────────────────────────────────────────────────────────────────────

/// Pause a live camera for background. Returns whether a pause was started.
pub(super) fn pause(ctx: &Arc<EffectContext>, state: &AppState, store: &StoreHandle) -> bool {
    if !state.camera_is_on() {
        return false;
    }
    let bridge = ctx.bridge.clone();
    let store = store.clone();
    ctx.spawn(async move {
        let result = bridge.turn_camera_off().await;
        let Some(state) = settled_state(&store).await else {
            return;
        };
        if state.local_user.camera.operation != CameraOperationalStatus::Pending {
            debug!(?result, "camera pause result is stale; dropped");
            return;
        }
        match result {
            Ok(()) => {
                let mut actions: Vec<Action> =
                    vec![LocalParticipantAction::CameraPauseSucceeded.into()];
                if !state.lifecycle.is_background() {
                    // Foreground arrived while the pause was in flight.
                    debug!("app is in foreground again; restoring camera after pause");
                    actions.push(if state.call.is_on_hold() {
                        LocalParticipantAction::CameraPreviewOnTriggered.into()
                    } else {
                        LocalParticipantAction::TurnCameraOn.into()
                    });
                }
                emit_all(&store, actions);
            }
            Err(error) => {
                warn!(%error, "camera pause failed");
                emit(&store, LocalParticipantAction::CameraPauseFailed { error });
            }
        }
    });
    true
}

/// Start the local preview. `expected` is the camera status the preview was
/// started under; the result is dropped if the camera has moved on.
fn preview(ctx: &Arc<EffectContext>, store: &StoreHandle, expected: CameraOperationalStatus) {
    let bridge = ctx.bridge.clone();
    let store = store.clone();
    ctx.spawn(async move {
        let result = bridge.turn_camera_preview_on().await;
        let Some(state) = settled_state(&store).await else {
            return;
        };
        if state.local_user.camera.operation != expected {
            debug!(?result, ?expected, "camera preview result is stale; dropped");
            return;
        }
        match result {
            Ok(video_stream_id) => {
                let held = expected == CameraOperationalStatus::Paused && state.call.is_on_hold();
                emit_all(
                    &store,
                    with_pause_if_background(
                        &state,
                        LocalParticipantAction::CameraPreviewOnSucceeded { video_stream_id },
                        !held,
                    ),
                );
            }
            Err(error) => {
                warn!(%error, "camera preview failed");
                emit(&store, LocalParticipantAction::CameraPreviewOnFailed { error });
            }
        }
    });
}

// ─────────────────────────────────────────────────────────────────────────────
// Switch
// ─────────────────────────────────────────────────────────────────────────────

enum SwitchOutcome {
    Switched {
        device: CameraDeviceSelectionStatus,
        restarted_stream_id: Option<String>,
    },
    Failed {
        error: CallingError,
        recovery: RecoveryOutcome,
    },
}

fn switch(ctx: &Arc<EffectContext>, state: &AppState, store: &StoreHandle) -> Flow {
    let camera = &state.local_user.camera;
    if camera.operation != CameraOperationalStatus::On {
        debug!(operation = ?camera.operation, "switch requested while camera is not on");
        emit(
            store,
            LocalParticipantAction::CameraSwitchFailed {
                previous_device: camera.device,
                error: CallingError::precondition("camera must be on to switch"),
                recovery: RecoveryOutcome::NotAttempted,
            },
        );
        return Flow::Consume;
    }

    let previous_device = camera.device;
    let bridge = ctx.bridge.clone();
    let store = store.clone();
    ctx.spawn(async move {
        let outcome = match bridge.switch_camera().await {
            Ok(device) => SwitchOutcome::Switched {
                device,
                restarted_stream_id: None,
            },
            Err(error) if error.is_transient() => restart_and_switch(bridge.as_ref(), error).await,
            Err(error) => SwitchOutcome::Failed {
                error,
                recovery: RecoveryOutcome::NotAttempted,
            },
        };

        let Some(state) = settled_state(&store).await else {
            return;
        };
        if state.local_user.camera.operation != CameraOperationalStatus::Switching {
            debug!("camera switch result is stale; dropped");
            return;
        }
        match outcome {
            SwitchOutcome::Switched {
                device,
                restarted_stream_id,
            } => emit_all(
                &store,
                with_pause_if_background(
                    &state,
                    LocalParticipantAction::CameraSwitchSucceeded {
                        device,
                        restarted_stream_id,
                    },
                    true,
                ),
            ),
            SwitchOutcome::Failed { error, recovery } => {
                warn!(%error, ?recovery, "camera switch failed");
                let camera_left_on = recovery != RecoveryOutcome::CameraLeftOff;
                emit_all(
                    &store,
                    with_pause_if_background(
                        &state,
                        LocalParticipantAction::CameraSwitchFailed {
                            previous_device,
                            error,
                            recovery,
                        },
                        camera_left_on,
                    ),
                );
            }
        }
    });
    Flow::Continue
}

/// The single recovery attempt: off, on (new stream), switch.
async fn restart_and_switch(bridge: &dyn CallingBridge, cause: CallingError) -> SwitchOutcome {
    info!(error = %cause, "camera session lost during switch; restarting camera once");

    if let Err(error) = bridge.turn_camera_off().await {
        return SwitchOutcome::Failed {
            error,
            recovery: RecoveryOutcome::Aborted,
        };
    }
    let video_stream_id = match bridge.turn_camera_on().await {
        Ok(id) => id,
        Err(error) => {
            return SwitchOutcome::Failed {
                error,
                recovery: RecoveryOutcome::CameraLeftOff,
            }
        }
    };
    match bridge.switch_camera().await {
        Ok(device) => SwitchOutcome::Switched {
            device,
            restarted_stream_id: Some(video_stream_id),
        },
        Err(error) => SwitchOutcome::Failed {
            error,
            recovery: RecoveryOutcome::CameraRestarted { video_stream_id },
        },
    }
}

/// A result that leaves the camera live while the app is hidden is followed,
/// in the same batch, by a pause request.
fn with_pause_if_background(
    state: &AppState,
    outcome: LocalParticipantAction,
    leaves_camera_on: bool,
) -> Vec<Action> {
    let mut actions = vec![outcome.into()];
    if leaves_camera_on && state.lifecycle.is_background() {
        debug!("app is in background; pausing camera after result");
        actions.push(LocalParticipantAction::CameraPauseRequested.into());
    }
    actions
}
