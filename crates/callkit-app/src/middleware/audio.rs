//! Microphone, output routing, and audio focus.
//!
//! Routing is only forwarded to the bridge when the SDK owns the telecom
//! integration. With no integration, or an app-provided one, the selection
//! is confirmed locally and the bridge is never called.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{emit, settled_state, EffectContext};
use crate::core::{AudioSessionAction, LocalParticipantAction};
use crate::store::{Flow, StoreHandle};
use crate::views::{AppState, AudioDevice, AudioOperationalStatus, CallStatus};

pub(super) fn handle_local(
    ctx: &Arc<EffectContext>,
    action: &LocalParticipantAction,
    state: &AppState,
    store: &StoreHandle,
) -> Flow {
    match action {
        LocalParticipantAction::TurnMicOn => toggle_mic(ctx, state, store, true),
        LocalParticipantAction::TurnMicOff => toggle_mic(ctx, state, store, false),
        LocalParticipantAction::AudioDeviceChangeRequested(device) => {
            change_device(ctx, *device, state, store)
        }
        LocalParticipantAction::BluetoothStateChanged {
            available: false, ..
        } => {
            let selection = state.local_user.audio.device;
            if selection.device == AudioDevice::BluetoothSco && !selection.is_requested() {
                debug!("bluetooth headset gone; routing to speaker");
                emit(
                    store,
                    LocalParticipantAction::AudioDeviceChangeRequested(AudioDevice::Speaker),
                );
            }
            Flow::Continue
        }
        _ => Flow::Continue,
    }
}

pub(super) fn handle_session(
    ctx: &Arc<EffectContext>,
    action: AudioSessionAction,
    store: &StoreHandle,
) -> Flow {
    if action == AudioSessionAction::AudioFocusRequesting {
        if ctx.config.telecom_integration.grants_audio_focus() {
            emit(store, AudioSessionAction::AudioFocusApproved);
        } else {
            debug!(
                telecom = ?ctx.config.telecom_integration,
                "audio focus left to the host"
            );
        }
    }
    Flow::Continue
}

// ─────────────────────────────────────────────────────────────────────────────
// Microphone
// ─────────────────────────────────────────────────────────────────────────────

fn toggle_mic(ctx: &Arc<EffectContext>, state: &AppState, store: &StoreHandle, on: bool) -> Flow {
    let operation = state.local_user.audio.operation;
    let from = if on {
        AudioOperationalStatus::Off
    } else {
        AudioOperationalStatus::On
    };
    if operation != from {
        debug!(?operation, on, "microphone busy or already there; request ignored");
        return Flow::Consume;
    }

    match state.call.status {
        CallStatus::None => {
            // Setup screen: nothing to tell the engine yet
            emit(store, mic_succeeded(on));
            return Flow::Continue;
        }
        status if status.is_active() => {}
        status => {
            debug!(status = status.label(), "call is over; microphone request ignored");
            return Flow::Consume;
        }
    }

    let bridge = ctx.bridge.clone();
    let store = store.clone();
    ctx.spawn(async move {
        let result = if on {
            bridge.turn_mic_on().await
        } else {
            bridge.turn_mic_off().await
        };
        let Some(state) = settled_state(&store).await else {
            return;
        };
        if state.local_user.audio.operation != AudioOperationalStatus::Pending {
            debug!(?result, "microphone result is stale; dropped");
            return;
        }
        match result {
            Ok(()) => emit(&store, mic_succeeded(on)),
            Err(error) => {
                warn!(%error, on, "microphone toggle failed");
                let action = if on {
                    LocalParticipantAction::MicOnFailed { error }
                } else {
                    LocalParticipantAction::MicOffFailed { error }
                };
                emit(&store, action);
            }
        }
    });
    Flow::Continue
}

fn mic_succeeded(on: bool) -> LocalParticipantAction {
    if on {
        LocalParticipantAction::MicOnSucceeded
    } else {
        LocalParticipantAction::MicOffSucceeded
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Routing
// ─────────────────────────────────────────────────────────────────────────────

fn change_device(
    ctx: &Arc<EffectContext>,
    device: AudioDevice,
    state: &AppState,
    store: &StoreHandle,
) -> Flow {
    let previous = state.local_user.audio.device;
    if previous.is_requested() {
        debug!(requested = ?previous.device, ?device, "audio device change in flight; ignored");
        return Flow::Consume;
    }

    if !ctx.config.telecom_integration.forwards_audio_route() {
        emit(store, LocalParticipantAction::AudioDeviceChangeSucceeded(device));
        return Flow::Continue;
    }

    let route = device.route();
    let bridge = ctx.bridge.clone();
    let store = store.clone();
    ctx.spawn(async move {
        let result = bridge.set_external_audio_route(route).await;
        let Some(state) = settled_state(&store).await else {
            return;
        };
        if !state.local_user.audio.device.is_requested() {
            debug!(?result, "audio route result is stale; dropped");
            return;
        }
        match result {
            Ok(()) => emit(&store, LocalParticipantAction::AudioDeviceChangeSucceeded(device)),
            Err(error) => {
                warn!(%error, ?device, route = route.0, "audio route change failed");
                emit(
                    &store,
                    LocalParticipantAction::AudioDeviceChangeFailed { previous, error },
                );
            }
        }
    });
    Flow::Continue
}
