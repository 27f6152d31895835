//! Call control and engine stream attachment.
//!
//! Streams are obtained from the bridge before `start_call` is issued so no
//! event from the new call is missed. Each call's forwarding tasks live in
//! one registry group and are replaced by the next call start.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use futures::StreamExt;
use tracing::{debug, info, warn};

use super::call_state::forward_call_info;
use super::{emit, emit_all, EffectContext};
use crate::calling_bridge::{DiagnosticEvent, EventStream};
use crate::core::{
    join_actions, Action, CallDiagnosticsAction, CallOperation, CallingAction, CallingError,
    ErrorAction, ErrorCode, FatalError, LocalParticipantAction, OperationError,
    ParticipantAction,
};
use crate::store::{Flow, StoreHandle};
use crate::views::{AppState, CallStatus, OperationStatus, PermissionStatus};

const SETUP_STREAMS: &str = "setup_streams";
const CALL_STREAMS: &str = "call_streams";

pub(super) fn handle(
    ctx: &Arc<EffectContext>,
    action: &CallingAction,
    state: &AppState,
    store: &StoreHandle,
) -> Flow {
    match action {
        CallingAction::SetupCallRequested => setup(ctx, state, store),
        CallingAction::CallStartRequested => start(ctx, state, store),
        CallingAction::CallEndRequested => end(ctx, store),
        CallingAction::HoldRequested => hold_or_resume(ctx, state, store, CallOperation::Hold),
        CallingAction::ResumeRequested => {
            hold_or_resume(ctx, state, store, CallOperation::Resume)
        }
        CallingAction::StateUpdated(status) => {
            if !state.call.status.can_transition_to(*status) {
                debug!(
                    from = state.call.status.label(),
                    to = status.label(),
                    "status transition ignored"
                );
            }
            Flow::Continue
        }
        CallingAction::CallIdUpdated(_)
        | CallingAction::IsRecordingUpdated(_)
        | CallingAction::IsTranscribingUpdated(_) => Flow::Continue,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Setup / Start
// ─────────────────────────────────────────────────────────────────────────────

fn setup(ctx: &Arc<EffectContext>, state: &AppState, store: &StoreHandle) -> Flow {
    let skip_setup = state.call.operation_status == OperationStatus::SkipSetupScreen;
    let camera_denied = state.permissions.camera == PermissionStatus::Denied;
    let audio_denied = state.permissions.audio == PermissionStatus::Denied;
    let task_ctx = ctx.clone();
    let store = store.clone();
    ctx.spawn(async move {
        if let Err(cause) = task_ctx.bridge.setup_call().await {
            warn!(error = %cause, "call setup failed");
            emit(
                &store,
                ErrorAction::FatalErrorOccurred(FatalError {
                    code: ErrorCode::CallSetupFailed,
                    cause,
                }),
            );
            return;
        }
        info!("call setup complete");

        task_ctx.tasks.cancel_group(SETUP_STREAMS);
        forward(
            &task_ctx,
            SETUP_STREAMS,
            "cameras_count",
            task_ctx.bridge.cameras_count_stream(),
            &store,
            |count| LocalParticipantAction::CamerasCountUpdated(count).into(),
        );

        let config = &task_ctx.config;
        let mut follow_ups: Vec<Action> = Vec::new();
        if config.camera_on_by_default && !camera_denied {
            follow_ups.push(LocalParticipantAction::TurnCameraOn.into());
        }
        if config.microphone_on_by_default && !audio_denied {
            follow_ups.push(LocalParticipantAction::TurnMicOn.into());
        }
        if skip_setup {
            follow_ups.extend(join_actions());
        }
        emit_all(&store, follow_ups);
    });
    Flow::Continue
}

fn start(ctx: &Arc<EffectContext>, state: &AppState, store: &StoreHandle) -> Flow {
    if state.call.status.is_active() {
        debug!(status = state.call.status.label(), "call already active; start ignored");
        return Flow::Consume;
    }
    if state.call.start_in_flight {
        debug!("call start in flight; start ignored");
        return Flow::Consume;
    }

    let replaced = ctx.tasks.cancel_group(CALL_STREAMS);
    if replaced > 0 {
        debug!(replaced, "previous call streams cancelled");
    }
    let generation = ctx.call_generation.fetch_add(1, Ordering::SeqCst) + 1;
    attach_call_streams(ctx, store);

    let camera = state.local_user.camera.operation;
    let audio = state.local_user.audio.operation;
    let task_ctx = ctx.clone();
    let store = store.clone();
    ctx.spawn(async move {
        match task_ctx.bridge.start_call(camera, audio).await {
            Ok(call_id) => {
                info!(%call_id, "call started");
                emit(&store, CallingAction::CallIdUpdated(call_id));
            }
            Err(cause) => {
                warn!(error = %cause, "call start failed");
                // Streams of a later start are not ours to cancel.
                if task_ctx.call_generation.load(Ordering::SeqCst) == generation {
                    task_ctx.tasks.cancel_group(CALL_STREAMS);
                }
                emit(
                    &store,
                    ErrorAction::FatalErrorOccurred(FatalError {
                        code: ErrorCode::CallStartFailed,
                        cause,
                    }),
                );
            }
        }
    });
    Flow::Continue
}

fn attach_call_streams(ctx: &Arc<EffectContext>, store: &StoreHandle) {
    let bridge = &ctx.bridge;

    ctx.tasks.spawn_in_group(
        CALL_STREAMS,
        forward_call_info(bridge.call_info_stream(), store.clone()),
    );
    forward(
        ctx,
        CALL_STREAMS,
        "participants",
        bridge.participants_stream(),
        store,
        |update| {
            ParticipantAction::ParticipantsUpdated {
                participants: update.participants,
                total_count: update.total_count,
            }
            .into()
        },
    );
    forward(
        ctx,
        CALL_STREAMS,
        "dominant_speakers",
        bridge.dominant_speakers_stream(),
        store,
        |speakers| ParticipantAction::DominantSpeakersUpdated(speakers).into(),
    );
    forward(
        ctx,
        CALL_STREAMS,
        "recording",
        bridge.recording_stream(),
        store,
        |flag| CallingAction::IsRecordingUpdated(flag).into(),
    );
    forward(
        ctx,
        CALL_STREAMS,
        "transcribing",
        bridge.transcribing_stream(),
        store,
        |flag| CallingAction::IsTranscribingUpdated(flag).into(),
    );
    forward(
        ctx,
        CALL_STREAMS,
        "local_role",
        bridge.local_role_stream(),
        store,
        |role| LocalParticipantAction::RoleChanged(role).into(),
    );
    forward(
        ctx,
        CALL_STREAMS,
        "diagnostics",
        bridge.diagnostics_stream(),
        store,
        |event| match event {
            DiagnosticEvent::NetworkQuality(quality) => {
                CallDiagnosticsAction::NetworkQualityChanged(quality).into()
            }
            DiagnosticEvent::Media { diagnostic, active } => {
                CallDiagnosticsAction::MediaDiagnosticChanged { diagnostic, active }.into()
            }
        },
    );
    info!("call streams attached");
}

fn forward<T, F>(
    ctx: &EffectContext,
    group: &'static str,
    name: &'static str,
    mut stream: EventStream<T>,
    store: &StoreHandle,
    to_action: F,
) where
    T: Send + 'static,
    F: Fn(T) -> Action + Send + 'static,
{
    let store = store.clone();
    ctx.tasks.spawn_in_group(group, async move {
        while let Some(event) = stream.next().await {
            if store.dispatch(to_action(event)).is_err() {
                return;
            }
        }
        debug!(stream = name, "engine stream ended");
    });
}

// ─────────────────────────────────────────────────────────────────────────────
// End / Hold / Resume
// ─────────────────────────────────────────────────────────────────────────────

fn end(ctx: &Arc<EffectContext>, store: &StoreHandle) -> Flow {
    let bridge = ctx.bridge.clone();
    let store = store.clone();
    ctx.spawn(async move {
        if let Err(cause) = bridge.end_call().await {
            report_operation_failure(&store, CallOperation::End, cause);
        }
    });
    Flow::Continue
}

fn hold_or_resume(
    ctx: &Arc<EffectContext>,
    state: &AppState,
    store: &StoreHandle,
    operation: CallOperation,
) -> Flow {
    let required = match operation {
        CallOperation::Hold => CallStatus::Connected,
        _ => CallStatus::LocalHold,
    };
    if state.call.status != required {
        debug!(?operation, status = state.call.status.label(), "request ignored");
        return Flow::Consume;
    }

    let bridge = ctx.bridge.clone();
    let store = store.clone();
    ctx.spawn(async move {
        let result = match operation {
            CallOperation::Hold => bridge.hold().await,
            _ => bridge.resume().await,
        };
        if let Err(cause) = result {
            report_operation_failure(&store, operation, cause);
        }
    });
    Flow::Continue
}

fn report_operation_failure(store: &StoreHandle, operation: CallOperation, cause: CallingError) {
    warn!(?operation, error = %cause, "call operation failed");
    emit(
        store,
        ErrorAction::OperationFailed(OperationError { operation, cause }),
    );
}
