//! # State Reducer
//!
//! Pure `(state, action) -> state` transitions, one function per slice.
//!
//! ```text
//! dispatch → Middleware → [Reduce] → Snapshot → Subscribers
//! ```
//!
//! The reducer never fails and never performs I/O. Requests that cannot be
//! honored in the current state leave the snapshot unchanged; in particular
//! an in-flight flag (`Pending`, `Switching`, `Requested`, `Starting`,
//! `Stopping`) is never overwritten by a new request for the same resource.

use std::collections::HashMap;

use super::action::{
    Action, AudioSessionAction, CallDiagnosticsAction, CallingAction, CaptionsAction,
    ErrorAction, LifecycleAction, LocalParticipantAction, NavigationAction, ParticipantAction,
    PermissionAction, RecoveryOutcome,
};
use super::error::ErrorCode;
use crate::views::{
    AppState, AudioDeviceSelectionStatus, AudioFocusStatus, AudioOperationalStatus,
    CameraDeviceSelectionStatus, CameraOperationalStatus, CameraTransmissionStatus,
    CaptionsStatus, CallStatus, ForegroundCamera, LifecycleStatus, NavigationStatus,
    RemoteParticipantsState,
};

/// State transition function used by the store
pub trait Reducer: Send + Sync {
    /// Produce the next snapshot
    fn reduce(&self, state: &AppState, action: &Action) -> AppState;
}

/// The composite's reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct AppReducer;

impl Reducer for AppReducer {
    fn reduce(&self, state: &AppState, action: &Action) -> AppState {
        reduce(state, action)
    }
}

/// Apply one action to a snapshot
#[must_use]
pub fn reduce(state: &AppState, action: &Action) -> AppState {
    let mut next = state.clone();
    match action {
        Action::Calling(action) => reduce_calling(&mut next, action),
        Action::LocalParticipant(action) => reduce_local_participant(&mut next, action),
        Action::Lifecycle(action) => reduce_lifecycle(&mut next, *action),
        Action::Navigation(action) => reduce_navigation(&mut next, *action),
        Action::Participant(action) => reduce_participants(&mut next, action),
        Action::Permission(action) => reduce_permissions(&mut next, *action),
        Action::AudioSession(action) => reduce_audio_session(&mut next, *action),
        Action::Captions(action) => reduce_captions(&mut next, action),
        Action::Error(action) => reduce_errors(&mut next, action),
        Action::CallDiagnostics(action) => reduce_diagnostics(&mut next, *action),
    }
    next
}

// ============================================================================
// Calling
// ============================================================================

fn reduce_calling(state: &mut AppState, action: &CallingAction) {
    match action {
        CallingAction::SetupCallRequested => {}
        CallingAction::CallStartRequested => {
            if state.call.status.is_active() || state.call.start_in_flight {
                return;
            }
            state.call.status = CallStatus::None;
            state.call.call_id = None;
            state.call.start_in_flight = true;
            state.call.is_recording = false;
            state.call.is_transcribing = false;
            state.errors.fatal_error = None;
            state.errors.call_state_error = None;
            state.errors.operation_error = None;
            state.remote_participants = RemoteParticipantsState::default();
        }
        CallingAction::CallEndRequested
        | CallingAction::HoldRequested
        | CallingAction::ResumeRequested => {
            state.errors.operation_error = None;
        }
        CallingAction::StateUpdated(status) => {
            if !state.call.status.can_transition_to(*status) {
                return;
            }
            let ended = *status == CallStatus::Disconnected
                && state.call.status != CallStatus::Disconnected;
            state.call.status = *status;
            if ended {
                release_call_bound_flags(state);
            }
        }
        CallingAction::CallIdUpdated(id) => {
            state.call.call_id = Some(id.clone());
            state.call.start_in_flight = false;
        }
        CallingAction::IsRecordingUpdated(flag) => state.call.is_recording = *flag,
        CallingAction::IsTranscribingUpdated(flag) => state.call.is_transcribing = *flag,
    }
}

/// Once the call is gone no engine result can land: clear every in-flight
/// flag so late completions are recognized as stale.
fn release_call_bound_flags(state: &mut AppState) {
    state.call.start_in_flight = false;

    let camera = &mut state.local_user.camera;
    if camera.operation.is_in_flight() {
        camera.operation = CameraOperationalStatus::Off;
        camera.video_stream_id = None;
    }
    if camera.device == CameraDeviceSelectionStatus::Switching {
        camera.device = CameraDeviceSelectionStatus::default();
    }
    camera.transmission = CameraTransmissionStatus::Local;

    let audio = &mut state.local_user.audio;
    if audio.operation == AudioOperationalStatus::Pending {
        audio.operation = AudioOperationalStatus::Off;
    }
}

// ============================================================================
// Local Participant
// ============================================================================

fn reduce_local_participant(state: &mut AppState, action: &LocalParticipantAction) {
    use LocalParticipantAction as A;

    let call_active = state.call.status.is_active();
    let on_hold = state.call.is_on_hold();
    let camera = &mut state.local_user.camera;
    let audio = &mut state.local_user.audio;

    match action {
        // --- camera requests ---
        A::TurnCameraOn => {
            if matches!(
                camera.operation,
                CameraOperationalStatus::Off | CameraOperationalStatus::Paused
            ) {
                camera.operation = CameraOperationalStatus::Pending;
            }
        }
        A::TurnCameraOff => {
            if camera.operation == CameraOperationalStatus::On {
                camera.operation = CameraOperationalStatus::Pending;
            }
        }
        A::SwitchCamera => {
            if camera.operation == CameraOperationalStatus::On {
                camera.operation = CameraOperationalStatus::Switching;
                camera.device = CameraDeviceSelectionStatus::Switching;
            }
        }
        A::CameraPauseRequested => {
            if camera.operation == CameraOperationalStatus::On {
                camera.operation = CameraOperationalStatus::Pending;
            }
        }
        A::CameraPreviewOnTriggered => {}

        // --- camera outcomes ---
        A::CameraOnSucceeded { video_stream_id } => {
            if camera.operation != CameraOperationalStatus::Pending {
                return;
            }
            camera.operation = CameraOperationalStatus::On;
            camera.video_stream_id = Some(video_stream_id.clone());
            camera.transmission = if call_active {
                CameraTransmissionStatus::Remote
            } else {
                CameraTransmissionStatus::Local
            };
            camera.error = None;
        }
        A::CameraOnFailed { error } | A::CameraPreviewOnFailed { error } => {
            if camera.operation == CameraOperationalStatus::Pending {
                camera.operation = CameraOperationalStatus::Off;
            }
            camera.error = Some(error.clone());
        }
        A::CameraOffSucceeded => {
            if !matches!(
                camera.operation,
                CameraOperationalStatus::Pending | CameraOperationalStatus::Paused
            ) {
                return;
            }
            camera.operation = CameraOperationalStatus::Off;
            camera.video_stream_id = None;
            camera.error = None;
        }
        A::CameraOffFailed { error } | A::CameraPauseFailed { error } => {
            if camera.operation == CameraOperationalStatus::Pending {
                camera.operation = CameraOperationalStatus::On;
            }
            camera.error = Some(error.clone());
        }
        A::CameraSwitchSucceeded {
            device,
            restarted_stream_id,
        } => {
            if camera.operation != CameraOperationalStatus::Switching {
                return;
            }
            camera.operation = CameraOperationalStatus::On;
            camera.device = *device;
            if let Some(id) = restarted_stream_id {
                camera.video_stream_id = Some(id.clone());
            }
            camera.error = None;
        }
        A::CameraSwitchFailed {
            previous_device,
            error,
            recovery,
        } => {
            camera.error = Some(error.clone());
            if error.is_precondition_violation()
                || camera.operation != CameraOperationalStatus::Switching
            {
                return;
            }
            camera.device = *previous_device;
            match recovery {
                RecoveryOutcome::NotAttempted | RecoveryOutcome::Aborted => {
                    camera.operation = CameraOperationalStatus::On;
                }
                RecoveryOutcome::CameraLeftOff => {
                    camera.operation = CameraOperationalStatus::Off;
                    camera.video_stream_id = None;
                }
                RecoveryOutcome::CameraRestarted { video_stream_id } => {
                    camera.operation = CameraOperationalStatus::On;
                    camera.video_stream_id = Some(video_stream_id.clone());
                }
            }
        }
        A::CameraPauseSucceeded => {
            if camera.operation == CameraOperationalStatus::Pending {
                camera.operation = CameraOperationalStatus::Paused;
                camera.video_stream_id = None;
            }
        }
        A::CameraPreviewOnSucceeded { video_stream_id } => {
            let held = camera.operation == CameraOperationalStatus::Paused && on_hold;
            if !held {
                camera.operation = CameraOperationalStatus::On;
            }
            camera.video_stream_id = Some(video_stream_id.clone());
            camera.transmission = CameraTransmissionStatus::Local;
            camera.error = None;
        }
        A::CamerasCountUpdated(count) => camera.cameras_count = *count,

        // --- microphone ---
        A::TurnMicOn => {
            if audio.operation == AudioOperationalStatus::Off {
                audio.operation = AudioOperationalStatus::Pending;
            }
        }
        A::TurnMicOff => {
            if audio.operation == AudioOperationalStatus::On {
                audio.operation = AudioOperationalStatus::Pending;
            }
        }
        A::MicOnSucceeded => {
            if audio.operation != AudioOperationalStatus::Pending {
                return;
            }
            audio.operation = AudioOperationalStatus::On;
            audio.error = None;
        }
        A::MicOnFailed { error } => {
            if audio.operation == AudioOperationalStatus::Pending {
                audio.operation = AudioOperationalStatus::Off;
            }
            audio.error = Some(error.clone());
        }
        A::MicOffSucceeded => {
            if audio.operation != AudioOperationalStatus::Pending {
                return;
            }
            audio.operation = AudioOperationalStatus::Off;
            audio.error = None;
        }
        A::MicOffFailed { error } => {
            if audio.operation == AudioOperationalStatus::Pending {
                audio.operation = AudioOperationalStatus::On;
            }
            audio.error = Some(error.clone());
        }

        // --- routing ---
        A::AudioDeviceChangeRequested(device) => {
            if !audio.device.is_requested() {
                audio.device = AudioDeviceSelectionStatus::requested(*device);
            }
        }
        A::AudioDeviceChangeSucceeded(device) => {
            audio.device = AudioDeviceSelectionStatus::selected(*device);
            audio.error = None;
        }
        A::AudioDeviceChangeFailed { previous, error } => {
            audio.device = *previous;
            audio.error = Some(error.clone());
        }
        A::BluetoothStateChanged {
            available,
            device_name,
        } => {
            audio.bluetooth.available = *available;
            audio.bluetooth.device_name = if *available {
                device_name.clone()
            } else {
                None
            };
        }

        // --- identity ---
        A::DisplayNameSet(name) => state.local_user.display_name = Some(name.clone()),
        A::RoleChanged(role) => state.local_user.role = *role,
    }
}

// ============================================================================
// Lifecycle & Navigation
// ============================================================================

fn reduce_lifecycle(state: &mut AppState, action: LifecycleAction) {
    match action {
        LifecycleAction::EnterBackgroundTriggered | LifecycleAction::EnterForegroundTriggered => {}
        LifecycleAction::EnterBackgroundSucceeded => {
            if state.camera_is_on() {
                state.local_user.camera.operation = CameraOperationalStatus::Pending;
            }
            state.lifecycle.status = LifecycleStatus::Background;
        }
        LifecycleAction::EnterForegroundSucceeded => {
            if state.foreground_camera() == ForegroundCamera::Resume {
                state.local_user.camera.operation = CameraOperationalStatus::Pending;
            }
            state.lifecycle.status = LifecycleStatus::Foreground;
        }
    }
}

fn reduce_navigation(state: &mut AppState, action: NavigationAction) {
    state.navigation.status = match action {
        NavigationAction::CallLaunched => NavigationStatus::InCall,
        NavigationAction::SetupLaunched => NavigationStatus::Setup,
        NavigationAction::Exit => NavigationStatus::Exit,
    };
}

// ============================================================================
// Remote Participants
// ============================================================================

fn reduce_participants(state: &mut AppState, action: &ParticipantAction) {
    let roster = &mut state.remote_participants;
    match action {
        ParticipantAction::ParticipantsUpdated {
            participants,
            total_count,
        } => {
            roster.participants = participants
                .iter()
                .map(|p| (p.id.clone(), p.clone()))
                .collect::<HashMap<_, _>>();
            roster.total_participant_count = *total_count;
            roster.modified_timestamp = roster.modified_timestamp.wrapping_add(1);
        }
        ParticipantAction::DominantSpeakersUpdated(speakers) => {
            roster.dominant_speakers = speakers.clone();
        }
        ParticipantAction::AdmitRequested(_)
        | ParticipantAction::AdmitAllRequested
        | ParticipantAction::DeclineRequested(_) => {}
        ParticipantAction::LobbyErrorOccurred(code) => roster.lobby_error_code = Some(*code),
        ParticipantAction::LobbyErrorCleared => roster.lobby_error_code = None,
    }
}

// ============================================================================
// Leaf slices
// ============================================================================

fn reduce_permissions(state: &mut AppState, action: PermissionAction) {
    match action {
        PermissionAction::AudioPermissionChanged(status) => state.permissions.audio = status,
        PermissionAction::CameraPermissionChanged(status) => state.permissions.camera = status,
    }
}

fn reduce_audio_session(state: &mut AppState, action: AudioSessionAction) {
    state.audio_session.audio_focus = match action {
        AudioSessionAction::AudioFocusRequesting => AudioFocusStatus::Requesting,
        AudioSessionAction::AudioFocusApproved => AudioFocusStatus::Approved,
        AudioSessionAction::AudioFocusRejected => AudioFocusStatus::Rejected,
        AudioSessionAction::AudioFocusInterrupted => AudioFocusStatus::Interrupted,
    };
}

fn reduce_captions(state: &mut AppState, action: &CaptionsAction) {
    let captions = &mut state.captions;
    match action {
        CaptionsAction::StartRequested { language } => {
            if captions.status.is_in_flight() || captions.status == CaptionsStatus::Started {
                return;
            }
            captions.status = CaptionsStatus::Starting;
            captions.spoken_language = language.clone();
            captions.error = None;
        }
        CaptionsAction::Started { language } => {
            captions.status = CaptionsStatus::Started;
            if language.is_some() {
                captions.spoken_language = language.clone();
            }
        }
        CaptionsAction::StopRequested => {
            if captions.status == CaptionsStatus::Started {
                captions.status = CaptionsStatus::Stopping;
            }
        }
        CaptionsAction::Stopped => captions.status = CaptionsStatus::Stopped,
        CaptionsAction::Failed { error } => {
            captions.status = match captions.status {
                CaptionsStatus::Starting => CaptionsStatus::Stopped,
                CaptionsStatus::Stopping => CaptionsStatus::Started,
                other => other,
            };
            captions.error = Some(error.clone());
        }
    }
}

fn reduce_errors(state: &mut AppState, action: &ErrorAction) {
    match action {
        ErrorAction::FatalErrorOccurred(err) => {
            if err.code == ErrorCode::CallStartFailed {
                state.call.start_in_flight = false;
            }
            state.errors.fatal_error = Some(err.clone());
        }
        ErrorAction::CallStateErrorOccurred(err) => {
            state.errors.call_state_error = Some(err.clone());
        }
        ErrorAction::OperationFailed(err) => state.errors.operation_error = Some(err.clone()),
        ErrorAction::OperationErrorCleared => state.errors.operation_error = None,
    }
}

fn reduce_diagnostics(state: &mut AppState, action: CallDiagnosticsAction) {
    let diagnostics = &mut state.diagnostics;
    match action {
        CallDiagnosticsAction::NetworkQualityChanged(quality) => {
            diagnostics.network_quality = quality;
        }
        CallDiagnosticsAction::MediaDiagnosticChanged { diagnostic, active } => {
            if active {
                diagnostics.media_diagnostics.insert(diagnostic, true);
            } else {
                diagnostics.media_diagnostics.remove(&diagnostic);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CallingError, FatalError, LobbyErrorCode};
    use crate::views::{AudioDevice, CameraState};
    use proptest::prelude::*;

    fn in_call(camera: CameraOperationalStatus) -> AppState {
        let mut state = AppState::default();
        state.call.status = CallStatus::Connected;
        state.local_user.camera = CameraState {
            operation: camera,
            ..CameraState::default()
        };
        state
    }

    fn apply(state: &AppState, action: impl Into<Action>) -> AppState {
        reduce(state, &action.into())
    }

    #[test]
    fn camera_on_round_trip() {
        let state = in_call(CameraOperationalStatus::Off);
        let state = apply(&state, LocalParticipantAction::TurnCameraOn);
        assert_eq!(
            state.local_user.camera.operation,
            CameraOperationalStatus::Pending
        );

        let state = apply(
            &state,
            LocalParticipantAction::CameraOnSucceeded {
                video_stream_id: "abc".into(),
            },
        );
        let camera = &state.local_user.camera;
        assert_eq!(camera.operation, CameraOperationalStatus::On);
        assert_eq!(camera.video_stream_id.as_deref(), Some("abc"));
        assert_eq!(camera.transmission, CameraTransmissionStatus::Remote);
    }

    #[test]
    fn switch_marks_device_switching_and_settles() {
        let state = in_call(CameraOperationalStatus::On);
        let state = apply(&state, LocalParticipantAction::SwitchCamera);
        assert_eq!(
            state.local_user.camera.device,
            CameraDeviceSelectionStatus::Switching
        );

        let state = apply(
            &state,
            LocalParticipantAction::CameraSwitchSucceeded {
                device: CameraDeviceSelectionStatus::Back,
                restarted_stream_id: None,
            },
        );
        assert_eq!(state.local_user.camera.operation, CameraOperationalStatus::On);
        assert_eq!(
            state.local_user.camera.device,
            CameraDeviceSelectionStatus::Back
        );
    }

    #[test]
    fn precondition_switch_failure_only_records_error() {
        let state = in_call(CameraOperationalStatus::Off);
        let next = apply(
            &state,
            LocalParticipantAction::CameraSwitchFailed {
                previous_device: CameraDeviceSelectionStatus::Front,
                error: CallingError::precondition("camera is not on"),
                recovery: RecoveryOutcome::NotAttempted,
            },
        );
        assert_eq!(next.local_user.camera.operation, CameraOperationalStatus::Off);
        assert!(next.local_user.camera.error.is_some());
    }

    #[test]
    fn switch_failure_after_restart_keeps_new_stream() {
        let mut state = in_call(CameraOperationalStatus::On);
        state.local_user.camera.video_stream_id = Some("old".into());
        let state = apply(&state, LocalParticipantAction::SwitchCamera);
        let state = apply(
            &state,
            LocalParticipantAction::CameraSwitchFailed {
                previous_device: CameraDeviceSelectionStatus::Front,
                error: CallingError::camera_session_not_initialized("again"),
                recovery: RecoveryOutcome::CameraRestarted {
                    video_stream_id: "new".into(),
                },
            },
        );
        let camera = &state.local_user.camera;
        assert_eq!(camera.operation, CameraOperationalStatus::On);
        assert_eq!(camera.device, CameraDeviceSelectionStatus::Front);
        assert_eq!(camera.video_stream_id.as_deref(), Some("new"));
    }

    #[test]
    fn background_pauses_only_a_live_camera() {
        let state = in_call(CameraOperationalStatus::On);
        let state = apply(&state, LifecycleAction::EnterBackgroundSucceeded);
        assert!(state.lifecycle.is_background());
        assert_eq!(
            state.local_user.camera.operation,
            CameraOperationalStatus::Pending
        );
        let state = apply(&state, LocalParticipantAction::CameraPauseSucceeded);
        assert_eq!(
            state.local_user.camera.operation,
            CameraOperationalStatus::Paused
        );

        let off = in_call(CameraOperationalStatus::Off);
        let off = apply(&off, LifecycleAction::EnterBackgroundSucceeded);
        assert_eq!(off.local_user.camera.operation, CameraOperationalStatus::Off);
    }

    #[test]
    fn preview_keeps_paused_camera_paused() {
        let mut state = in_call(CameraOperationalStatus::Paused);
        state.call.status = CallStatus::LocalHold;
        let state = apply(&state, LifecycleAction::EnterForegroundSucceeded);
        assert_eq!(
            state.local_user.camera.operation,
            CameraOperationalStatus::Paused
        );
        let state = apply(
            &state,
            LocalParticipantAction::CameraPreviewOnSucceeded {
                video_stream_id: "preview".into(),
            },
        );
        assert_eq!(
            state.local_user.camera.operation,
            CameraOperationalStatus::Paused
        );
        assert_eq!(
            state.local_user.camera.transmission,
            CameraTransmissionStatus::Local
        );
    }

    #[test]
    fn illegal_status_transition_is_ignored() {
        let state = in_call(CameraOperationalStatus::Off);
        let next = apply(&state, CallingAction::StateUpdated(CallStatus::Connecting));
        assert_eq!(next.call.status, CallStatus::Connected);
    }

    #[test]
    fn disconnect_clears_in_flight_flags() {
        let state = in_call(CameraOperationalStatus::Switching);
        let mut state = apply(&state, LocalParticipantAction::TurnMicOn);
        state.local_user.camera.device = CameraDeviceSelectionStatus::Switching;
        let state = apply(&state, CallingAction::StateUpdated(CallStatus::Disconnected));
        assert_eq!(state.local_user.camera.operation, CameraOperationalStatus::Off);
        assert_eq!(
            state.local_user.camera.device,
            CameraDeviceSelectionStatus::Front
        );
        assert_eq!(state.local_user.audio.operation, AudioOperationalStatus::Off);
    }

    #[test]
    fn call_start_resets_a_finished_call() {
        let mut state = in_call(CameraOperationalStatus::Off);
        state.call.status = CallStatus::Disconnected;
        state.call.is_recording = true;
        state.remote_participants.lobby_error_code = Some(LobbyErrorCode::UnknownError);
        let state = apply(&state, CallingAction::CallStartRequested);
        assert_eq!(state.call.status, CallStatus::None);
        assert!(!state.call.is_recording);
        assert_eq!(state.remote_participants.lobby_error_code, None);
    }

    #[test]
    fn second_call_start_waits_for_the_first() {
        let state = apply(&AppState::default(), CallingAction::CallStartRequested);
        assert!(state.call.start_in_flight);

        let mut failed = state.clone();
        failed.errors.fatal_error = Some(FatalError {
            code: ErrorCode::CallSetupFailed,
            cause: CallingError::engine("x"),
        });
        let again = apply(&failed, CallingAction::CallStartRequested);
        assert_eq!(again, failed, "in-flight start is not reset");

        let started = apply(&state, CallingAction::CallIdUpdated("call-1".into()));
        assert!(!started.call.start_in_flight);

        let rejected = apply(
            &state,
            ErrorAction::FatalErrorOccurred(FatalError {
                code: ErrorCode::CallStartFailed,
                cause: CallingError::engine("rejected"),
            }),
        );
        assert!(!rejected.call.start_in_flight);
        assert!(apply(&rejected, CallingAction::CallStartRequested)
            .call
            .start_in_flight);
    }

    #[test]
    fn audio_request_does_not_overwrite_pending_request() {
        let state = AppState::default();
        let state = apply(
            &state,
            LocalParticipantAction::AudioDeviceChangeRequested(AudioDevice::Receiver),
        );
        let state = apply(
            &state,
            LocalParticipantAction::AudioDeviceChangeRequested(AudioDevice::BluetoothSco),
        );
        assert_eq!(
            state.local_user.audio.device,
            AudioDeviceSelectionStatus::requested(AudioDevice::Receiver)
        );
    }

    #[test]
    fn captions_failure_reverts_in_flight_status() {
        let state = apply(
            &AppState::default(),
            CaptionsAction::StartRequested {
                language: Some("en-us".into()),
            },
        );
        assert_eq!(state.captions.status, CaptionsStatus::Starting);
        let state = apply(
            &state,
            CaptionsAction::Failed {
                error: CallingError::engine("no captions"),
            },
        );
        assert_eq!(state.captions.status, CaptionsStatus::Stopped);
    }

    fn any_action() -> impl Strategy<Value = Action> {
        let status = prop_oneof![
            Just(CallStatus::None),
            Just(CallStatus::Connecting),
            Just(CallStatus::Connected),
            Just(CallStatus::LocalHold),
            Just(CallStatus::Disconnecting),
            Just(CallStatus::Disconnected),
        ];
        let fixed: Vec<Action> = vec![
            CallingAction::CallStartRequested.into(),
            LocalParticipantAction::TurnCameraOn.into(),
            LocalParticipantAction::TurnCameraOff.into(),
            LocalParticipantAction::SwitchCamera.into(),
            LocalParticipantAction::TurnMicOn.into(),
            LocalParticipantAction::TurnMicOff.into(),
            LocalParticipantAction::CameraPauseRequested.into(),
            LocalParticipantAction::CameraPauseSucceeded.into(),
            LocalParticipantAction::AudioDeviceChangeRequested(AudioDevice::Receiver).into(),
            LocalParticipantAction::CameraOnSucceeded {
                video_stream_id: "s".into(),
            }
            .into(),
            LifecycleAction::EnterBackgroundSucceeded.into(),
            LifecycleAction::EnterForegroundSucceeded.into(),
        ];
        prop_oneof![
            status.prop_map(|s| Action::from(CallingAction::StateUpdated(s))),
            proptest::sample::select(fixed),
        ]
    }

    fn is_request(action: &Action) -> bool {
        matches!(
            action,
            Action::LocalParticipant(
                LocalParticipantAction::TurnCameraOn
                    | LocalParticipantAction::TurnCameraOff
                    | LocalParticipantAction::SwitchCamera
                    | LocalParticipantAction::CameraPauseRequested
            )
        )
    }

    proptest! {
        #[test]
        fn disconnected_only_left_through_call_start(
            actions in proptest::collection::vec(any_action(), 1..40)
        ) {
            let mut state = AppState::default();
            for action in &actions {
                let was_disconnected = state.call.status == CallStatus::Disconnected;
                state = reduce(&state, action);
                if was_disconnected && state.call.status != CallStatus::Disconnected {
                    prop_assert_eq!(action, &Action::from(CallingAction::CallStartRequested));
                    prop_assert_eq!(state.call.status, CallStatus::None);
                }
            }
        }

        #[test]
        fn camera_requests_never_overwrite_in_flight(
            actions in proptest::collection::vec(any_action(), 1..40)
        ) {
            let mut state = AppState::default();
            for action in &actions {
                let before = state.local_user.camera.clone();
                state = reduce(&state, action);
                if before.operation.is_in_flight() && is_request(action) {
                    prop_assert_eq!(&state.local_user.camera, &before);
                }
            }
        }
    }
}
