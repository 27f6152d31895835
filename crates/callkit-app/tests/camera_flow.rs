//! Camera on/off, switch, and one-shot recovery against the mock bridge.
#![allow(missing_docs)]

use callkit_app::core::{
    Action, CallingError, CallingErrorKind, LocalParticipantAction, RecoveryOutcome,
};
use callkit_app::views::{
    CameraDeviceSelectionStatus, CameraOperationalStatus, CameraTransmissionStatus,
};
use callkit_testkit::{BridgeCall, BridgeOp, TestSession};

fn is_switch_outcome(action: &Action) -> bool {
    matches!(
        action,
        Action::LocalParticipant(
            LocalParticipantAction::CameraSwitchSucceeded { .. }
                | LocalParticipantAction::CameraSwitchFailed { .. }
        )
    )
}

#[tokio::test]
async fn turn_camera_on_reports_stream_id() {
    let session = TestSession::builder()
        .in_call(CameraOperationalStatus::Off)
        .build();
    session.bridge.queue_stream_id("abc");

    session.dispatch(LocalParticipantAction::TurnCameraOn);
    session
        .wait_for(LocalParticipantAction::CameraOnSucceeded {
            video_stream_id: "abc".into(),
        })
        .await;

    let state = session.state().await;
    let camera = &state.local_user.camera;
    assert_eq!(camera.operation, CameraOperationalStatus::On);
    assert_eq!(camera.video_stream_id.as_deref(), Some("abc"));
    assert_eq!(camera.transmission, CameraTransmissionStatus::Remote);
    assert_eq!(session.bridge.count(BridgeOp::TurnCameraOn), 1);
}

#[tokio::test]
async fn camera_on_failure_returns_to_off() {
    let session = TestSession::builder()
        .in_call(CameraOperationalStatus::Off)
        .build();
    session.bridge.fail_next(
        BridgeOp::TurnCameraOn,
        CallingError::new(CallingErrorKind::CameraUnavailable, "in use"),
    );

    session.dispatch(LocalParticipantAction::TurnCameraOn);
    session
        .wait_for_match(|action| {
            matches!(
                action,
                Action::LocalParticipant(LocalParticipantAction::CameraOnFailed { .. })
            )
        })
        .await;

    let state = session.state().await;
    assert_eq!(
        state.local_user.camera.operation,
        CameraOperationalStatus::Off
    );
    assert_eq!(
        state.local_user.camera.error.as_ref().map(|e| e.kind),
        Some(CallingErrorKind::CameraUnavailable)
    );
}

#[tokio::test]
async fn turn_camera_on_during_setup_starts_preview() {
    let session = TestSession::builder().build();

    session.dispatch(LocalParticipantAction::TurnCameraOn);
    session
        .wait_for(LocalParticipantAction::CameraPreviewOnSucceeded {
            video_stream_id: "stream-1".into(),
        })
        .await;

    let state = session.state().await;
    assert_eq!(
        state.local_user.camera.operation,
        CameraOperationalStatus::On
    );
    assert_eq!(
        state.local_user.camera.transmission,
        CameraTransmissionStatus::Local
    );
    assert_eq!(session.bridge.count(BridgeOp::TurnCameraOn), 0);
}

#[tokio::test]
async fn turn_off_while_paused_needs_no_engine_call() {
    let session = TestSession::builder()
        .in_call(CameraOperationalStatus::Paused)
        .build();

    session.dispatch(LocalParticipantAction::TurnCameraOff);
    session
        .wait_for(LocalParticipantAction::CameraOffSucceeded)
        .await;

    let state = session.state().await;
    assert_eq!(
        state.local_user.camera.operation,
        CameraOperationalStatus::Off
    );
    assert!(session.bridge.calls().is_empty());
}

#[tokio::test]
async fn switch_while_off_fails_without_engine_call() {
    let session = TestSession::builder()
        .in_call(CameraOperationalStatus::Off)
        .build();

    session.dispatch(LocalParticipantAction::SwitchCamera);
    let outcome = session.wait_for_match(is_switch_outcome).await;

    match outcome {
        Action::LocalParticipant(LocalParticipantAction::CameraSwitchFailed {
            previous_device,
            error,
            recovery,
        }) => {
            assert_eq!(previous_device, CameraDeviceSelectionStatus::Front);
            assert!(error.is_precondition_violation());
            assert_eq!(recovery, RecoveryOutcome::NotAttempted);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    session.settle().await;
    assert_eq!(session.bridge.count(BridgeOp::SwitchCamera), 0);

    let state = session.state().await;
    assert_eq!(
        state.local_user.camera.operation,
        CameraOperationalStatus::Off
    );
    assert_eq!(
        state.local_user.camera.device,
        CameraDeviceSelectionStatus::Front
    );
}

#[tokio::test]
async fn transient_switch_failure_restarts_camera_once() {
    let session = TestSession::builder()
        .in_call(CameraOperationalStatus::On)
        .build();
    session
        .bridge
        .fail_next(
            BridgeOp::SwitchCamera,
            CallingError::camera_session_not_initialized("session lost"),
        )
        .queue_stream_id("restarted");

    session.dispatch(LocalParticipantAction::SwitchCamera);
    session
        .wait_for(LocalParticipantAction::CameraSwitchSucceeded {
            device: CameraDeviceSelectionStatus::Back,
            restarted_stream_id: Some("restarted".into()),
        })
        .await;

    assert_eq!(
        session.bridge.calls(),
        vec![
            BridgeCall::SwitchCamera,
            BridgeCall::TurnCameraOff,
            BridgeCall::TurnCameraOn,
            BridgeCall::SwitchCamera,
        ]
    );
    let state = session.state().await;
    let camera = &state.local_user.camera;
    assert_eq!(camera.operation, CameraOperationalStatus::On);
    assert_eq!(camera.device, CameraDeviceSelectionStatus::Back);
    assert_eq!(camera.video_stream_id.as_deref(), Some("restarted"));
}

#[tokio::test]
async fn second_transient_failure_is_not_retried() {
    let session = TestSession::builder()
        .in_call(CameraOperationalStatus::On)
        .build();
    let lost = CallingError::camera_session_not_initialized("session lost");
    session
        .bridge
        .fail_next(BridgeOp::SwitchCamera, lost.clone())
        .fail_next(BridgeOp::SwitchCamera, lost.clone())
        .queue_stream_id("restarted");

    session.dispatch(LocalParticipantAction::SwitchCamera);
    session
        .wait_for(LocalParticipantAction::CameraSwitchFailed {
            previous_device: CameraDeviceSelectionStatus::Front,
            error: lost,
            recovery: RecoveryOutcome::CameraRestarted {
                video_stream_id: "restarted".into(),
            },
        })
        .await;
    session.settle().await;

    assert_eq!(session.bridge.count(BridgeOp::SwitchCamera), 2);
    assert_eq!(session.bridge.count(BridgeOp::TurnCameraOn), 1);
    let state = session.state().await;
    let camera = &state.local_user.camera;
    assert_eq!(camera.operation, CameraOperationalStatus::On);
    assert_eq!(camera.device, CameraDeviceSelectionStatus::Front);
    assert_eq!(camera.video_stream_id.as_deref(), Some("restarted"));
}

#[tokio::test]
async fn permanent_switch_failure_skips_recovery() {
    let session = TestSession::builder()
        .in_call(CameraOperationalStatus::On)
        .build();
    session
        .bridge
        .fail_next(BridgeOp::SwitchCamera, CallingError::engine("no back camera"));

    session.dispatch(LocalParticipantAction::SwitchCamera);
    let outcome = session.wait_for_match(is_switch_outcome).await;

    assert!(matches!(
        outcome,
        Action::LocalParticipant(LocalParticipantAction::CameraSwitchFailed {
            recovery: RecoveryOutcome::NotAttempted,
            ..
        })
    ));
    assert_eq!(session.bridge.calls(), vec![BridgeCall::SwitchCamera]);
    let state = session.state().await;
    assert_eq!(
        state.local_user.camera.operation,
        CameraOperationalStatus::On
    );
    assert_eq!(state.local_user.camera.video_stream_id.as_deref(), Some("stream-0"));
}

#[tokio::test]
async fn failed_restart_leaves_camera_off() {
    let session = TestSession::builder()
        .in_call(CameraOperationalStatus::On)
        .build();
    session
        .bridge
        .fail_next(
            BridgeOp::SwitchCamera,
            CallingError::camera_session_not_initialized("session lost"),
        )
        .fail_next(BridgeOp::TurnCameraOn, CallingError::engine("device gone"));

    session.dispatch(LocalParticipantAction::SwitchCamera);
    let outcome = session.wait_for_match(is_switch_outcome).await;

    assert!(matches!(
        outcome,
        Action::LocalParticipant(LocalParticipantAction::CameraSwitchFailed {
            recovery: RecoveryOutcome::CameraLeftOff,
            ..
        })
    ));
    let state = session.state().await;
    assert_eq!(
        state.local_user.camera.operation,
        CameraOperationalStatus::Off
    );
    assert_eq!(state.local_user.camera.video_stream_id, None);
}

#[tokio::test]
async fn requests_during_switch_are_ignored() {
    let session = TestSession::builder()
        .in_call(CameraOperationalStatus::On)
        .build();
    let gate = session.bridge.gate(BridgeOp::SwitchCamera);

    session.dispatch(LocalParticipantAction::SwitchCamera);
    session.dispatch(LocalParticipantAction::TurnCameraOff);
    session.dispatch(LocalParticipantAction::SwitchCamera);
    let state = session.state().await;
    assert_eq!(
        state.local_user.camera.operation,
        CameraOperationalStatus::Switching
    );

    gate.release();
    session
        .wait_for(LocalParticipantAction::CameraSwitchSucceeded {
            device: CameraDeviceSelectionStatus::Back,
            restarted_stream_id: None,
        })
        .await;
    session.settle().await;

    assert_eq!(session.bridge.count(BridgeOp::SwitchCamera), 1);
    assert_eq!(session.bridge.count(BridgeOp::TurnCameraOff), 0);
    assert_eq!(
        session.state().await.local_user.camera.operation,
        CameraOperationalStatus::On
    );
}

#[tokio::test]
async fn camera_result_in_background_is_paused_in_same_batch() {
    let session = TestSession::builder()
        .in_call(CameraOperationalStatus::Off)
        .in_background()
        .build();

    session.dispatch(LocalParticipantAction::TurnCameraOn);
    session
        .wait_for(LocalParticipantAction::CameraPauseSucceeded)
        .await;

    let actions = session.actions();
    let succeeded = actions
        .iter()
        .position(|action| {
            matches!(
                action,
                Action::LocalParticipant(LocalParticipantAction::CameraOnSucceeded { .. })
            )
        })
        .expect("camera on succeeded");
    assert_eq!(
        actions[succeeded + 1],
        Action::from(LocalParticipantAction::CameraPauseRequested)
    );

    let state = session.state().await;
    assert_eq!(
        state.local_user.camera.operation,
        CameraOperationalStatus::Paused
    );
    assert_eq!(session.bridge.count(BridgeOp::TurnCameraOff), 1);
}
