//! Scripted calling bridge for deterministic middleware tests
//!
//! `MockCallingBridge` records every operation it receives and answers from
//! per-operation scripts. Unscripted operations succeed:
//!
//! - camera on / preview return `stream-1`, `stream-2`, ... unless ids were queued
//! - switch toggles between front and back
//! - start returns `call-1`
//!
//! An operation can be held open with [`MockCallingBridge::gate`] until the
//! test releases it, which is how tests park a request in flight while
//! other actions are dispatched. Engine events are pushed through the
//! `emit_*` methods; every stream obtained from the bridge receives them.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, trace};

use callkit_app::core::CallingError;
use callkit_app::views::{
    AudioOperationalStatus, AudioRoute, CameraDeviceSelectionStatus, CameraOperationalStatus,
    ParticipantId, ParticipantRole,
};
use callkit_app::{CallInfo, CallingBridge, DiagnosticEvent, EventStream, RosterUpdate};

const EVENT_CAPACITY: usize = 64;

/// Operation kinds, used to script and inspect the mock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BridgeOp {
    SetupCall,
    StartCall,
    EndCall,
    Hold,
    Resume,
    TurnCameraOn,
    TurnCameraOff,
    TurnCameraPreviewOn,
    SwitchCamera,
    TurnMicOn,
    TurnMicOff,
    Admit,
    Decline,
    AdmitAll,
    SetExternalAudioRoute,
    StartCaptions,
    StopCaptions,
}

/// One recorded operation with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeCall {
    SetupCall,
    StartCall {
        camera: CameraOperationalStatus,
        audio: AudioOperationalStatus,
    },
    EndCall,
    Hold,
    Resume,
    TurnCameraOn,
    TurnCameraOff,
    TurnCameraPreviewOn,
    SwitchCamera,
    TurnMicOn,
    TurnMicOff,
    Admit(ParticipantId),
    Decline(ParticipantId),
    AdmitAll,
    SetExternalAudioRoute(AudioRoute),
    StartCaptions(Option<String>),
    StopCaptions,
}

impl BridgeCall {
    /// Operation kind of this call
    pub fn op(&self) -> BridgeOp {
        match self {
            Self::SetupCall => BridgeOp::SetupCall,
            Self::StartCall { .. } => BridgeOp::StartCall,
            Self::EndCall => BridgeOp::EndCall,
            Self::Hold => BridgeOp::Hold,
            Self::Resume => BridgeOp::Resume,
            Self::TurnCameraOn => BridgeOp::TurnCameraOn,
            Self::TurnCameraOff => BridgeOp::TurnCameraOff,
            Self::TurnCameraPreviewOn => BridgeOp::TurnCameraPreviewOn,
            Self::SwitchCamera => BridgeOp::SwitchCamera,
            Self::TurnMicOn => BridgeOp::TurnMicOn,
            Self::TurnMicOff => BridgeOp::TurnMicOff,
            Self::Admit(_) => BridgeOp::Admit,
            Self::Decline(_) => BridgeOp::Decline,
            Self::AdmitAll => BridgeOp::AdmitAll,
            Self::SetExternalAudioRoute(_) => BridgeOp::SetExternalAudioRoute,
            Self::StartCaptions(_) => BridgeOp::StartCaptions,
            Self::StopCaptions => BridgeOp::StopCaptions,
        }
    }
}

/// Releases a gated operation. Dropping the handle also releases it.
#[derive(Debug)]
pub struct GateHandle {
    open: watch::Sender<bool>,
}

impl GateHandle {
    /// Let every waiting and future call of the operation proceed
    pub fn release(&self) {
        self.open.send_replace(true);
    }
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<BridgeCall>,
    failures: HashMap<BridgeOp, VecDeque<CallingError>>,
    stream_ids: VecDeque<String>,
    gates: HashMap<BridgeOp, watch::Receiver<bool>>,
    next_stream: u32,
    device: CameraDeviceSelectionStatus,
}

/// Event channels feeding the bridge's streams
#[derive(Debug)]
struct Events {
    call_info: broadcast::Sender<CallInfo>,
    participants: broadcast::Sender<RosterUpdate>,
    dominant_speakers: broadcast::Sender<Vec<ParticipantId>>,
    cameras_count: broadcast::Sender<u32>,
    recording: broadcast::Sender<bool>,
    transcribing: broadcast::Sender<bool>,
    local_role: broadcast::Sender<ParticipantRole>,
    diagnostics: broadcast::Sender<DiagnosticEvent>,
}

impl Events {
    fn new() -> Self {
        Self {
            call_info: broadcast::channel(EVENT_CAPACITY).0,
            participants: broadcast::channel(EVENT_CAPACITY).0,
            dominant_speakers: broadcast::channel(EVENT_CAPACITY).0,
            cameras_count: broadcast::channel(EVENT_CAPACITY).0,
            recording: broadcast::channel(EVENT_CAPACITY).0,
            transcribing: broadcast::channel(EVENT_CAPACITY).0,
            local_role: broadcast::channel(EVENT_CAPACITY).0,
            diagnostics: broadcast::channel(EVENT_CAPACITY).0,
        }
    }
}

fn subscribe<T>(sender: &broadcast::Sender<T>) -> EventStream<T>
where
    T: Clone + Send + 'static,
{
    BroadcastStream::new(sender.subscribe())
        .filter_map(|event| async move { event.ok() })
        .boxed()
}

/// Scripted [`CallingBridge`] implementation
#[derive(Debug, Clone)]
pub struct MockCallingBridge {
    state: Arc<Mutex<MockState>>,
    events: Arc<Events>,
}

impl Default for MockCallingBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCallingBridge {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            events: Arc::new(Events::new()),
        }
    }

    // =========================================================================
    // Scripting
    // =========================================================================

    /// Fail the next call of `op` with `error`. Queued failures are used in order.
    pub fn fail_next(&self, op: BridgeOp, error: CallingError) -> &Self {
        self.state
            .lock()
            .failures
            .entry(op)
            .or_default()
            .push_back(error);
        self
    }

    /// Stream id returned by the next successful camera on or preview call
    pub fn queue_stream_id(&self, id: impl Into<String>) -> &Self {
        self.state.lock().stream_ids.push_back(id.into());
        self
    }

    /// Hold every call of `op` until the returned handle is released
    pub fn gate(&self, op: BridgeOp) -> GateHandle {
        let (open, rx) = watch::channel(false);
        self.state.lock().gates.insert(op, rx);
        GateHandle { open }
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<BridgeCall> {
        self.state.lock().calls.clone()
    }

    /// Calls of one operation kind
    pub fn calls_of(&self, op: BridgeOp) -> Vec<BridgeCall> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| call.op() == op)
            .cloned()
            .collect()
    }

    /// Number of calls of one operation kind
    pub fn count(&self, op: BridgeOp) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| call.op() == op)
            .count()
    }

    /// Number of live call status streams
    pub fn call_info_subscribers(&self) -> usize {
        self.events.call_info.receiver_count()
    }

    // =========================================================================
    // Engine events
    // =========================================================================

    pub fn emit_call_info(&self, info: CallInfo) {
        let _ = self.events.call_info.send(info);
    }

    pub fn emit_participants(&self, update: RosterUpdate) {
        let _ = self.events.participants.send(update);
    }

    pub fn emit_dominant_speakers(&self, speakers: Vec<ParticipantId>) {
        let _ = self.events.dominant_speakers.send(speakers);
    }

    pub fn emit_cameras_count(&self, count: u32) {
        let _ = self.events.cameras_count.send(count);
    }

    pub fn emit_recording(&self, recording: bool) {
        let _ = self.events.recording.send(recording);
    }

    pub fn emit_transcribing(&self, transcribing: bool) {
        let _ = self.events.transcribing.send(transcribing);
    }

    pub fn emit_local_role(&self, role: ParticipantRole) {
        let _ = self.events.local_role.send(role);
    }

    pub fn emit_diagnostic(&self, event: DiagnosticEvent) {
        let _ = self.events.diagnostics.send(event);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Record the call, wait for its gate, then take a scripted failure.
    async fn enter(&self, call: BridgeCall) -> Result<(), CallingError> {
        let op = call.op();
        let gate = {
            let mut state = self.state.lock();
            state.calls.push(call);
            state.gates.get(&op).cloned()
        };
        if let Some(mut gate) = gate {
            // A dropped handle counts as released.
            let _ = gate.wait_for(|open| *open).await;
        }
        let mut state = self.state.lock();
        match state.failures.get_mut(&op).and_then(VecDeque::pop_front) {
            Some(error) => {
                debug!(?op, %error, "scripted failure");
                Err(error)
            }
            None => {
                trace!(?op, "bridge call");
                Ok(())
            }
        }
    }

    fn next_stream_id(&self) -> String {
        let mut state = self.state.lock();
        if let Some(id) = state.stream_ids.pop_front() {
            return id;
        }
        state.next_stream += 1;
        format!("stream-{}", state.next_stream)
    }
}

#[async_trait]
impl CallingBridge for MockCallingBridge {
    async fn setup_call(&self) -> Result<(), CallingError> {
        self.enter(BridgeCall::SetupCall).await
    }

    async fn start_call(
        &self,
        camera: CameraOperationalStatus,
        audio: AudioOperationalStatus,
    ) -> Result<String, CallingError> {
        self.enter(BridgeCall::StartCall { camera, audio }).await?;
        Ok("call-1".to_string())
    }

    async fn end_call(&self) -> Result<(), CallingError> {
        self.enter(BridgeCall::EndCall).await
    }

    async fn hold(&self) -> Result<(), CallingError> {
        self.enter(BridgeCall::Hold).await
    }

    async fn resume(&self) -> Result<(), CallingError> {
        self.enter(BridgeCall::Resume).await
    }

    async fn turn_camera_on(&self) -> Result<String, CallingError> {
        self.enter(BridgeCall::TurnCameraOn).await?;
        Ok(self.next_stream_id())
    }

    async fn turn_camera_off(&self) -> Result<(), CallingError> {
        self.enter(BridgeCall::TurnCameraOff).await
    }

    async fn turn_camera_preview_on(&self) -> Result<String, CallingError> {
        self.enter(BridgeCall::TurnCameraPreviewOn).await?;
        Ok(self.next_stream_id())
    }

    async fn switch_camera(&self) -> Result<CameraDeviceSelectionStatus, CallingError> {
        self.enter(BridgeCall::SwitchCamera).await?;
        let mut state = self.state.lock();
        state.device = state.device.toggled();
        Ok(state.device)
    }

    async fn turn_mic_on(&self) -> Result<(), CallingError> {
        self.enter(BridgeCall::TurnMicOn).await
    }

    async fn turn_mic_off(&self) -> Result<(), CallingError> {
        self.enter(BridgeCall::TurnMicOff).await
    }

    async fn admit(&self, participant: &str) -> Result<(), CallingError> {
        self.enter(BridgeCall::Admit(participant.to_string())).await
    }

    async fn decline(&self, participant: &str) -> Result<(), CallingError> {
        self.enter(BridgeCall::Decline(participant.to_string())).await
    }

    async fn admit_all(&self) -> Result<(), CallingError> {
        self.enter(BridgeCall::AdmitAll).await
    }

    async fn set_external_audio_route(&self, route: AudioRoute) -> Result<(), CallingError> {
        self.enter(BridgeCall::SetExternalAudioRoute(route)).await
    }

    async fn start_captions(&self, language: Option<String>) -> Result<(), CallingError> {
        self.enter(BridgeCall::StartCaptions(language)).await
    }

    async fn stop_captions(&self) -> Result<(), CallingError> {
        self.enter(BridgeCall::StopCaptions).await
    }

    fn call_info_stream(&self) -> EventStream<CallInfo> {
        subscribe(&self.events.call_info)
    }

    fn participants_stream(&self) -> EventStream<RosterUpdate> {
        subscribe(&self.events.participants)
    }

    fn dominant_speakers_stream(&self) -> EventStream<Vec<ParticipantId>> {
        subscribe(&self.events.dominant_speakers)
    }

    fn cameras_count_stream(&self) -> EventStream<u32> {
        subscribe(&self.events.cameras_count)
    }

    fn recording_stream(&self) -> EventStream<bool> {
        subscribe(&self.events.recording)
    }

    fn transcribing_stream(&self) -> EventStream<bool> {
        subscribe(&self.events.transcribing)
    }

    fn local_role_stream(&self) -> EventStream<ParticipantRole> {
        subscribe(&self.events.local_role)
    }

    fn diagnostics_stream(&self) -> EventStream<DiagnosticEvent> {
        subscribe(&self.events.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn scripted_failure_is_used_once() {
        let bridge = MockCallingBridge::new();
        bridge.fail_next(BridgeOp::SwitchCamera, CallingError::engine("busy"));

        assert!(bridge.switch_camera().await.is_err());
        assert_eq!(
            bridge.switch_camera().await.unwrap(),
            CameraDeviceSelectionStatus::Back
        );
        assert_eq!(bridge.count(BridgeOp::SwitchCamera), 2);
    }

    #[tokio::test]
    async fn queued_stream_ids_come_first() {
        let bridge = MockCallingBridge::new();
        bridge.queue_stream_id("abc");
        assert_eq!(bridge.turn_camera_on().await.unwrap(), "abc");
        assert_eq!(bridge.turn_camera_on().await.unwrap(), "stream-1");
    }

    #[tokio::test]
    async fn gated_call_waits_for_release() {
        let bridge = MockCallingBridge::new();
        let gate = bridge.gate(BridgeOp::TurnCameraOff);

        let pending = tokio::spawn({
            let bridge = bridge.clone();
            async move { bridge.turn_camera_off().await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!pending.is_finished());
        assert_eq!(bridge.count(BridgeOp::TurnCameraOff), 1);

        gate.release();
        assert!(pending.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn events_reach_open_streams() {
        let bridge = MockCallingBridge::new();
        let mut counts = bridge.cameras_count_stream();
        bridge.emit_cameras_count(2);
        assert_eq!(counts.next().await, Some(2));
    }
}
