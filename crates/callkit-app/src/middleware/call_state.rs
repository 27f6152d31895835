//! Call status stream classification.
//!
//! Every status report becomes one batch, applied without interleaving:
//!
//! ```text
//! StateUpdated(status)
//!   └─ only on the transition into Disconnected:
//!        IsRecordingUpdated(false)
//!        IsTranscribingUpdated(false)
//!        CallStateErrorOccurred(error)      if an error came with it
//!        SetupLaunched | Exit               error → back to setup, none → exit
//! ```

use futures::StreamExt;
use tracing::{debug, info};

use crate::calling_bridge::{CallInfo, EventStream};
use crate::core::{Action, CallingAction, ErrorAction, NavigationAction};
use crate::store::StoreHandle;
use crate::views::CallStatus;

/// Actions for one status report, given the status reported before it.
pub fn classify_call_info(previous: CallStatus, info: &CallInfo) -> Vec<Action> {
    let mut actions: Vec<Action> = vec![CallingAction::StateUpdated(info.status).into()];
    if info.status != CallStatus::Disconnected || previous == CallStatus::Disconnected {
        if let Some(error) = &info.error {
            debug!(
                status = info.status.label(),
                ?error,
                "call error without a new disconnect; not surfaced"
            );
        }
        return actions;
    }

    actions.push(CallingAction::IsRecordingUpdated(false).into());
    actions.push(CallingAction::IsTranscribingUpdated(false).into());
    match &info.error {
        Some(error) => {
            actions.push(ErrorAction::CallStateErrorOccurred(error.clone()).into());
            actions.push(NavigationAction::SetupLaunched.into());
        }
        None => actions.push(NavigationAction::Exit.into()),
    }
    actions
}

/// Forward the status stream into the store until either side ends.
pub(super) async fn forward_call_info(mut stream: EventStream<CallInfo>, store: StoreHandle) {
    let mut previous = CallStatus::None;
    while let Some(info) = stream.next().await {
        let actions = classify_call_info(previous, &info);
        if info.status == CallStatus::Disconnected && previous != CallStatus::Disconnected {
            info!(error = ?info.error, "call disconnected");
        } else {
            debug!(status = info.status.label(), "call status reported");
        }
        previous = info.status;
        if store.dispatch_all(actions).is_err() {
            return;
        }
    }
    debug!("call status stream ended");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CallEventCode, CallStateError, ErrorCode};

    #[test]
    fn plain_disconnect_exits() {
        let actions = classify_call_info(
            CallStatus::Connected,
            &CallInfo::status(CallStatus::Disconnected),
        );
        assert_eq!(
            actions,
            vec![
                CallingAction::StateUpdated(CallStatus::Disconnected).into(),
                CallingAction::IsRecordingUpdated(false).into(),
                CallingAction::IsTranscribingUpdated(false).into(),
                NavigationAction::Exit.into(),
            ]
        );
    }

    #[test]
    fn disconnect_with_error_returns_to_setup() {
        let error = CallStateError::with_event(ErrorCode::CallEndFailed, CallEventCode::CallEvicted);
        let actions = classify_call_info(
            CallStatus::Connected,
            &CallInfo::with_error(CallStatus::Disconnected, error.clone()),
        );
        assert_eq!(actions.len(), 5);
        assert_eq!(
            actions[3],
            Action::from(ErrorAction::CallStateErrorOccurred(error))
        );
        assert_eq!(actions[4], Action::from(NavigationAction::SetupLaunched));
    }

    #[test]
    fn repeated_disconnect_is_status_only() {
        let actions = classify_call_info(
            CallStatus::Disconnected,
            &CallInfo::status(CallStatus::Disconnected),
        );
        assert_eq!(actions.len(), 1);
    }

    #[test]
    fn error_on_repeated_disconnect_is_not_surfaced_again() {
        let error = CallStateError::new(ErrorCode::CallEndFailed);
        let actions = classify_call_info(
            CallStatus::Disconnected,
            &CallInfo::with_error(CallStatus::Disconnected, error),
        );
        assert_eq!(
            actions,
            vec![CallingAction::StateUpdated(CallStatus::Disconnected).into()]
        );
    }

    #[test]
    fn non_terminal_status_is_status_only() {
        let error = CallStateError::new(ErrorCode::NetworkFailure);
        let actions = classify_call_info(
            CallStatus::None,
            &CallInfo::with_error(CallStatus::Connecting, error),
        );
        assert_eq!(
            actions,
            vec![CallingAction::StateUpdated(CallStatus::Connecting).into()]
        );
    }
}
