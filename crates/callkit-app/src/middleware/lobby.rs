//! Lobby admission.
//!
//! Success is not reported as an action: the roster stream moves the
//! participant out of the lobby. Failures surface as a lobby error code.

use std::sync::Arc;

use tracing::warn;

use super::{emit, EffectContext};
use crate::core::{CallingError, LobbyErrorCode, ParticipantAction};
use crate::store::{Flow, StoreHandle};
use crate::views::ParticipantId;

enum LobbyRequest {
    Admit(ParticipantId),
    Decline(ParticipantId),
    AdmitAll,
}

pub(super) fn handle(
    ctx: &Arc<EffectContext>,
    action: &ParticipantAction,
    store: &StoreHandle,
) -> Flow {
    let request = match action {
        ParticipantAction::AdmitRequested(id) => LobbyRequest::Admit(id.clone()),
        ParticipantAction::DeclineRequested(id) => LobbyRequest::Decline(id.clone()),
        ParticipantAction::AdmitAllRequested => LobbyRequest::AdmitAll,
        _ => return Flow::Continue,
    };

    let bridge = ctx.bridge.clone();
    let store = store.clone();
    ctx.spawn(async move {
        let result: Result<(), CallingError> = match &request {
            LobbyRequest::Admit(id) => bridge.admit(id).await,
            LobbyRequest::Decline(id) => bridge.decline(id).await,
            LobbyRequest::AdmitAll => bridge.admit_all().await,
        };
        if let Err(error) = result {
            let code = LobbyErrorCode::from_error(&error);
            warn!(%error, ?code, "lobby request failed");
            emit(&store, ParticipantAction::LobbyErrorOccurred(code));
        }
    });
    Flow::Continue
}
