//! Live captions start/stop.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{emit, settled_state, EffectContext};
use crate::core::{CallingError, CaptionsAction};
use crate::store::{Flow, StoreHandle};
use crate::views::{AppState, CaptionsStatus};

pub(super) fn handle(
    ctx: &Arc<EffectContext>,
    action: &CaptionsAction,
    state: &AppState,
    store: &StoreHandle,
) -> Flow {
    let status = state.captions.status;
    let starting = match action {
        CaptionsAction::StartRequested { .. } => true,
        CaptionsAction::StopRequested => false,
        _ => return Flow::Continue,
    };

    if !state.call.status.is_in_call() {
        emit(
            store,
            CaptionsAction::Failed {
                error: CallingError::precondition("captions need a connected call"),
            },
        );
        return Flow::Consume;
    }
    let ready = if starting {
        !status.is_in_flight() && status != CaptionsStatus::Started
    } else {
        status == CaptionsStatus::Started
    };
    if !ready {
        debug!(?status, starting, "captions request ignored");
        return Flow::Consume;
    }

    let language = match action {
        CaptionsAction::StartRequested { language } => language.clone(),
        _ => None,
    };
    let expected = if starting {
        CaptionsStatus::Starting
    } else {
        CaptionsStatus::Stopping
    };
    let bridge = ctx.bridge.clone();
    let store = store.clone();
    ctx.spawn(async move {
        let result = if starting {
            bridge.start_captions(language.clone()).await
        } else {
            bridge.stop_captions().await
        };
        let Some(state) = settled_state(&store).await else {
            return;
        };
        if state.captions.status != expected {
            debug!(?result, "captions result is stale; dropped");
            return;
        }
        match result {
            Ok(()) if starting => emit(&store, CaptionsAction::Started { language }),
            Ok(()) => emit(&store, CaptionsAction::Stopped),
            Err(error) => {
                warn!(%error, starting, "captions request failed");
                emit(&store, CaptionsAction::Failed { error });
            }
        }
    });
    Flow::Continue
}
