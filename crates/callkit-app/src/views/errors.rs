//! # Error View State
//!
//! Errors the presentation layer turns into banners, toasts, or exits.

use serde::{Deserialize, Serialize};

use crate::core::{CallStateError, FatalError, OperationError};

/// Error state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorState {
    /// Error that ends the composite
    pub fatal_error: Option<FatalError>,
    /// Error that accompanied the last call termination
    pub call_state_error: Option<CallStateError>,
    /// Last failed call-control operation (end, hold, resume)
    pub operation_error: Option<OperationError>,
}
