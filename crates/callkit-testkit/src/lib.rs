//! Callkit Testing Infrastructure
//!
//! Test doubles and harnesses for driving the orchestration core without a
//! calling engine: a scripted [`MockCallingBridge`], a
//! [`RecordingMiddleware`] that captures every admitted action, and a
//! [`TestSession`] that wires both to a real store.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(missing_docs)]
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! callkit-testkit = { path = "../callkit-testkit" }
//! ```
//!
//! ```rust,ignore
//! use callkit_testkit::*;
//!
//! #[tokio::test]
//! async fn camera_turns_on() {
//!     let session = TestSession::builder()
//!         .in_call(CameraOperationalStatus::Off)
//!         .build();
//!     session.bridge.queue_stream_id("abc");
//!     session.dispatch(LocalParticipantAction::TurnCameraOn);
//!     session
//!         .wait_for(LocalParticipantAction::CameraOnSucceeded {
//!             video_stream_id: "abc".into(),
//!         })
//!         .await;
//! }
//! ```

pub mod harness;
pub mod mock_bridge;
pub mod recording;

pub use harness::{TestSession, TestSessionBuilder, WAIT};
pub use mock_bridge::{BridgeCall, BridgeOp, GateHandle, MockCallingBridge};
pub use recording::RecordingMiddleware;
