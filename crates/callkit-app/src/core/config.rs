//! Composite configuration
//!
//! The orchestration core consumes a small, already-loaded configuration.
//! Loading it (files, host bundles) is the host's job; the serde derives
//! only make that easy.

use serde::{Deserialize, Serialize};

use crate::views::ParticipantRole;

/// External telecom / audio-manager integration mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelecomIntegration {
    /// No integration; the platform audio layer routes on its own
    #[default]
    None,
    /// The calling SDK owns the telecom manager
    SdkProvided,
    /// The host app owns the telecom manager and routes itself
    AppProvided,
}

impl TelecomIntegration {
    /// Whether audio route changes are forwarded through the calling bridge
    #[must_use]
    pub fn forwards_audio_route(&self) -> bool {
        matches!(self, Self::SdkProvided)
    }

    /// Whether audio focus requests are approved by the composite itself
    #[must_use]
    pub fn grants_audio_focus(&self) -> bool {
        matches!(self, Self::SdkProvided)
    }
}

/// Configuration for one composite session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallCompositeConfig {
    /// Telecom integration mode
    pub telecom_integration: TelecomIntegration,
    /// Local display name
    pub display_name: Option<String>,
    /// Role the local user joins with
    pub role: ParticipantRole,
    /// Start the call with the camera on
    pub camera_on_by_default: bool,
    /// Start the call with the microphone on
    pub microphone_on_by_default: bool,
    /// Join directly, without the setup screen
    pub skip_setup_screen: bool,
}

impl Default for CallCompositeConfig {
    fn default() -> Self {
        Self {
            telecom_integration: TelecomIntegration::None,
            display_name: None,
            role: ParticipantRole::Attendee,
            camera_on_by_default: false,
            microphone_on_by_default: false,
            skip_setup_screen: false,
        }
    }
}

impl CallCompositeConfig {
    /// Set the telecom integration mode
    #[must_use]
    pub fn with_telecom_integration(mut self, mode: TelecomIntegration) -> Self {
        self.telecom_integration = mode;
        self
    }

    /// Set the local display name
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Join without the setup screen
    #[must_use]
    pub fn skipping_setup_screen(mut self) -> Self {
        self.skip_setup_screen = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_sdk_provided_forwards() {
        assert!(TelecomIntegration::SdkProvided.forwards_audio_route());
        assert!(!TelecomIntegration::AppProvided.forwards_audio_route());
        assert!(!TelecomIntegration::None.forwards_audio_route());
        assert!(!TelecomIntegration::AppProvided.grants_audio_focus());
    }

    #[test]
    fn builder_helpers() {
        let config = CallCompositeConfig::default()
            .with_telecom_integration(TelecomIntegration::SdkProvided)
            .with_display_name("Ada")
            .skipping_setup_screen();
        assert_eq!(config.display_name.as_deref(), Some("Ada"));
        assert!(config.skip_setup_screen);
        assert_eq!(config.role, ParticipantRole::Attendee);
    }
}
