//! Client payload definitions

use chat_common::IdentifySettings;
use serde::{Deserialize, Serialize};

/// Payload for op 10 (Hello)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    #[serde(default)]
    pub heartbeat_interval: Option<u64>,
}

/// Payload for op 2 (Identify)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyPayload {
    /// Session token from the REST login
    pub token: String,

    /// Client properties
    #[serde(default)]
    pub properties: IdentifyProperties,
}

impl IdentifyPayload {
    #[must_use]
    pub fn new(token: impl Into<String>, properties: IdentifyProperties) -> Self {
        Self {
            token: token.into(),
            properties,
        }
    }
}

/// Client connection properties
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyProperties {
    /// Browser or client name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,

    /// Device type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,

    /// Operating system
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
}

impl IdentifyProperties {
    /// Create empty properties
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set operating system
    #[must_use]
    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = Some(os.into());
        self
    }

    /// Set browser
    #[must_use]
    pub fn with_browser(mut self, browser: impl Into<String>) -> Self {
        self.browser = Some(browser.into());
        self
    }

    /// Set device type
    #[must_use]
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }
}

impl From<&IdentifySettings> for IdentifyProperties {
    fn from(settings: &IdentifySettings) -> Self {
        Self::new()
            .with_browser(&settings.browser)
            .with_device(&settings.device)
            .with_os(&settings.os)
    }
}
