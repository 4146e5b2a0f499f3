//! Push payload display
//!
//! The notification service delivers `{notification: {title, body},
//! data}`; nothing beyond that shape is enforced. The client's whole
//! contribution is registering a token and showing the banner text.

use serde::{Deserialize, Serialize};

/// Push payload as delivered by the notification service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushPayload {
    pub notification: NotificationContent,
    /// Opaque extra data, passed through untouched
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl PushPayload {
    /// Parse a raw JSON payload
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Banner line shown to the user
    pub fn format_banner(&self) -> String {
        if self.notification.body.is_empty() {
            self.notification.title.clone()
        } else {
            format!("{}: {}", self.notification.title, self.notification.body)
        }
    }
}
