//! Outgoing chat notification

use serde::{Deserialize, Serialize};

/// Message posted to the Slack incoming webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    /// Headline text
    pub text: String,

    /// Destination channel
    pub channel: String,

    /// Attachments; always exactly one for cost reports
    pub attachments: Vec<Attachment>,
}

/// Colored attachment carrying the cost figure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Body text
    pub text: String,

    /// Color tag
    pub color: String,
}
