//! Slack webhook delivery

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::NotificationMessage;

/// Sends notifications to a single Slack incoming webhook
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    client: Client,
    webhook_url: String,
}

impl SlackNotifier {
    /// Create a notifier for `webhook_url` with the given request timeout
    pub fn new(webhook_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self::with_client(client, webhook_url))
    }

    /// Create a notifier around an existing HTTP client
    pub fn with_client(client: Client, webhook_url: impl Into<String>) -> Self {
        Self {
            client,
            webhook_url: webhook_url.into(),
        }
    }

    /// Post `message` once. Any transport error or non-2xx status is an error.
    pub async fn deliver(&self, message: &NotificationMessage) -> Result<()> {
        debug!(channel = %message.channel, "Posting Slack notification");

        let response = self
            .client
            .post(&self.webhook_url)
            .json(message)
            .send()
            .await
            .map_err(|e| Error::delivery(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::delivery(format!("Slack returned {status}: {body}")));
        }

        info!(channel = %message.channel, "Slack notification sent");
        Ok(())
    }
}
