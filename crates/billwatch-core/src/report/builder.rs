//! Cost report message builder

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Attachment, CostDatapoint, NotificationMessage, Severity};

/// Japan Standard Time offset in seconds
const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Label format for the end of the reported window
const LABEL_FORMAT: &str = "%Y年%m月%d日%H時%M分";

/// Cost thresholds selecting the attachment color
///
/// Comparisons are inclusive: a cost equal to a threshold gets the higher
/// severity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Costs at or above this are `Warning`
    pub warning: f64,
    /// Costs at or above this are `Danger`
    pub danger: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warning: 10.0,
            danger: 100.0,
        }
    }
}

impl Thresholds {
    /// Classify a cost value
    pub fn classify(&self, cost: f64) -> Severity {
        if cost >= self.danger {
            Severity::Danger
        } else if cost >= self.warning {
            Severity::Warning
        } else {
            Severity::Good
        }
    }

    /// Validate the threshold pair
    pub fn validate(&self) -> Result<()> {
        if !self.warning.is_finite() || !self.danger.is_finite() {
            return Err(Error::config("cost thresholds must be finite"));
        }
        if self.warning < 0.0 {
            return Err(Error::config("COST_WARNING_THRESHOLD must not be negative"));
        }
        if self.warning > self.danger {
            return Err(Error::config(format!(
                "COST_WARNING_THRESHOLD ({}) exceeds COST_DANGER_THRESHOLD ({})",
                self.warning, self.danger
            )));
        }
        Ok(())
    }
}

/// Format the end of a data point's window in JST
pub fn format_window_end(point: &CostDatapoint) -> Result<String> {
    let jst = FixedOffset::east_opt(JST_OFFSET_SECS)
        .ok_or_else(|| Error::InvalidTimestamp("JST offset out of range".to_string()))?;
    let end: DateTime<Utc> = point.window_end()?;

    Ok(end.with_timezone(&jst).format(LABEL_FORMAT).to_string())
}

/// Builds Slack messages for a fixed channel
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    channel: String,
    thresholds: Thresholds,
}

impl MessageBuilder {
    /// Create a builder with the default thresholds
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            thresholds: Thresholds::default(),
        }
    }

    /// Override the severity thresholds
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Destination channel
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Severity for a data point
    pub fn severity(&self, point: &CostDatapoint) -> Result<Severity> {
        Ok(self.thresholds.classify(point.amount()?))
    }

    /// Build the notification for a data point
    pub fn build(&self, point: &CostDatapoint) -> Result<NotificationMessage> {
        let label = format_window_end(point)?;
        let severity = self.severity(point)?;

        Ok(NotificationMessage {
            text: format!("{label}までのAWSの料金"),
            channel: self.channel.clone(),
            attachments: vec![Attachment {
                text: format!("${}", point.maximum),
                color: severity.color().to_string(),
            }],
        })
    }
}
