//! Configuration management for BillWatch
//!
//! Settings come from an optional config file overlaid by the process
//! environment. Keys are the lowercased environment variable names, so
//! `SLACK_WEBHOOK_URL` in the environment and `slack_webhook_url` in a file
//! set the same value.

use std::time::Duration;

use config::{Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};
use crate::report::Thresholds;

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Slack delivery configuration
    pub slack: SlackConfig,

    /// Billing metric configuration
    pub billing: BillingConfig,

    /// Severity thresholds
    pub thresholds: Thresholds,

    /// Outbound HTTP configuration
    pub http: HttpConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Slack configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Incoming webhook URL
    pub webhook_url: String,
    /// Destination channel
    pub channel: String,
}

/// Billing metric configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    /// Region the billing metrics are published in
    pub region: String,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl HttpConfig {
    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (json or pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Flat view of the recognised keys, as they appear in the environment
#[derive(Debug, Deserialize)]
struct RawSettings {
    slack_webhook_url: Option<String>,
    slack_channel: Option<String>,
    aws_billing_region: Option<String>,
    cost_warning_threshold: Option<f64>,
    cost_danger_threshold: Option<f64>,
    http_timeout_secs: Option<u64>,
    log_level: Option<String>,
    log_format: Option<String>,
}

impl Config {
    /// Load configuration from an optional file and the process environment
    pub fn load(path: Option<&str>) -> Result<Self> {
        Self::from_sources(path, Environment::default())
    }

    /// Load configuration from an optional file and the given environment source
    ///
    /// Tests pass an `Environment` with an explicit source map so the process
    /// environment is never touched.
    pub fn from_sources(path: Option<&str>, env: Environment) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }

        let raw: RawSettings = builder.add_source(env).build()?.try_deserialize()?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSettings) -> Result<Self> {
        let webhook_url = required(raw.slack_webhook_url, "SLACK_WEBHOOK_URL")?;
        let channel = required(raw.slack_channel, "SLACK_CHANNEL")?;

        let defaults = Thresholds::default();
        let thresholds = Thresholds {
            warning: raw.cost_warning_threshold.unwrap_or(defaults.warning),
            danger: raw.cost_danger_threshold.unwrap_or(defaults.danger),
        };

        let logging_defaults = LoggingConfig::default();
        let config = Self {
            slack: SlackConfig {
                webhook_url,
                channel,
            },
            billing: BillingConfig {
                region: raw
                    .aws_billing_region
                    .unwrap_or_else(|| BillingConfig::default().region),
            },
            thresholds,
            http: HttpConfig {
                timeout_secs: raw
                    .http_timeout_secs
                    .unwrap_or(HttpConfig::default().timeout_secs),
            },
            logging: LoggingConfig {
                level: raw
                    .log_level
                    .map(|level| level.to_lowercase())
                    .unwrap_or(logging_defaults.level),
                format: raw
                    .log_format
                    .map(|format| format.to_lowercase())
                    .unwrap_or(logging_defaults.format),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.slack.webhook_url)
            .map_err(|e| Error::config(format!("SLACK_WEBHOOK_URL is not a valid URL: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "SLACK_WEBHOOK_URL must be http(s), got {}",
                url.scheme()
            )));
        }

        if self.billing.region.trim().is_empty() {
            return Err(Error::config("AWS_BILLING_REGION must not be empty"));
        }

        self.thresholds.validate()?;

        if self.http.timeout_secs == 0 {
            return Err(Error::config("HTTP_TIMEOUT_SECS must be greater than 0"));
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(Error::config(format!(
                "LOG_FORMAT must be 'pretty' or 'json', got '{}'",
                self.logging.format
            )));
        }

        Ok(())
    }
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::config(format!("{name} is not set"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Environment::default().source(Some(source))
    }

    #[test]
    fn test_load_required_values_with_defaults() {
        let config = Config::from_sources(
            None,
            env(&[
                ("SLACK_WEBHOOK_URL", "https://hooks.slack.com/services/T/B/X"),
                ("SLACK_CHANNEL", "#billing"),
            ]),
        )
        .unwrap();

        assert_eq!(config.slack.webhook_url, "https://hooks.slack.com/services/T/B/X");
        assert_eq!(config.slack.channel, "#billing");
        assert_eq!(config.billing.region, "us-east-1");
        assert_eq!(config.thresholds, Thresholds::default());
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_missing_webhook_url_fails() {
        let err = Config::from_sources(None, env(&[("SLACK_CHANNEL", "#billing")])).unwrap_err();

        assert!(matches!(err, Error::Config(ref msg) if msg.contains("SLACK_WEBHOOK_URL")));
    }

    #[test]
    fn test_missing_channel_fails() {
        let err = Config::from_sources(
            None,
            env(&[("SLACK_WEBHOOK_URL", "https://hooks.slack.com/services/T/B/X")]),
        )
        .unwrap_err();

        assert!(matches!(err, Error::Config(ref msg) if msg.contains("SLACK_CHANNEL")));
    }

    #[test]
    fn test_optional_overrides() {
        let config = Config::from_sources(
            None,
            env(&[
                ("SLACK_WEBHOOK_URL", "http://localhost:9000/hook"),
                ("SLACK_CHANNEL", "alerts"),
                ("AWS_BILLING_REGION", "us-west-2"),
                ("COST_WARNING_THRESHOLD", "5"),
                ("COST_DANGER_THRESHOLD", "50.5"),
                ("HTTP_TIMEOUT_SECS", "5"),
                ("LOG_FORMAT", "JSON"),
            ]),
        )
        .unwrap();

        assert_eq!(config.billing.region, "us-west-2");
        assert_eq!(config.thresholds.warning, 5.0);
        assert_eq!(config.thresholds.danger, 50.5);
        assert_eq!(config.http.timeout(), Duration::from_secs(5));
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_invalid_webhook_url_rejected() {
        let err = Config::from_sources(
            None,
            env(&[("SLACK_WEBHOOK_URL", "not a url"), ("SLACK_CHANNEL", "alerts")]),
        )
        .unwrap_err();

        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let err = Config::from_sources(
            None,
            env(&[
                ("SLACK_WEBHOOK_URL", "https://hooks.slack.com/services/T/B/X"),
                ("SLACK_CHANNEL", "alerts"),
                ("COST_WARNING_THRESHOLD", "200"),
            ]),
        )
        .unwrap_err();

        assert!(matches!(err, Error::Config(_)));
    }
}
