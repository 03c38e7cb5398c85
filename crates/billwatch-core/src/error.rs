//! Error types for BillWatch

use thiserror::Error;

/// Result type alias using BillWatch's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for BillWatch operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The metrics service could not be queried or answered with malformed data
    #[error("Metric fetch failed: {0}")]
    Fetch(String),

    /// The metrics service returned no data points for the window
    #[error("No {metric} data points between {start} and {end}")]
    NoDatapoints {
        /// Queried metric name
        metric: String,
        /// Window start (RFC 3339)
        start: String,
        /// Window end (RFC 3339)
        end: String,
    },

    /// Cost value could not be read as a number
    #[error("Invalid cost value: {0:?}")]
    InvalidCost(String),

    /// Timestamp could not be parsed or shifted
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Webhook delivery failed
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a fetch error
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Create a delivery error
    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
