//! Billing cost data models

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Currency the billing metric is dimensioned by
pub const USD: &str = "USD";

/// One aggregated estimated-charges observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostDatapoint {
    /// Maximum estimated charges for the period, as reported
    pub maximum: String,

    /// Currency of `maximum`
    pub currency: String,

    /// Start of the aggregation period
    pub timestamp: DateTime<Utc>,
}

impl CostDatapoint {
    /// Create a USD data point
    pub fn new(maximum: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            maximum: maximum.into(),
            currency: USD.to_string(),
            timestamp,
        }
    }

    /// Numeric cost value
    pub fn amount(&self) -> Result<f64> {
        let value: f64 = self
            .maximum
            .trim()
            .parse()
            .map_err(|_| Error::InvalidCost(self.maximum.clone()))?;

        if value.is_finite() {
            Ok(value)
        } else {
            Err(Error::InvalidCost(self.maximum.clone()))
        }
    }

    /// End of the one-day window this point covers
    pub fn window_end(&self) -> Result<DateTime<Utc>> {
        self.timestamp
            .checked_add_signed(Duration::hours(24))
            .ok_or_else(|| Error::InvalidTimestamp(format!("{} + 24h overflows", self.timestamp)))
    }
}

/// Severity of a daily cost figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Below the warning threshold
    Good,
    /// At or above the warning threshold
    Warning,
    /// At or above the danger threshold
    Danger,
}

impl Severity {
    /// Slack attachment color tag
    pub fn color(self) -> &'static str {
        match self {
            Severity::Good => "good",
            Severity::Warning => "warning",
            Severity::Danger => "#ff0000",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_amount_parses_decimal_text() {
        let point = CostDatapoint::new("15.50", Utc::now());
        assert_eq!(point.amount().unwrap(), 15.5);
        assert_eq!(point.currency, "USD");
    }

    #[test]
    fn test_amount_rejects_garbage() {
        let point = CostDatapoint::new("fifteen", Utc::now());
        assert!(matches!(point.amount(), Err(Error::InvalidCost(ref raw)) if raw == "fifteen"));

        let point = CostDatapoint::new("NaN", Utc::now());
        assert!(point.amount().is_err());
    }

    #[test]
    fn test_window_end_adds_one_day() {
        let start = Utc.with_ymd_and_hms(2024, 2, 28, 0, 0, 0).unwrap();
        let point = CostDatapoint::new("1", start);

        assert_eq!(
            point.window_end().unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap()
        );
    }
}
