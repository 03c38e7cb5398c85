//! Billing metric fetching
//!
//! A `MetricsSource` answers a `CostQuery` with at most one data point. The
//! CloudWatch implementation talks to AWS; `StaticSource` serves a fixed
//! answer for offline rendering and tests.

mod cloudwatch;

pub use cloudwatch::CloudWatchSource;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{CostDatapoint, USD};

/// Parameters of the estimated-charges query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostQuery {
    /// Metric namespace
    pub namespace: String,
    /// Metric name
    pub metric_name: String,
    /// Value of the `Currency` dimension
    pub currency: String,
    /// Length of the queried window, in seconds
    pub window_secs: i64,
    /// Aggregation period, in seconds
    pub period_secs: i32,
}

impl Default for CostQuery {
    fn default() -> Self {
        Self {
            namespace: "AWS/Billing".to_string(),
            metric_name: "EstimatedCharges".to_string(),
            currency: USD.to_string(),
            window_secs: 86_400,
            period_secs: 86_400,
        }
    }
}

impl CostQuery {
    /// Query window `[now - window, now]`
    pub fn window(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        (now - Duration::seconds(self.window_secs), now)
    }
}

/// Source of billing data points
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Fetch the maximum estimated charges over the window ending at `now`
    ///
    /// Returns `None` when the service reports no data points.
    async fn fetch(&self, query: &CostQuery, now: DateTime<Utc>) -> Result<Option<CostDatapoint>>;
}

/// Source that always answers with the same data point
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    point: Option<CostDatapoint>,
}

impl StaticSource {
    /// Source answering with `point`
    pub fn new(point: CostDatapoint) -> Self {
        Self { point: Some(point) }
    }

    /// Source answering with no data points
    pub fn empty() -> Self {
        Self { point: None }
    }
}

#[async_trait]
impl MetricsSource for StaticSource {
    async fn fetch(&self, _query: &CostQuery, _now: DateTime<Utc>) -> Result<Option<CostDatapoint>> {
        Ok(self.point.clone())
    }
}
