//! Daily cost report job
//!
//! One invocation performs a single fetch, a single build and a single post,
//! in that order. Nothing is retried and nothing is kept between runs.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::alerting::SlackNotifier;
use crate::billing::{CostQuery, MetricsSource};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{CostDatapoint, NotificationMessage};
use crate::report::MessageBuilder;

/// Fetch → build → notify pipeline
pub struct CostReportJob<S> {
    source: S,
    query: CostQuery,
    builder: MessageBuilder,
    notifier: SlackNotifier,
}

impl<S: MetricsSource> CostReportJob<S> {
    /// Assemble a job from its parts
    pub fn new(source: S, builder: MessageBuilder, notifier: SlackNotifier) -> Self {
        Self {
            source,
            query: CostQuery::default(),
            builder,
            notifier,
        }
    }

    /// Assemble a job from loaded configuration
    pub fn from_config(source: S, config: &Config) -> Result<Self> {
        let builder =
            MessageBuilder::new(config.slack.channel.clone()).with_thresholds(config.thresholds);
        let notifier = SlackNotifier::new(config.slack.webhook_url.clone(), config.http.timeout())?;

        Ok(Self::new(source, builder, notifier))
    }

    /// Replace the metric query
    pub fn with_query(mut self, query: CostQuery) -> Self {
        self.query = query;
        self
    }

    /// Run the job for the current time
    pub async fn run(&self) -> Result<NotificationMessage> {
        self.run_at(Utc::now()).await
    }

    /// Run the job with the window ending at `now`, returning the delivered message
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<NotificationMessage> {
        let message = self.preview_at(now).await?;
        self.notifier.deliver(&message).await?;
        Ok(message)
    }

    /// Fetch and build without posting
    pub async fn preview_at(&self, now: DateTime<Utc>) -> Result<NotificationMessage> {
        let point = self.fetch_at(now).await?;

        info!(
            maximum = %point.maximum,
            currency = %point.currency,
            timestamp = %point.timestamp,
            "Fetched estimated charges"
        );

        self.builder.build(&point)
    }

    async fn fetch_at(&self, now: DateTime<Utc>) -> Result<CostDatapoint> {
        match self.source.fetch(&self.query, now).await? {
            Some(point) => Ok(point),
            None => {
                let (start, end) = self.query.window(now);
                warn!(%start, %end, "No billing data points in window");
                Err(Error::NoDatapoints {
                    metric: self.query.metric_name.clone(),
                    start: start.to_rfc3339(),
                    end: end.to_rfc3339(),
                })
            }
        }
    }
}
