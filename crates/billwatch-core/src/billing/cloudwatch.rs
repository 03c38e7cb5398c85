//! CloudWatch-backed billing source

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_cloudwatch::config::Region;
use aws_sdk_cloudwatch::error::DisplayErrorContext;
use aws_sdk_cloudwatch::primitives::DateTime as AwsDateTime;
use aws_sdk_cloudwatch::types::{Datapoint, Dimension, Statistic};
use aws_sdk_cloudwatch::Client;
use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::CostDatapoint;

use super::{CostQuery, MetricsSource};

/// Reads estimated charges from CloudWatch `GetMetricStatistics`
#[derive(Clone)]
pub struct CloudWatchSource {
    client: Client,
}

impl CloudWatchSource {
    /// Build a source from the shared AWS configuration for `region`
    pub async fn from_env(region: &str) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        Self::new(Client::new(&shared))
    }

    /// Wrap an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MetricsSource for CloudWatchSource {
    async fn fetch(&self, query: &CostQuery, now: DateTime<Utc>) -> Result<Option<CostDatapoint>> {
        let (start, end) = query.window(now);

        debug!(
            namespace = %query.namespace,
            metric = %query.metric_name,
            %start,
            %end,
            "Querying CloudWatch"
        );

        let currency = Dimension::builder()
            .name("Currency")
            .value(&query.currency)
            .build();

        let output = self
            .client
            .get_metric_statistics()
            .namespace(&query.namespace)
            .metric_name(&query.metric_name)
            .dimensions(currency)
            .start_time(AwsDateTime::from_secs(start.timestamp()))
            .end_time(AwsDateTime::from_secs(end.timestamp()))
            .period(query.period_secs)
            .statistics(Statistic::Maximum)
            .send()
            .await
            .map_err(|e| Error::fetch(DisplayErrorContext(e).to_string()))?;

        let datapoints = output.datapoints();
        debug!(count = datapoints.len(), "CloudWatch returned datapoints");

        datapoints
            .first()
            .map(|point| to_cost_datapoint(point, &query.currency))
            .transpose()
    }
}

fn to_cost_datapoint(point: &Datapoint, currency: &str) -> Result<CostDatapoint> {
    let maximum = point
        .maximum()
        .ok_or_else(|| Error::fetch("datapoint has no Maximum statistic"))?;
    let timestamp = point
        .timestamp()
        .ok_or_else(|| Error::fetch("datapoint has no Timestamp"))?;

    // Debug keeps the fractional part of whole amounts ("5.0", not "5")
    Ok(CostDatapoint {
        maximum: format!("{maximum:?}"),
        currency: currency.to_string(),
        timestamp: to_utc(timestamp)?,
    })
}

fn to_utc(timestamp: &AwsDateTime) -> Result<DateTime<Utc>> {
    Utc.timestamp_opt(timestamp.secs(), timestamp.subsec_nanos())
        .single()
        .ok_or_else(|| Error::fetch(format!("datapoint timestamp out of range: {timestamp:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_cloudwatch::error::ErrorMetadata;
    use aws_sdk_cloudwatch::operation::get_metric_statistics::{
        GetMetricStatisticsError, GetMetricStatisticsOutput,
    };
    use aws_smithy_mocks::{mock, mock_client};

    use crate::report::MessageBuilder;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_sends_billing_query() {
        let start = now() - chrono::Duration::hours(24);
        let end = now();

        let rule = mock!(Client::get_metric_statistics)
            .match_requests(move |req| {
                req.namespace() == Some("AWS/Billing")
                    && req.metric_name() == Some("EstimatedCharges")
                    && req
                        .dimensions()
                        .iter()
                        .any(|d| d.name() == Some("Currency") && d.value() == Some("USD"))
                    && req.statistics() == [Statistic::Maximum]
                    && req.period() == Some(86_400)
                    && req.start_time().map(AwsDateTime::secs) == Some(start.timestamp())
                    && req.end_time().map(AwsDateTime::secs) == Some(end.timestamp())
            })
            .then_output(|| {
                GetMetricStatisticsOutput::builder()
                    .datapoints(
                        Datapoint::builder()
                            .maximum(15.5)
                            .timestamp(AwsDateTime::from_secs(1_704_067_200))
                            .build(),
                    )
                    .build()
            });
        let source = CloudWatchSource::new(mock_client!(aws_sdk_cloudwatch, [&rule]));

        let point = source
            .fetch(&CostQuery::default(), now())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(rule.num_calls(), 1);
        assert_eq!(point.maximum, "15.5");
        assert_eq!(point.timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_fetch_without_datapoints_is_none() {
        let rule = mock!(Client::get_metric_statistics)
            .then_output(|| GetMetricStatisticsOutput::builder().build());
        let source = CloudWatchSource::new(mock_client!(aws_sdk_cloudwatch, [&rule]));

        let point = source.fetch(&CostQuery::default(), now()).await.unwrap();

        assert_eq!(point, None);
    }

    #[tokio::test]
    async fn test_fetch_service_error_is_fetch_error() {
        let rule = mock!(Client::get_metric_statistics).then_error(|| {
            GetMetricStatisticsError::generic(
                ErrorMetadata::builder()
                    .code("AccessDenied")
                    .message("not authorized")
                    .build(),
            )
        });
        let source = CloudWatchSource::new(mock_client!(aws_sdk_cloudwatch, [&rule]));

        let err = source.fetch(&CostQuery::default(), now()).await.unwrap_err();

        assert!(matches!(err, Error::Fetch(_)));
    }

    #[test]
    fn test_converts_datapoint() {
        let point = Datapoint::builder()
            .maximum(15.5)
            .timestamp(AwsDateTime::from_secs(1_704_067_200))
            .build();

        let cost = to_cost_datapoint(&point, "USD").unwrap();

        assert_eq!(cost.maximum, "15.5");
        assert_eq!(cost.currency, "USD");
        assert_eq!(cost.timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_whole_dollar_amount_keeps_decimal() {
        let point = Datapoint::builder()
            .maximum(5.0)
            .timestamp(AwsDateTime::from_secs(1_704_067_200))
            .build();

        let cost = to_cost_datapoint(&point, "USD").unwrap();
        assert_eq!(cost.maximum, "5.0");

        let message = MessageBuilder::new("#billing").build(&cost).unwrap();
        assert_eq!(message.attachments[0].text, "$5.0");
    }

    #[test]
    fn test_missing_maximum_is_fetch_error() {
        let point = Datapoint::builder()
            .timestamp(AwsDateTime::from_secs(1_704_067_200))
            .build();

        assert!(matches!(to_cost_datapoint(&point, "USD"), Err(Error::Fetch(_))));
    }
}
