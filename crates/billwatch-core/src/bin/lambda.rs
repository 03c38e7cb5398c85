//! AWS Lambda entry point
//!
//! Intended for a scheduled EventBridge rule. The event payload is ignored;
//! every invocation sends one report or fails.

use billwatch::billing::CloudWatchSource;
use billwatch::job::CostReportJob;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = billwatch::Config::load(None)?;
    billwatch::telemetry::init(&config.logging, false);

    let source = CloudWatchSource::from_env(&config.billing.region).await;
    let job = CostReportJob::from_config(source, &config)?;
    let job = &job;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        info!(request_id = %event.context.request_id, "Cost report invoked");
        job.run().await?;
        Ok::<(), Error>(())
    }))
    .await
}
