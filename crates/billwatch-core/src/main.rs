//! BillWatch CLI
//!
//! Command-line entry point for the daily cost report.

use std::process::ExitCode;

use anyhow::Context;
use billwatch::billing::CloudWatchSource;
use billwatch::config::LoggingConfig;
use billwatch::job::CostReportJob;
use billwatch::models::{CostDatapoint, NotificationMessage};
use billwatch::report::MessageBuilder;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::{error, info};

/// BillWatch - Daily AWS cost report for Slack
#[derive(Parser)]
#[command(name = "billwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "BILLWATCH_CONFIG")]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch yesterday's estimated charges and post them to Slack
    Run,

    /// Fetch and print the message without posting it
    Preview,

    /// Build a message from the given values without any network access
    Render {
        /// Cost value as reported by CloudWatch (e.g. "15.50")
        #[arg(long)]
        cost: String,

        /// Start of the one-day window (RFC 3339)
        #[arg(long)]
        timestamp: DateTime<Utc>,

        /// Destination channel
        #[arg(long, env = "SLACK_CHANNEL")]
        channel: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is normal
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = billwatch::Config::load(cli.config.as_deref());
    let logging = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_else(|_| LoggingConfig::default());
    billwatch::telemetry::init(&logging, cli.verbose);

    let result = match cli.command {
        Commands::Run => run(config).await,
        Commands::Preview => preview(config).await,
        Commands::Render {
            cost,
            timestamp,
            channel,
        } => render(&config, cost, timestamp, channel),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn cloudwatch_job(
    config: billwatch::Result<billwatch::Config>,
) -> anyhow::Result<CostReportJob<CloudWatchSource>> {
    let config = config.context("loading configuration")?;
    let source = CloudWatchSource::from_env(&config.billing.region).await;
    Ok(CostReportJob::from_config(source, &config)?)
}

async fn run(config: billwatch::Result<billwatch::Config>) -> anyhow::Result<()> {
    let job = cloudwatch_job(config).await?;
    let message = job.run().await?;

    info!(headline = %message.text, color = %message.attachments[0].color, "Cost report delivered");
    Ok(())
}

async fn preview(config: billwatch::Result<billwatch::Config>) -> anyhow::Result<()> {
    let job = cloudwatch_job(config).await?;
    let message = job.preview_at(Utc::now()).await?;
    print_message(&message)
}

fn render(
    config: &billwatch::Result<billwatch::Config>,
    cost: String,
    timestamp: DateTime<Utc>,
    channel: String,
) -> anyhow::Result<()> {
    let thresholds = config
        .as_ref()
        .map(|c| c.thresholds)
        .unwrap_or_default();
    let builder = MessageBuilder::new(channel).with_thresholds(thresholds);

    let message = builder.build(&CostDatapoint::new(cost, timestamp))?;
    print_message(&message)
}

fn print_message(message: &NotificationMessage) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(message)?);
    Ok(())
}
