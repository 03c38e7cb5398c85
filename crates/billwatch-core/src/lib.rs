//! # BillWatch
//!
//! Daily AWS estimated-charges report for Slack.
//!
//! BillWatch reads the maximum `AWS/Billing` `EstimatedCharges` value for the
//! last day from CloudWatch, colors it by cost threshold, and posts it to a
//! Slack incoming webhook.
//!
//! ## Architecture
//!
//! - **Billing**: CloudWatch metric fetch
//! - **Report**: pure message formatting
//! - **Alerting**: Slack webhook delivery
//! - **Job**: one fetch, one build, one post per invocation
//!
//! ## Quick Start
//!
//! ```bash
//! export SLACK_WEBHOOK_URL=https://hooks.slack.com/services/...
//! export SLACK_CHANNEL='#billing'
//! billwatch run
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod alerting;
pub mod billing;
pub mod config;
pub mod error;
pub mod job;
pub mod models;
pub mod report;
pub mod telemetry;

pub use config::Config;
pub use error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::alerting::SlackNotifier;
    pub use crate::billing::{CloudWatchSource, CostQuery, MetricsSource, StaticSource};
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::job::CostReportJob;
    pub use crate::models::*;
    pub use crate::report::{MessageBuilder, Thresholds};
}
