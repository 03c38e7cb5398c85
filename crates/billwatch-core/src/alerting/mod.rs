//! Notification delivery
//!
//! Posts cost reports to a Slack incoming webhook.

mod notifier;

pub use notifier::SlackNotifier;
