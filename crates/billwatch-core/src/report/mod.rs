//! Report formatting
//!
//! Turns a billing data point into the Slack message body. Everything here is
//! pure; no I/O happens in this module.

mod builder;

pub use builder::{format_window_end, MessageBuilder, Thresholds};
