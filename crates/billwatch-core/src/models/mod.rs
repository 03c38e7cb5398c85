//! Data models for BillWatch

mod cost;
mod message;

pub use cost::*;
pub use message::*;
