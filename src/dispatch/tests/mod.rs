//! Aging queue tests.
//!
//! - ordering: effective priority, aging, tie-breaks, drain order
//! - concurrent: conservation under concurrent producers and consumers

use std::sync::Arc;

use super::*;
use crate::protocol::{LogRecord, Priority};

pub fn setup() -> Arc<AgingQueue> {
    Arc::new(AgingQueue::new())
}

pub fn record(seq: u64, priority: Priority) -> LogRecord {
    LogRecord::new(seq, format!("log {seq}"), priority)
}
