//! Aging priority dispatch queue.
//!
//! ## Module Organization
//!
//! - `aging_queue.rs` - monitor-based unbounded queue ordered by live effective priority
//! - `metrics.rs` - atomic counters for O(1) stats

mod aging_queue;
mod metrics;

#[cfg(test)]
mod tests;

pub use aging_queue::AgingQueue;
pub use metrics::QueueMetrics;
