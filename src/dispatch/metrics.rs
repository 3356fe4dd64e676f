//! Queue metrics with atomic counters for O(1) stats queries.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct QueueMetrics {
    total_inserted: AtomicU64,
    total_removed: AtomicU64,
    depth: AtomicU64,
}

impl QueueMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn record_insert(&self) {
        self.total_inserted.fetch_add(1, Ordering::Relaxed);
        self.depth.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn record_remove(&self) {
        self.total_removed.fetch_add(1, Ordering::Relaxed);
        self.depth.fetch_sub(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inserted(&self) -> u64 {
        self.total_inserted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn removed(&self) -> u64 {
        self.total_removed.load(Ordering::Relaxed)
    }

    /// Advisory queue depth; may be stale under concurrent traffic.
    #[inline]
    pub fn depth(&self) -> u64 {
        self.depth.load(Ordering::Relaxed)
    }
}
