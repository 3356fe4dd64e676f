//! Thread-safe unbounded queue ordered by live effective priority.
//!
//! A monitor (parking_lot mutex around a binary heap) plus a tokio `Notify`
//! for wakeups. The heap compares records through [`LogRecord::cmp`], which
//! re-derives each side's effective priority from the wall clock at comparison
//! time, so records age while they wait.
//!
//! Known approximation: a binary heap only re-compares entries during sift
//! operations, so relative order can drift when aging crosses a whole-second
//! boundary while records sit untouched in the heap. Aging granularity is one
//! second; queues drained faster than that never observe the drift.

use std::collections::BinaryHeap;

use parking_lot::Mutex;
use tokio::sync::Notify;

use super::metrics::QueueMetrics;
use crate::protocol::LogRecord;

pub struct AgingQueue {
    heap: Mutex<BinaryHeap<LogRecord>>,
    notify: Notify,
    metrics: QueueMetrics,
}

impl AgingQueue {
    pub fn new() -> Self {
        Self {
            heap: Mutex::new(BinaryHeap::new()),
            notify: Notify::new(),
            metrics: QueueMetrics::new(),
        }
    }

    /// Insert a record. Never blocks, never fails; the record is visible to
    /// waiting removers before this returns.
    pub fn insert(&self, record: LogRecord) {
        {
            let mut heap = self.heap.lock();
            heap.push(record);
            // Depth accounting stays under the lock: the increment is
            // ordered before any matching decrement, so depth cannot
            // underflow.
            self.metrics.record_insert();
        }
        self.notify.notify_one();
    }

    /// Remove the record with the greatest current effective priority,
    /// suspending the caller until one is available.
    ///
    /// Cancel-safe: the pop and the return happen within a single poll, so a
    /// cancelled call has either taken nothing or delivered the record to the
    /// caller, never neither.
    pub async fn remove_highest(&self) -> LogRecord {
        let notified = self.notify.notified();
        tokio::pin!(notified);

        loop {
            // Register for wakeup before checking, so an insert landing
            // between the check and the await is not lost.
            notified.as_mut().enable();

            if let Some(record) = self.try_remove_highest() {
                return record;
            }

            notified.as_mut().await;
            notified.set(self.notify.notified());
        }
    }

    /// Non-blocking variant of [`remove_highest`](Self::remove_highest).
    pub fn try_remove_highest(&self) -> Option<LogRecord> {
        let mut heap = self.heap.lock();
        let record = heap.pop();
        if record.is_some() {
            self.metrics.record_remove();
        }
        record
    }

    /// Advisory snapshot; may be stale immediately after returning.
    pub fn len(&self) -> usize {
        self.heap.lock().len()
    }

    /// Advisory snapshot; may be stale immediately after returning.
    pub fn is_empty(&self) -> bool {
        self.heap.lock().is_empty()
    }

    pub fn metrics(&self) -> &QueueMetrics {
        &self.metrics
    }
}

impl Default for AgingQueue {
    fn default() -> Self {
        Self::new()
    }
}
