//! Producer and consumer workers driving the aging dispatch queue.
//!
//! Producers synthesize a configured number of records, cycling through the
//! priority classes least-to-most urgent. Consumers drain the queue forever,
//! handing each record to a downstream sink; they stop when the sink closes
//! or their task is aborted. Aborting a consumer at its suspension point
//! cannot lose a record: removal is atomic within a single poll.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::dispatch::AgingQueue;
use crate::protocol::{LogRecord, Priority};

/// Emits `records_to_produce` records with strictly increasing sequence
/// numbers starting at `seq_base`, then terminates.
pub struct Producer {
    queue: Arc<AgingQueue>,
    seq_base: u64,
    records_to_produce: usize,
}

impl Producer {
    pub fn new(queue: Arc<AgingQueue>, records_to_produce: usize) -> Self {
        Self {
            queue,
            seq_base: 0,
            records_to_produce,
        }
    }

    /// Offset sequence numbers so concurrent producers emit disjoint ranges.
    pub fn with_seq_base(mut self, seq_base: u64) -> Self {
        self.seq_base = seq_base;
        self
    }

    pub async fn run(self) {
        for i in 0..self.records_to_produce {
            let priority = Priority::ROUND[i % Priority::ROUND.len()];
            let record = LogRecord::new(self.seq_base + i as u64, format!("log {i}"), priority);
            debug!(seq = record.seq, priority = ?record.priority, "produced record");
            self.queue.insert(record);
            tokio::task::yield_now().await;
        }
    }
}

/// Drains the queue in an unbounded loop, forwarding each record to the sink.
pub struct Consumer {
    queue: Arc<AgingQueue>,
    sink: mpsc::UnboundedSender<LogRecord>,
}

impl Consumer {
    pub fn new(queue: Arc<AgingQueue>, sink: mpsc::UnboundedSender<LogRecord>) -> Self {
        Self { queue, sink }
    }

    pub async fn run(self) {
        loop {
            let record = self.queue.remove_highest().await;
            debug!(seq = record.seq, priority = ?record.priority, "consumed record");
            if self.sink.send(record).is_err() {
                // Sink closed, nothing downstream wants records anymore.
                break;
            }
        }
    }
}

/// Wires N producers and M consumers to one shared queue.
pub struct Pipeline {
    queue: Arc<AgingQueue>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            queue: Arc::new(AgingQueue::new()),
        }
    }

    pub fn with_queue(queue: Arc<AgingQueue>) -> Self {
        Self { queue }
    }

    pub fn queue(&self) -> Arc<AgingQueue> {
        Arc::clone(&self.queue)
    }

    /// Spawn `count` producers, each emitting `records_each` records in a
    /// disjoint sequence range.
    pub fn spawn_producers(&self, count: usize, records_each: usize) -> Vec<JoinHandle<()>> {
        (0..count)
            .map(|p| {
                let producer = Producer::new(self.queue(), records_each)
                    .with_seq_base(p as u64 * 1000);
                tokio::spawn(producer.run())
            })
            .collect()
    }

    /// Spawn `count` consumers all feeding the same sink.
    pub fn spawn_consumers(
        &self,
        count: usize,
        sink: mpsc::UnboundedSender<LogRecord>,
    ) -> Vec<JoinHandle<()>> {
        (0..count)
            .map(|_| {
                let consumer = Consumer::new(self.queue(), sink.clone());
                tokio::spawn(consumer.run())
            })
            .collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
