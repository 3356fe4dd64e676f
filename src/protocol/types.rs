//! Record and priority types for the dispatch queue.
//!
//! A record's ordering key is its *effective* priority: the base class weight
//! plus the whole seconds it has waited since enqueue. The key is derived on
//! every comparison, never cached, so low-priority records age upward and
//! cannot starve.

use std::cmp::Ordering;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Current wall-clock time in milliseconds since the Unix epoch.
#[inline]
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Base priority classes, each mapped to a fixed positive weight.
/// Higher weight = more urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Fixed production cycle used by producers (least to most urgent).
    pub const ROUND: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    #[inline]
    pub const fn weight(self) -> u64 {
        match self {
            Priority::Critical => 100,
            Priority::High => 30,
            Priority::Medium => 10,
            Priority::Low => 1,
        }
    }
}

/// A single unit of work flowing through the dispatch queue.
///
/// `seq` is assigned per producer and only breaks ties between records whose
/// effective priorities have converged; duplicates across producers are legal.
/// All fields are immutable once the record enters the queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub seq: u64,
    pub message: String,
    pub priority: Priority,
    pub enqueued_at_ms: u64,
}

impl LogRecord {
    /// Create a record timestamped now.
    pub fn new(seq: u64, message: impl Into<String>, priority: Priority) -> Self {
        Self {
            seq,
            message: message.into(),
            priority,
            enqueued_at_ms: now_ms(),
        }
    }

    /// Whole seconds this record has waited as of `now_ms`.
    #[inline]
    pub fn waited_secs_at(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.enqueued_at_ms) / 1000
    }

    /// Live ordering key: base weight plus seconds waited.
    #[inline]
    pub fn effective_priority_at(&self, now_ms: u64) -> u64 {
        self.priority.weight() + self.waited_secs_at(now_ms)
    }

    /// Effective priority as of the current wall clock.
    #[inline]
    pub fn effective_priority(&self) -> u64 {
        self.effective_priority_at(now_ms())
    }
}

/// Identity comparison is by sequence number only.
impl PartialEq for LogRecord {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for LogRecord {}

impl Ord for LogRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        // Single clock read per comparison so both sides see the same instant.
        // Equal effective priority resolves by ascending seq: the earlier
        // record is greater in the max-heap, yielding FIFO among converged
        // records.
        let now = now_ms();
        self.effective_priority_at(now)
            .cmp(&other.effective_priority_at(now))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for LogRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
