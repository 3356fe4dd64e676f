//! Lock coordination over a shared pair of exclusive locks.
//!
//! Models two competing acquisition disciplines through one interface:
//!
//! - [`AcquireStrategy::Naive`] - take the path's first lock with an unbounded
//!   wait, hold it across a delay, then take the second. Two paths using
//!   opposite orders wedge each other by design; this is the demonstration
//!   outcome, not a bug.
//! - [`AcquireStrategy::Ordered`] - every path attempts the locks in canonical
//!   order with a bounded wait per attempt, releasing everything and backing
//!   off with jitter on timeout. Bounded attempts break any circular wait,
//!   and jitter decorrelates competing retry schedules.

use std::fmt;
use std::time::Duration;

use tokio::sync::Mutex;

mod coordinator;

#[cfg(test)]
mod tests;

pub use coordinator::LockCoordinator;

/// Two named exclusive locks with no ownership relationship. They protect no
/// data; they exist purely to model contention.
pub struct LockPair {
    pub(crate) first: Mutex<()>,
    pub(crate) second: Mutex<()>,
}

impl LockPair {
    pub fn new() -> Self {
        Self {
            first: Mutex::new(()),
            second: Mutex::new(()),
        }
    }
}

impl Default for LockPair {
    fn default() -> Self {
        Self::new()
    }
}

/// Which lock a naive path takes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireOrder {
    FirstThenSecond,
    SecondThenFirst,
}

/// Acquisition discipline for [`LockCoordinator::acquire_both`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireStrategy {
    /// Unbounded nested acquisition in the given order.
    Naive(AcquireOrder),
    /// Canonical order, bounded waits, randomized backoff, bounded retries.
    Ordered,
}

/// Timing knobs for the coordinator. Defaults mirror the reference constants.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Bounded wait per individual lock attempt (ordered strategy).
    pub lock_timeout: Duration,
    /// Delay between first and second acquisition, widening the race window.
    pub hold_delay: Duration,
    /// Fixed component of the retry backoff.
    pub backoff_base: Duration,
    /// Upper bound (exclusive) of the random jitter added to each backoff, ms.
    pub backoff_jitter_ms: u64,
    /// Attempts before the ordered strategy gives up.
    pub max_attempts: u32,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_millis(100),
            hold_delay: Duration::from_millis(20),
            backoff_base: Duration::from_millis(20),
            backoff_jitter_ms: 10,
            max_attempts: 5,
        }
    }
}

/// Failure surface of the ordered strategy. The naive strategy has no error:
/// its failure mode is non-termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireError {
    /// Every bounded attempt timed out on one of the two locks.
    RetryExhausted { attempts: u32 },
}

impl fmt::Display for AcquireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquireError::RetryExhausted { attempts } => {
                write!(f, "lock acquisition retries exhausted after {attempts} attempts")
            }
        }
    }
}

impl std::error::Error for AcquireError {}
