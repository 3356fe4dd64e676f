//! dispatchq - aging-priority dispatch with deadlock-safe lock coordination.
//!
//! Two independent subsystems:
//!
//! - [`dispatch`] - an unbounded priority queue that orders records by a
//!   time-decaying priority (base class weight plus seconds waited), drained
//!   by any number of concurrent producers and consumers via [`pipeline`].
//! - [`locks`] - a coordinator over a shared lock pair exposing both a naive
//!   acquisition strategy that wedges under opposing-order contention and a
//!   timeout/backoff/retry strategy that is guaranteed to make progress.

pub mod dispatch;
pub mod locks;
pub mod pipeline;
pub mod protocol;
pub mod telemetry;
