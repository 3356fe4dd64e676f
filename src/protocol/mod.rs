//! Core record types shared across the dispatch pipeline.

mod types;

pub use types::{now_ms, LogRecord, Priority};
