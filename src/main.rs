//! Demo runner: drives the producer/consumer pipeline to completion, then
//! runs the defensive lock drill.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use dispatchq::locks::{AcquireStrategy, LockCoordinator};
use dispatchq::pipeline::Pipeline;
use dispatchq::telemetry;

const DEFAULT_PRODUCERS: usize = 2;
const DEFAULT_CONSUMERS: usize = 2;
const DEFAULT_RECORDS_PER_PRODUCER: usize = 20;
const LOCK_DRILL_TASKS: usize = 4;

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() {
    telemetry::init();

    let producers = env_usize("PRODUCERS", DEFAULT_PRODUCERS);
    let consumers = env_usize("CONSUMERS", DEFAULT_CONSUMERS);
    let records_each = env_usize("RECORDS_PER_PRODUCER", DEFAULT_RECORDS_PER_PRODUCER);
    info!(
        producers,
        consumers,
        records_per_producer = records_each,
        "starting dispatch demo"
    );

    let pipeline = Pipeline::new();
    let queue = pipeline.queue();

    let (sink, mut drained) = mpsc::unbounded_channel();
    let consumer_handles = pipeline.spawn_consumers(consumers, sink);
    let producer_handles = pipeline.spawn_producers(producers, records_each);

    for handle in producer_handles {
        let _ = handle.await;
    }

    let expected = producers * records_each;
    let mut received = 0usize;
    while received < expected {
        match drained.recv().await {
            Some(record) => {
                received += 1;
                match serde_json::to_string(&record) {
                    Ok(line) => debug!(%line, "drained record"),
                    Err(e) => warn!(error = %e, seq = record.seq, "failed to render record"),
                }
            }
            None => break,
        }
    }

    for handle in consumer_handles {
        handle.abort();
    }

    let metrics = queue.metrics();
    info!(
        inserted = metrics.inserted(),
        removed = metrics.removed(),
        depth = metrics.depth(),
        "pipeline drained"
    );

    run_lock_drill().await;
}

/// Four concurrent callers race over the lock pair using the ordered
/// strategy; every one of them is expected to finish.
async fn run_lock_drill() {
    let coordinator = Arc::new(LockCoordinator::new());

    let handles: Vec<_> = (0..LOCK_DRILL_TASKS)
        .map(|_| {
            let c = Arc::clone(&coordinator);
            tokio::spawn(async move { c.acquire_both(AcquireStrategy::Ordered).await })
        })
        .collect();

    for (task, handle) in handles.into_iter().enumerate() {
        match handle.await {
            Ok(Ok(())) => info!(task, "lock drill task acquired both locks"),
            Ok(Err(e)) => warn!(task, error = %e, "lock drill task gave up"),
            Err(e) => warn!(task, error = %e, "lock drill task failed"),
        }
    }
}
