//! Deadlock and liveness tests for the lock coordinator.
//!
//! - deadlock: opposing-order naive paths must wedge
//! - liveness: ordered paths must all complete; exhaustion must be reported

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use super::*;

/// Bounded observation window for wedge/liveness detection.
pub const OBSERVATION_WINDOW: Duration = Duration::from_secs(1);

pub fn setup() -> Arc<LockCoordinator> {
    Arc::new(LockCoordinator::new())
}

/// Drive `path_count` concurrent acquisition paths and watch for a wedge:
/// returns true when every path completed within the window.
pub async fn run_concurrent<F, Fut>(window: Duration, path_count: usize, path_fn: F) -> bool
where
    F: Fn(usize) -> Fut + Send + Sync + Clone + 'static,
    Fut: std::future::Future<Output = ()> + Send,
{
    let outcome = timeout(window, async {
        let paths: Vec<_> = (0..path_count)
            .map(|i| {
                let f = path_fn.clone();
                tokio::spawn(async move { f(i).await })
            })
            .collect();
        for path in paths {
            let _ = path.await;
        }
    })
    .await;
    outcome.is_ok()
}

/// Alternate acquisition orders by task index: even tasks take first-then-
/// second, odd tasks the reverse.
pub fn opposing_order(i: usize) -> AcquireOrder {
    if i % 2 == 0 {
        AcquireOrder::FirstThenSecond
    } else {
        AcquireOrder::SecondThenFirst
    }
}
