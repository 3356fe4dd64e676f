//! Coordinator executing the acquisition strategies against one lock pair.

use rand::Rng;
use tokio::time::{sleep, timeout};
use tracing::debug;

use super::{AcquireError, AcquireOrder, AcquireStrategy, CoordinatorConfig, LockPair};

pub struct LockCoordinator {
    locks: LockPair,
    config: CoordinatorConfig,
}

impl LockCoordinator {
    pub fn new() -> Self {
        Self::with_config(CoordinatorConfig::default())
    }

    pub fn with_config(config: CoordinatorConfig) -> Self {
        Self {
            locks: LockPair::new(),
            config,
        }
    }

    #[cfg(test)]
    pub(crate) fn locks(&self) -> &LockPair {
        &self.locks
    }

    /// Acquire both locks under the given strategy, releasing them on success.
    ///
    /// `Naive` blocks without bound and cannot fail; when two paths run it
    /// with opposite orders, neither may ever return. `Ordered` returns
    /// [`AcquireError::RetryExhausted`] once every bounded attempt has timed
    /// out, rather than giving up silently.
    pub async fn acquire_both(&self, strategy: AcquireStrategy) -> Result<(), AcquireError> {
        match strategy {
            AcquireStrategy::Naive(order) => {
                self.acquire_naive(order).await;
                Ok(())
            }
            AcquireStrategy::Ordered => self.acquire_ordered().await,
        }
    }

    async fn acquire_naive(&self, order: AcquireOrder) {
        let (outer, inner) = match order {
            AcquireOrder::FirstThenSecond => (&self.locks.first, &self.locks.second),
            AcquireOrder::SecondThenFirst => (&self.locks.second, &self.locks.first),
        };

        let _outer = outer.lock().await;
        sleep(self.config.hold_delay).await;
        let _inner = inner.lock().await;
        debug!(?order, "acquired both locks");
    }

    async fn acquire_ordered(&self) -> Result<(), AcquireError> {
        let cfg = &self.config;

        for attempt in 1..=cfg.max_attempts {
            if let Ok(_first) = timeout(cfg.lock_timeout, self.locks.first.lock()).await {
                sleep(cfg.hold_delay).await;
                if let Ok(_second) = timeout(cfg.lock_timeout, self.locks.second.lock()).await {
                    debug!(attempt, "acquired both locks in canonical order");
                    return Ok(());
                }
                // Second lock timed out; the first guard drops here so
                // nothing is held across the backoff.
            }

            let jitter = if cfg.backoff_jitter_ms > 0 {
                rand::thread_rng().gen_range(0..cfg.backoff_jitter_ms)
            } else {
                0
            };
            let backoff = cfg.backoff_base + std::time::Duration::from_millis(jitter);
            debug!(attempt, backoff_ms = backoff.as_millis() as u64, "attempt timed out, backing off");
            sleep(backoff).await;
        }

        Err(AcquireError::RetryExhausted {
            attempts: cfg.max_attempts,
        })
    }
}

impl Default for LockCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
