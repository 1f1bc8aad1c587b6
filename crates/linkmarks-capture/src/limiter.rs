//! Bounded concurrency for capture requests.
//!
//! Each capture renders in a full browser page, so the number running at
//! once must be capped. Requests beyond the running cap queue up to a
//! configurable depth; past that they fail fast with a capacity error
//! instead of piling up unboundedly.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use linkmarks_core::error::AppError;
use linkmarks_core::result::AppResult;

/// Two-stage admission: `admission` bounds running + queued requests and
/// never blocks; `slots` bounds running requests and is waited on.
#[derive(Debug)]
pub struct CaptureLimiter {
    admission: Arc<Semaphore>,
    slots: Arc<Semaphore>,
}

/// Held for the duration of one capture; dropping releases both stages.
#[derive(Debug)]
pub struct CapturePermit {
    _admission: OwnedSemaphorePermit,
    _slot: OwnedSemaphorePermit,
}

impl CaptureLimiter {
    /// Create a limiter with `pool_size` running slots and `queue_depth`
    /// additional waiters.
    pub fn new(pool_size: usize, queue_depth: usize) -> Self {
        Self {
            admission: Arc::new(Semaphore::new(pool_size + queue_depth)),
            slots: Arc::new(Semaphore::new(pool_size)),
        }
    }

    /// Acquire a capture permit, waiting for a running slot if the pool
    /// is busy. Fails fast with `Capacity` when the queue is full too.
    pub async fn acquire(&self) -> AppResult<CapturePermit> {
        let admission = self
            .admission
            .clone()
            .try_acquire_owned()
            .map_err(|_| AppError::capacity("capture queue is full"))?;

        let slot = self
            .slots
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| AppError::internal("capture pool closed"))?;

        Ok(CapturePermit {
            _admission: admission,
            _slot: slot,
        })
    }

    /// Number of free running slots, for observability.
    pub fn available_slots(&self) -> usize {
        self.slots.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use linkmarks_core::error::ErrorKind;

    use super::*;

    #[tokio::test]
    async fn admits_up_to_pool_plus_queue() {
        let limiter = CaptureLimiter::new(1, 1);

        let running = limiter.acquire().await.unwrap();
        // Second request parks in the queue waiting for the slot.
        let queued = tokio::spawn({
            let limiter = CaptureLimiter {
                admission: limiter.admission.clone(),
                slots: limiter.slots.clone(),
            };
            async move { limiter.acquire().await }
        });
        tokio::task::yield_now().await;

        // Third request finds the queue full and fails fast.
        let err = limiter.acquire().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Capacity);

        drop(running);
        assert!(queued.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn a_wedged_holder_inside_a_timeout_cannot_pin_its_slot() {
        let limiter = CaptureLimiter::new(1, 0);

        // Everything done while holding the permit sits inside one timed
        // window, so even an operation that never completes gives the
        // slot back when the ceiling strikes.
        let result = tokio::time::timeout(std::time::Duration::from_millis(20), async {
            let _permit = limiter.acquire().await.unwrap();
            std::future::pending::<()>().await
        })
        .await;

        assert!(result.is_err());
        assert_eq!(limiter.available_slots(), 1);
    }

    #[tokio::test]
    async fn releasing_a_permit_frees_the_slot() {
        let limiter = CaptureLimiter::new(2, 0);
        let permit = limiter.acquire().await.unwrap();
        assert_eq!(limiter.available_slots(), 1);
        drop(permit);
        assert_eq!(limiter.available_slots(), 2);
    }
}
