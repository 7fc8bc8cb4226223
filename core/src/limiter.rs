//! Per-client fixed-window admission control.
//!
//! Sits in front of the purchase coordinator and admits at most
//! [`MAX_ATTEMPTS_PER_WINDOW`] attempts per client identity per one-second
//! wall-clock window. Rejected requests never reach the reservation step.
//!
//! # Algorithm
//!
//! 1. Derive the window key from (identity, floor of current unix second).
//! 2. Atomically increment the window's counter, arming a one-second
//!    expiry on the window's first hit.
//! 3. Reject when the post-increment count exceeds the budget.
//!
//! This is a fixed window, not a sliding one: a client can burst up to
//! twice the budget across a window boundary. That imprecision is an
//! accepted property of the design, not a defect.

use crate::error::PurchaseError;
use crate::store::{Clock, WindowStore};
use crate::types::window_key;
use std::sync::Arc;
use std::time::Duration;

/// Attempts admitted per identity per window.
pub const MAX_ATTEMPTS_PER_WINDOW: u64 = 3;

/// Width of one admission window.
pub const WINDOW: Duration = Duration::from_secs(1);

/// Fixed-window rate limiter in front of the purchase coordinator.
pub struct FixedWindowLimiter {
    windows: Arc<dyn WindowStore>,
    clock: Arc<dyn Clock>,
}

impl FixedWindowLimiter {
    /// Create a limiter over the given window store and clock.
    #[must_use]
    pub fn new(windows: Arc<dyn WindowStore>, clock: Arc<dyn Clock>) -> Self {
        Self { windows, clock }
    }

    /// Admit or reject one attempt for `identity`.
    ///
    /// # Errors
    ///
    /// [`PurchaseError::AdmissionRejected`] when the window budget is
    /// exhausted. [`PurchaseError::Store`] when the window store is
    /// unreachable: a scarce-resource gate fails closed rather than open.
    pub async fn admit(&self, identity: &str) -> Result<(), PurchaseError> {
        let second = self.clock.now().timestamp();
        let key = window_key(identity, second);

        let count = match self.windows.hit(&key, WINDOW).await {
            Ok(count) => count,
            Err(e) => {
                tracing::error!(
                    identity,
                    error = %e,
                    "window store unreachable, failing closed"
                );
                return Err(PurchaseError::Store(e));
            }
        };

        if count > MAX_ATTEMPTS_PER_WINDOW {
            metrics::counter!("seckill_rate_limited_total").increment(1);
            tracing::warn!(
                identity,
                attempts = count,
                limit = MAX_ATTEMPTS_PER_WINDOW,
                "admission rejected"
            );
            return Err(PurchaseError::AdmissionRejected {
                retry_after: WINDOW,
            });
        }

        tracing::debug!(identity, attempts = count, "admitted");
        Ok(())
    }
}
