//! The purchase coordinator.
//!
//! Drives one purchase attempt through reserve → persist → respond, with
//! compensation when the durable write fails after a successful
//! reservation. Per attempt the protocol moves through
//!
//! ```text
//! ADMITTED ─► RESERVED ─► { SOLD_OUT | PERSISTED ─► NOTIFIED }
//!                       │
//!                       └─► RESERVE_FAILED_COMPENSATED
//! ```
//!
//! Admission happens in middleware before [`PurchaseCoordinator::purchase`]
//! is called. The atomic decrement on the counter store is the single
//! serialization point preventing oversell; no application-level mutex
//! serializes attempts, and no in-process lock is held across a store call.

use crate::error::{PurchaseError, StoreError};
use crate::store::{CounterStore, SaleLedger};
use crate::types::ItemId;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Bound on the durable write. An expiry is treated as a persistence
/// failure and compensated, so a reservation is never left unresolved.
const PERSIST_TIMEOUT: Duration = Duration::from_secs(5);

/// Successful purchase result.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Receipt {
    /// The item purchased.
    pub item_id: ItemId,
    /// Units left after this purchase, as observed at reservation time.
    pub remaining: i64,
}

/// Coordinates one purchase attempt across the fast counter store and the
/// durable ledger.
pub struct PurchaseCoordinator {
    counters: Arc<dyn CounterStore>,
    ledger: Arc<dyn SaleLedger>,
}

impl PurchaseCoordinator {
    /// Create a coordinator over the given stores.
    #[must_use]
    pub fn new(counters: Arc<dyn CounterStore>, ledger: Arc<dyn SaleLedger>) -> Self {
        Self { counters, ledger }
    }

    /// Attempt to purchase one unit of `item_id`.
    ///
    /// On success the returned [`Receipt`] carries the post-reservation
    /// remaining count, which is the user-visible "units left" figure.
    ///
    /// # Errors
    ///
    /// [`PurchaseError::SoldOut`] when the reservation overdraws the
    /// counter; the decrement is released before returning and no durable
    /// write occurs. [`PurchaseError::Store`] when the counter store is
    /// unreachable or the durable write fails or times out; in the latter
    /// case the reservation is released before returning.
    pub async fn purchase(&self, item_id: ItemId) -> Result<Receipt, PurchaseError> {
        let key = item_id.stock_key();

        let remaining = self.counters.reserve(&key).await?;

        if remaining < 0 {
            // Overdrew the gate: restore the counter, skip the ledger.
            if let Err(e) = self.counters.release(&key).await {
                tracing::error!(
                    item_id = %item_id,
                    error = %e,
                    "failed to restore counter after overdraw"
                );
            }
            metrics::counter!("seckill_sold_out_total").increment(1);
            tracing::debug!(item_id = %item_id, "sold out");
            return Err(PurchaseError::SoldOut { item_id });
        }

        let persisted = tokio::time::timeout(PERSIST_TIMEOUT, self.ledger.record_sale(item_id))
            .await
            .unwrap_or(Err(StoreError::Timeout));

        if let Err(e) = persisted {
            tracing::warn!(
                item_id = %item_id,
                error = %e,
                "durable write failed, compensating reservation"
            );
            self.compensate(item_id, &key).await;
            return Err(PurchaseError::Store(e));
        }

        // Side channel: the exporter handles emission off the request path,
        // so recording can never block or fail the response.
        metrics::counter!("seckill_purchases_total").increment(1);
        tracing::info!(item_id = %item_id, remaining, "purchase recorded");

        Ok(Receipt { item_id, remaining })
    }

    /// Undo a reservation after a failed durable write.
    ///
    /// A failed release leaves the counter under-reporting availability
    /// relative to the ledger, and nothing reconciles that automatically;
    /// it is surfaced at error severity for operator attention.
    async fn compensate(&self, item_id: ItemId, key: &str) {
        if let Err(e) = self.counters.release(key).await {
            metrics::counter!("seckill_compensation_failures_total").increment(1);
            tracing::error!(
                item_id = %item_id,
                error = %e,
                "compensation release failed: counter now drifts below durable stock, \
                 manual reconciliation required"
            );
        }
    }
}
