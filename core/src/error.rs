//! Error taxonomy for purchase coordination.
//!
//! Two layers: [`StoreError`] covers adapter-level failures (either store
//! unreachable, a key unseeded, a deadline missed), and [`PurchaseError`]
//! covers the outcomes of an attempt as seen by the caller. Business
//! outcomes (`SoldOut`, `AdmissionRejected`) are terminal; systemic
//! failures are retryable after compensation has run.

use crate::types::ItemId;
use std::time::Duration;
use thiserror::Error;

/// Failures raised by the store adapters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Fast counter store operation failed.
    #[error("counter store error: {0}")]
    Counter(String),

    /// Durable store operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// A counter key was read before the synchronizer seeded it.
    #[error("counter key {0} has not been seeded")]
    Unseeded(String),

    /// The conditional stock decrement matched no row.
    #[error("durable stock already depleted")]
    StockDepleted,

    /// A store call exceeded its deadline.
    #[error("store call timed out")]
    Timeout,
}

/// Outcome of one purchase attempt, as surfaced to the caller.
#[derive(Debug, Error)]
pub enum PurchaseError {
    /// The client exhausted its per-window attempt budget.
    #[error("too many requests, retry after {retry_after:?}")]
    AdmissionRejected {
        /// How long until the current window expires.
        retry_after: Duration,
    },

    /// The item's remaining stock is exhausted. Terminal business outcome;
    /// the overdraw has already been released back to the counter.
    #[error("item {item_id} is sold out")]
    SoldOut {
        /// The exhausted item.
        item_id: ItemId,
    },

    /// A store failed mid-attempt. The reservation (if any) has been
    /// compensated and the request may be retried.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PurchaseError {
    /// Whether the client may retry the same request and expect a
    /// different outcome.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}
