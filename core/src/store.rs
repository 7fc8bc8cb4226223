//! Store adapter contracts.
//!
//! The coordinator, limiter, and synchronizer are written against these
//! traits. Production backends live in `seckill-redis` (counter and window
//! stores) and `seckill-postgres` (catalog and ledger); `seckill-testing`
//! provides in-memory fakes.
//!
//! # Atomicity
//!
//! Every [`CounterStore`] and [`WindowStore`] operation must be backed by
//! the store's native single-key atomic primitive. A read-modify-write
//! assembled from separate calls would reintroduce exactly the race the
//! gate exists to prevent, and an application-level lock would turn the
//! gate into a serialization bottleneck.

use crate::error::StoreError;
use crate::types::{Item, ItemId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Atomic single-key integer operations over the fast counter store.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically decrement the counter at `key` by one, returning the
    /// post-decrement value.
    ///
    /// Concurrent callers observe strictly decreasing values; no two
    /// callers receive the same value for the same key.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unseeded`] if the key is absent (the synchronizer has
    /// not run for this item); implementations must not silently default.
    /// [`StoreError::Counter`] if the store is unreachable.
    async fn reserve(&self, key: &str) -> Result<i64, StoreError>;

    /// Atomically increment the counter at `key` by one.
    ///
    /// Used as the compensating action after an overdraw or a failed
    /// durable write.
    ///
    /// # Errors
    ///
    /// [`StoreError::Counter`] if the store is unreachable.
    async fn release(&self, key: &str) -> Result<(), StoreError>;

    /// Atomically set `key` to `value` only if the key is unset.
    ///
    /// Returns whether the set occurred. This is what makes seeding safe
    /// against restarts and racing synchronizers.
    ///
    /// # Errors
    ///
    /// [`StoreError::Counter`] if the store is unreachable.
    async fn seed_if_absent(&self, key: &str, value: i64) -> Result<bool, StoreError>;
}

/// Windowed attempt counting for the rate limiter.
#[async_trait]
pub trait WindowStore: Send + Sync {
    /// Atomically increment the attempt counter at `key`, arming the
    /// expiry `ttl` when this was the window's first hit. Returns the
    /// post-increment count.
    ///
    /// # Errors
    ///
    /// [`StoreError::Counter`] if the store is unreachable. Callers treat
    /// this as a rejection (the gate fails closed).
    async fn hit(&self, key: &str, ttl: Duration) -> Result<u64, StoreError>;
}

/// Read side of the durable store: the item catalog.
#[async_trait]
pub trait ItemCatalog: Send + Sync {
    /// List all items with their authoritative stock.
    ///
    /// # Errors
    ///
    /// [`StoreError::Database`] if the store is unreachable.
    async fn list_items(&self) -> Result<Vec<Item>, StoreError>;
}

/// Write side of the durable store: the append-only sale ledger.
#[async_trait]
pub trait SaleLedger: Send + Sync {
    /// Record one sale in a single transaction: decrement the item's stock
    /// conditioned on `stock > 0`, and append one order row.
    ///
    /// The transaction boundary is scoped strictly to this call and must
    /// never span a counter-store operation.
    ///
    /// # Errors
    ///
    /// [`StoreError::StockDepleted`] if the conditional decrement matched
    /// no row; [`StoreError::Database`] for any other failure. In both
    /// cases nothing is committed.
    async fn record_sale(&self, item_id: ItemId) -> Result<(), StoreError>;
}

/// Wall-clock abstraction so window arithmetic is testable.
pub trait Clock: Send + Sync {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;
}

/// System wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
