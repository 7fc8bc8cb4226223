//! Redis-backed counter and window stores.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use seckill_core::{CounterStore, StoreError, WindowStore};
use std::time::Duration;

/// Fast counter store backed by a shared Redis instance.
///
/// The [`ConnectionManager`] multiplexes one connection and reconnects
/// transparently; cloning the store is cheap and every clone shares it.
///
/// # Example
///
/// ```no_run
/// use seckill_redis::RedisCounterStore;
/// use seckill_core::CounterStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = RedisCounterStore::connect("redis://127.0.0.1:6379").await?;
/// store.seed_if_absent("item_stock_1", 100).await?;
/// let remaining = store.reserve("item_stock_1").await?;
/// assert_eq!(remaining, 99);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RedisCounterStore {
    conn: ConnectionManager,
}

impl RedisCounterStore {
    /// Connect to Redis at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Counter`] if the client cannot be created or
    /// the connection manager cannot be established.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = Client::open(url)
            .map_err(|e| StoreError::Counter(format!("failed to create Redis client: {e}")))?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Counter(format!("failed to connect to Redis: {e}")))?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn reserve(&self, key: &str) -> Result<i64, StoreError> {
        let mut conn = self.conn.clone();

        // EXISTS and DECR run in one MULTI so the existence answer refers
        // to the same instant as the decrement.
        let (existed, remaining): (bool, i64) = redis::pipe()
            .atomic()
            .exists(key)
            .decr(key, 1)
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::Counter(format!("DECR {key} failed: {e}")))?;

        if !existed {
            // DECR created the key at -1; undo our own write before
            // reporting the unseeded gate.
            let _: i64 = conn
                .incr(key, 1)
                .await
                .map_err(|e| StoreError::Counter(format!("INCR {key} failed: {e}")))?;
            tracing::warn!(key, "reserve hit an unseeded counter");
            return Err(StoreError::Unseeded(key.to_string()));
        }

        Ok(remaining)
    }

    async fn release(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: i64 = conn
            .incr(key, 1)
            .await
            .map_err(|e| StoreError::Counter(format!("INCR {key} failed: {e}")))?;
        Ok(())
    }

    async fn seed_if_absent(&self, key: &str, value: i64) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let set: bool = conn
            .set_nx(key, value)
            .await
            .map_err(|e| StoreError::Counter(format!("SET NX {key} failed: {e}")))?;
        Ok(set)
    }
}

#[async_trait]
impl WindowStore for RedisCounterStore {
    async fn hit(&self, key: &str, ttl: Duration) -> Result<u64, StoreError> {
        let mut conn = self.conn.clone();

        let count: u64 = conn
            .incr(key, 1)
            .await
            .map_err(|e| StoreError::Counter(format!("INCR {key} failed: {e}")))?;

        // The window's first hit arms the expiry; later hits leave the TTL
        // alone so the window stays fixed rather than sliding.
        if count == 1 {
            #[allow(clippy::cast_possible_wrap)] // window TTLs are a few seconds
            let ttl_secs = ttl.as_secs() as i64;
            let _: bool = conn
                .expire(key, ttl_secs)
                .await
                .map_err(|e| StoreError::Counter(format!("EXPIRE {key} failed: {e}")))?;
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These tests require a running Redis instance.
    // Run with: docker run -d -p 6379:6379 redis:7-alpine

    const REDIS_URL: &str = "redis://127.0.0.1:6379";

    async fn fresh_store(keys: &[&str]) -> RedisCounterStore {
        #[allow(clippy::unwrap_used)]
        let store = RedisCounterStore::connect(REDIS_URL).await.unwrap();
        let mut conn = store.conn.clone();
        for key in keys {
            #[allow(clippy::unwrap_used)]
            let _: i64 = conn.del(*key).await.unwrap();
        }
        store
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    #[allow(clippy::unwrap_used)]
    async fn reserve_counts_down_from_seed() {
        let key = "test:reserve:counts_down";
        let store = fresh_store(&[key]).await;

        assert!(store.seed_if_absent(key, 3).await.unwrap());
        assert_eq!(store.reserve(key).await.unwrap(), 2);
        assert_eq!(store.reserve(key).await.unwrap(), 1);
        assert_eq!(store.reserve(key).await.unwrap(), 0);
        assert_eq!(store.reserve(key).await.unwrap(), -1);
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    #[allow(clippy::unwrap_used)]
    async fn release_undoes_a_reservation() {
        let key = "test:release:undoes";
        let store = fresh_store(&[key]).await;

        store.seed_if_absent(key, 5).await.unwrap();
        let after_reserve = store.reserve(key).await.unwrap();
        assert_eq!(after_reserve, 4);

        store.release(key).await.unwrap();
        assert_eq!(store.reserve(key).await.unwrap(), 4);
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    #[allow(clippy::unwrap_used)]
    async fn seeding_twice_keeps_the_live_counter() {
        let key = "test:seed:idempotent";
        let store = fresh_store(&[key]).await;

        assert!(store.seed_if_absent(key, 10).await.unwrap());
        store.reserve(key).await.unwrap();

        // A second seed (restart, second instance) must not reset the
        // in-flight count.
        assert!(!store.seed_if_absent(key, 10).await.unwrap());
        assert_eq!(store.reserve(key).await.unwrap(), 8);
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    #[allow(clippy::unwrap_used)]
    async fn reserve_on_unseeded_key_errors_and_leaves_no_residue() {
        let key = "test:reserve:unseeded";
        let store = fresh_store(&[key]).await;

        let result = store.reserve(key).await;
        assert!(matches!(result, Err(StoreError::Unseeded(_))));

        // The compensating INCR leaves the key at zero, never at phantom
        // stock: later attempts overdraw and take the sold-out path.
        let mut conn = store.conn.clone();
        let value: i64 = conn.get(key).await.unwrap();
        assert_eq!(value, 0);
        assert_eq!(store.reserve(key).await.unwrap(), -1);
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    #[allow(clippy::unwrap_used)]
    async fn window_hits_count_up_and_expire() {
        let key = "test:window:expiry";
        let store = fresh_store(&[key]).await;

        let ttl = Duration::from_secs(1);
        assert_eq!(store.hit(key, ttl).await.unwrap(), 1);
        assert_eq!(store.hit(key, ttl).await.unwrap(), 2);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        // The window expired, so the count restarts.
        assert_eq!(store.hit(key, ttl).await.unwrap(), 1);
    }
}
