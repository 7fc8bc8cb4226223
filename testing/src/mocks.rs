//! In-memory fakes of the store contracts.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use seckill_core::{Clock, CounterStore, Item, ItemCatalog, ItemId, Order, SaleLedger, StoreError, WindowStore};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Lock a mutex, recovering from poisoning (a panicking test thread must
/// not cascade into every other test sharing the fake).
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Deterministic clock that only moves when told to.
///
/// # Example
///
/// ```
/// use seckill_testing::FixedClock;
/// use seckill_core::Clock;
/// use chrono::{Duration, Utc};
///
/// let clock = FixedClock::new(Utc::now());
/// let before = clock.now();
/// clock.advance(Duration::seconds(1));
/// assert_eq!(clock.now() - before, Duration::seconds(1));
/// ```
#[derive(Debug)]
pub struct FixedClock {
    time: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Create a clock frozen at `time`.
    #[must_use]
    pub const fn new(time: DateTime<Utc>) -> Self {
        Self {
            time: Mutex::new(time),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: ChronoDuration) {
        let mut time = lock(&self.time);
        *time += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *lock(&self.time)
    }
}

/// In-memory fast counter store.
///
/// `reserve` on an absent key is an error, matching the contract the
/// production adapter enforces: the gate must be seeded before traffic.
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    counters: Mutex<HashMap<String, i64>>,
}

impl InMemoryCounterStore {
    /// Create an empty counter store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a counter, if seeded.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<i64> {
        lock(&self.counters).get(key).copied()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn reserve(&self, key: &str) -> Result<i64, StoreError> {
        let mut counters = lock(&self.counters);
        let value = counters
            .get_mut(key)
            .ok_or_else(|| StoreError::Unseeded(key.to_string()))?;
        *value -= 1;
        Ok(*value)
    }

    async fn release(&self, key: &str) -> Result<(), StoreError> {
        let mut counters = lock(&self.counters);
        let value = counters
            .get_mut(key)
            .ok_or_else(|| StoreError::Unseeded(key.to_string()))?;
        *value += 1;
        Ok(())
    }

    async fn seed_if_absent(&self, key: &str, value: i64) -> Result<bool, StoreError> {
        let mut counters = lock(&self.counters);
        match counters.entry(key.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(true)
            }
            Entry::Occupied(_) => Ok(false),
        }
    }
}

/// In-memory rate-limit window store with switchable failure injection.
///
/// Window keys already encode their second, so entries are simply counted;
/// expiry is the production store's concern.
#[derive(Debug, Default)]
pub struct InMemoryWindowStore {
    windows: Mutex<HashMap<String, u64>>,
    fail: AtomicBool,
}

impl InMemoryWindowStore {
    /// Create an empty window store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `hit` fail, to exercise the fail-closed path.
    pub fn fail_requests(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl WindowStore for InMemoryWindowStore {
    async fn hit(&self, key: &str, _ttl: Duration) -> Result<u64, StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Counter(
                "injected window store failure".to_string(),
            ));
        }
        let mut windows = lock(&self.windows);
        let count = windows.entry(key.to_string()).or_insert(0);
        *count += 1;
        Ok(*count)
    }
}

/// In-memory durable store: item catalog plus append-only order ledger.
///
/// Supports one-shot failure injection on the ledger (for compensation
/// tests) and a switchable catalog outage (for fatal-startup tests).
#[derive(Debug, Default)]
pub struct InMemoryDurableStore {
    items: Mutex<Vec<Item>>,
    orders: Mutex<Vec<Order>>,
    next_order_id: AtomicI64,
    fail_next_sale: AtomicBool,
    catalog_unavailable: AtomicBool,
}

impl InMemoryDurableStore {
    /// Create a store pre-populated with `items`.
    #[must_use]
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: Mutex::new(items),
            next_order_id: AtomicI64::new(1),
            ..Self::default()
        }
    }

    /// Make the next `record_sale` fail with a database error.
    pub fn fail_next_sale(&self) {
        self.fail_next_sale.store(true, Ordering::SeqCst);
    }

    /// Toggle a catalog outage.
    pub fn set_catalog_unavailable(&self, unavailable: bool) {
        self.catalog_unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Authoritative stock of an item, if it exists.
    #[must_use]
    pub fn stock_of(&self, item_id: ItemId) -> Option<i64> {
        lock(&self.items)
            .iter()
            .find(|item| item.id == item_id)
            .map(|item| item.stock)
    }

    /// Number of ledger rows referencing an item.
    #[must_use]
    pub fn order_count(&self, item_id: ItemId) -> usize {
        lock(&self.orders)
            .iter()
            .filter(|order| order.item_id == item_id)
            .count()
    }
}

#[async_trait]
impl ItemCatalog for InMemoryDurableStore {
    async fn list_items(&self) -> Result<Vec<Item>, StoreError> {
        if self.catalog_unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Database(
                "injected catalog outage".to_string(),
            ));
        }
        Ok(lock(&self.items).clone())
    }
}

#[async_trait]
impl SaleLedger for InMemoryDurableStore {
    async fn record_sale(&self, item_id: ItemId) -> Result<(), StoreError> {
        if self.fail_next_sale.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Database(
                "injected ledger failure".to_string(),
            ));
        }

        let mut items = lock(&self.items);
        let item = items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| StoreError::Database(format!("no such item: {item_id}")))?;

        if item.stock <= 0 {
            return Err(StoreError::StockDepleted);
        }
        item.stock -= 1;
        drop(items);

        let id = self.next_order_id.fetch_add(1, Ordering::SeqCst);
        lock(&self.orders).push(Order {
            id,
            item_id,
            created_at: Utc::now(),
        });
        Ok(())
    }
}
