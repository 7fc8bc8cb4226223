//! Stock synchronizer tests.

#![allow(clippy::unwrap_used)]

use seckill_core::{CounterStore, Item, ItemId, SeedReport, StockSynchronizer};
use seckill_testing::{InMemoryCounterStore, InMemoryDurableStore};
use std::sync::Arc;

fn catalog(items: Vec<(i64, &str, i64)>) -> Arc<InMemoryDurableStore> {
    Arc::new(InMemoryDurableStore::with_items(
        items
            .into_iter()
            .map(|(id, name, stock)| Item {
                id: ItemId::new(id),
                name: name.to_string(),
                stock,
            })
            .collect(),
    ))
}

#[tokio::test]
async fn first_run_seeds_every_counter() {
    let counters = Arc::new(InMemoryCounterStore::new());
    let store = catalog(vec![(1, "sneaker", 10), (2, "console", 5)]);

    let report = StockSynchronizer::new(store, counters.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(
        report,
        SeedReport {
            seeded: 2,
            skipped: 0
        }
    );
    assert_eq!(counters.get("item_stock_1"), Some(10));
    assert_eq!(counters.get("item_stock_2"), Some(5));
}

#[tokio::test]
async fn second_run_never_resets_a_live_counter() {
    let counters = Arc::new(InMemoryCounterStore::new());
    let store = catalog(vec![(1, "sneaker", 10), (2, "console", 5)]);
    let synchronizer = StockSynchronizer::new(store, counters.clone());

    synchronizer.run().await.unwrap();

    // Purchases land between the two runs (a restart mid-sale).
    for _ in 0..3 {
        counters.reserve("item_stock_1").await.unwrap();
    }

    let report = synchronizer.run().await.unwrap();

    // The second pass reports every item as already initialized and the
    // in-flight count survives.
    assert_eq!(
        report,
        SeedReport {
            seeded: 0,
            skipped: 2
        }
    );
    assert_eq!(counters.get("item_stock_1"), Some(7));
    assert_eq!(counters.get("item_stock_2"), Some(5));
}

#[tokio::test]
async fn racing_synchronizers_seed_each_counter_once() {
    let counters = Arc::new(InMemoryCounterStore::new());
    let store = catalog(vec![(1, "sneaker", 10)]);

    let first = StockSynchronizer::new(store.clone(), counters.clone());
    let second = StockSynchronizer::new(store, counters.clone());

    let (a, b) = tokio::join!(first.run(), second.run());
    let (a, b) = (a.unwrap(), b.unwrap());

    // Exactly one of the racing passes created the counter.
    assert_eq!(a.seeded + b.seeded, 1);
    assert_eq!(a.skipped + b.skipped, 1);
    assert_eq!(counters.get("item_stock_1"), Some(10));
}

#[tokio::test]
async fn catalog_outage_is_fatal() {
    let counters = Arc::new(InMemoryCounterStore::new());
    let store = catalog(vec![(1, "sneaker", 10)]);
    store.set_catalog_unavailable(true);

    let result = StockSynchronizer::new(store, counters.clone()).run().await;

    // The caller must refuse to serve traffic on this error; nothing was
    // seeded.
    assert!(result.is_err());
    assert_eq!(counters.get("item_stock_1"), None);
}
