//! One-shot stock synchronization from the durable catalog into the fast
//! counter store.

use crate::error::StoreError;
use crate::store::{CounterStore, ItemCatalog};
use std::sync::Arc;

/// Outcome of one synchronizer pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Counters created by this pass.
    pub seeded: usize,
    /// Counters left untouched because they already existed.
    pub skipped: usize,
}

/// Seeds each item's counter from authoritative stock at process start.
///
/// Seeding uses `seed_if_absent`, so a restarted coordinator (or a second
/// instance sharing the counter store) never clobbers a counter that is
/// already tracking in-flight purchases, and racing synchronizers are safe
/// by construction.
pub struct StockSynchronizer {
    catalog: Arc<dyn ItemCatalog>,
    counters: Arc<dyn CounterStore>,
}

impl StockSynchronizer {
    /// Create a synchronizer over the given stores.
    #[must_use]
    pub fn new(catalog: Arc<dyn ItemCatalog>, counters: Arc<dyn CounterStore>) -> Self {
        Self { catalog, counters }
    }

    /// Seed every item's counter from its durable stock.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`StoreError`] when the catalog cannot be
    /// read or a seed write fails. Callers must treat this as fatal:
    /// serving traffic with an unseeded gate would reject every purchase
    /// for the affected items.
    pub async fn run(&self) -> Result<SeedReport, StoreError> {
        let items = self.catalog.list_items().await?;
        let mut report = SeedReport::default();

        for item in &items {
            let key = item.id.stock_key();
            if self.counters.seed_if_absent(&key, item.stock).await? {
                report.seeded += 1;
                tracing::info!(
                    item_id = %item.id,
                    name = %item.name,
                    stock = item.stock,
                    "initialized stock counter"
                );
            } else {
                report.skipped += 1;
                tracing::info!(
                    item_id = %item.id,
                    name = %item.name,
                    "stock counter already initialized, skipping"
                );
            }
        }

        tracing::info!(
            seeded = report.seeded,
            skipped = report.skipped,
            "stock synchronization complete"
        );
        Ok(report)
    }
}
