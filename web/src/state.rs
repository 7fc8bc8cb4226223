//! Application state for the HTTP server.

use seckill_core::{FixedWindowLimiter, ItemCatalog, PurchaseCoordinator};
use std::sync::Arc;

/// Shared resources needed by HTTP handlers; cloned cheaply (via `Arc`)
/// for each request.
#[derive(Clone)]
pub struct AppState {
    /// Purchase coordinator over the counter store and the durable ledger.
    pub coordinator: Arc<PurchaseCoordinator>,
    /// Admission gate applied ahead of the coordinator.
    pub limiter: Arc<FixedWindowLimiter>,
    /// Read-only item catalog for listings.
    pub catalog: Arc<dyn ItemCatalog>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        coordinator: Arc<PurchaseCoordinator>,
        limiter: Arc<FixedWindowLimiter>,
        catalog: Arc<dyn ItemCatalog>,
    ) -> Self {
        Self {
            coordinator,
            limiter,
            catalog,
        }
    }
}
