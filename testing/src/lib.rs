//! # Seckill Testing
//!
//! In-memory fakes of the store contracts in `seckill-core`, for exercising
//! the purchase coordinator, rate limiter, and stock synchronizer without a
//! running Redis or PostgreSQL.
//!
//! The fakes honor the same contracts as the production adapters — strict
//! absent-key errors on `reserve`, set-if-unset seeding, fixed-window hit
//! counting — and add failure injection for exercising the compensation
//! paths.
//!
//! ## Example
//!
//! ```
//! use seckill_core::{Item, ItemId, PurchaseCoordinator, StockSynchronizer};
//! use seckill_testing::{InMemoryCounterStore, InMemoryDurableStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let counters = Arc::new(InMemoryCounterStore::new());
//! let store = Arc::new(InMemoryDurableStore::with_items(vec![Item {
//!     id: ItemId::new(1),
//!     name: "limited drop".to_string(),
//!     stock: 5,
//! }]));
//!
//! StockSynchronizer::new(store.clone(), counters.clone()).run().await?;
//!
//! let coordinator = PurchaseCoordinator::new(counters, store);
//! let receipt = coordinator.purchase(ItemId::new(1)).await?;
//! assert_eq!(receipt.remaining, 4);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod mocks;

pub use mocks::{FixedClock, InMemoryCounterStore, InMemoryDurableStore, InMemoryWindowStore};
