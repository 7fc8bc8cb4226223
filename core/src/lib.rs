//! # Seckill Core
//!
//! Purchase coordination for a flash-sale ("seckill") service: many
//! concurrent clients race to buy a strictly limited quantity of an item,
//! and the system must never oversell while staying responsive under
//! bursty load.
//!
//! ## Architecture
//!
//! ```text
//! request ──► FixedWindowLimiter ──► PurchaseCoordinator
//!                   │                      │
//!                   ▼                      ├─► CounterStore (reserve/release)
//!              WindowStore                 └─► SaleLedger   (transactional record)
//! ```
//!
//! The fast counter store is the concurrency gate: its atomic decrement is
//! the single serialization point that establishes a total order over which
//! caller wins each unit. The durable ledger owns ground truth. When the
//! durable write fails after a successful reservation, the coordinator
//! compensates by releasing the reserved unit back to the gate, so the two
//! stores converge once all in-flight attempts settle.
//!
//! Everything here is written against the trait contracts in [`store`];
//! production backends live in `seckill-redis` and `seckill-postgres`, and
//! in-memory fakes in `seckill-testing`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod coordinator;
pub mod error;
pub mod limiter;
pub mod store;
pub mod sync;
pub mod types;

pub use coordinator::{PurchaseCoordinator, Receipt};
pub use error::{PurchaseError, StoreError};
pub use limiter::FixedWindowLimiter;
pub use store::{Clock, CounterStore, ItemCatalog, SaleLedger, SystemClock, WindowStore};
pub use sync::{SeedReport, StockSynchronizer};
pub use types::{Item, ItemId, Order};
