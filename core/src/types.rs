//! Domain types for the flash-sale service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a sellable item.
///
/// Assigned by the durable store and stable for the item's lifetime.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    /// Wrap a raw database identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw database identifier.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Fast-counter key holding this item's remaining reservable units.
    #[must_use]
    pub fn stock_key(self) -> String {
        format!("item_stock_{}", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A sellable item as stored in the durable catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Stable identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Authoritative remaining stock.
    pub stock: i64,
}

/// One row of the append-only order ledger.
///
/// Created exactly once per successful purchase, never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Ledger-assigned identifier.
    pub id: i64,
    /// The item this order purchased one unit of.
    pub item_id: ItemId,
    /// When the sale was recorded.
    pub created_at: DateTime<Utc>,
}

/// Rate-limit window key for a client identity at a given unix second.
///
/// Window keys are namespaced apart from stock counters; each key lives
/// for one second and carries that window's attempt count.
#[must_use]
pub fn window_key(identity: &str, unix_second: i64) -> String {
    format!("rl:{identity}:{unix_second}")
}
