//! PostgreSQL durable store for seckill.
//!
//! Owns ground truth: the `items` table carries authoritative stock and
//! the `orders` table is the append-only ledger of sales. Schema ships as
//! embedded migrations; queries are runtime-bound so the crate builds
//! without a database available.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod store;

pub use store::PostgresStore;
