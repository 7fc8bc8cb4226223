//! Redis implementation of the seckill fast counter store.
//!
//! One shared Redis instance holds both the per-item stock gate and the
//! per-client rate-limit windows. Every mutation uses Redis's native
//! atomic primitives (`DECR`/`INCR`/`SET NX`/`EXPIRE`); there is no
//! read-modify-write and no application-level lock, so the gate's atomic
//! decrement stays the only serialization point under concurrency.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod counter;

pub use counter::RedisCounterStore;
