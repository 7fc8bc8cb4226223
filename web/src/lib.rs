//! Axum HTTP surface for the seckill flash-sale service.
//!
//! # Request Flow
//!
//! ```text
//! POST /purchase/:id
//!   │
//!   ├─ ClientIdentity extractor (X-Forwarded-For → X-Real-IP → peer addr)
//!   ├─ rate-limit middleware (fixed window, fails closed)        ─► 429
//!   └─ purchase handler ─► PurchaseCoordinator
//!         ├─ reservation overdraw                                ─► 400
//!         ├─ unseeded counter (unknown item)                     ─► 404
//!         ├─ store failure after compensation                    ─► 500
//!         └─ success: post-reservation remaining count           ─► 200
//! ```
//!
//! `GET /items` is a read-through listing of the durable catalog with no
//! gating, and `GET /health` a liveness probe. Business-outcome failures
//! map to specific statuses; systemic failures map to one generic
//! retryable status so internals never leak.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::AppError;
pub use routes::build_router;
pub use state::AppState;
