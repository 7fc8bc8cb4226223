//! Admission-control middleware.
//!
//! The rate limiter runs ahead of the purchase coordinator as a route
//! layer; rejected requests never reach the reservation step.
//!
//! # Flow
//!
//! 1. Extract the client identity (headers, then peer address).
//! 2. Ask the fixed-window limiter to admit the attempt.
//! 3. Rejected → `429` without touching the counter store's stock gate.
//! 4. Window store unreachable → `500` retryable; the gate fails closed.

use crate::error::AppError;
use crate::extractors::ClientIdentity;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use seckill_core::PurchaseError;

/// Rate-limit gate, applied with `axum::middleware::from_fn_with_state`.
///
/// # Errors
///
/// `429 TOO_MANY_REQUESTS` when the client exhausted its window budget;
/// `500 PURCHASE_FAILED` (retryable) when the window store is unreachable.
pub async fn rate_limit(
    State(state): State<AppState>,
    identity: ClientIdentity,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match state.limiter.admit(&identity.0).await {
        Ok(()) => Ok(next.run(request).await),
        Err(PurchaseError::AdmissionRejected { .. }) => {
            Err(AppError::too_many_requests("Too Many Requests"))
        }
        Err(e) => Err(AppError::purchase_failed("Purchase failed, please try again")
            .with_source(anyhow::Error::new(e))),
    }
}
