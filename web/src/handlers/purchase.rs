//! Flash-sale purchase endpoint.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use seckill_core::{ItemId, PurchaseError, StoreError};
use serde::Serialize;

/// Response for a successful purchase.
#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    /// The item purchased.
    pub item_id: ItemId,
    /// Units left after this purchase, as observed at reservation time.
    pub remaining: i64,
}

/// Purchase one unit of the item.
///
/// The admission gate runs as middleware before this handler; the handler
/// drives the coordinator through reserve → persist → respond.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:3000/purchase/1
/// # {"item_id":1,"remaining":99}
/// ```
///
/// Responses:
/// - `200` with the post-reservation remaining count
/// - `400 SOLD_OUT` when the reservation overdraws the counter
/// - `404 NOT_FOUND` when the item's counter was never seeded
/// - `429 TOO_MANY_REQUESTS` from the admission middleware
/// - `500 PURCHASE_FAILED` when a store fails mid-attempt (retryable)
pub async fn purchase(
    Path(item_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<PurchaseResponse>, AppError> {
    let item_id = ItemId::new(item_id);

    match state.coordinator.purchase(item_id).await {
        Ok(receipt) => Ok(Json(PurchaseResponse {
            item_id,
            remaining: receipt.remaining,
        })),
        Err(PurchaseError::SoldOut { .. }) => Err(AppError::sold_out()),
        Err(PurchaseError::AdmissionRejected { .. }) => {
            Err(AppError::too_many_requests("Too Many Requests"))
        }
        Err(PurchaseError::Store(StoreError::Unseeded(_))) => {
            Err(AppError::not_found("Item", item_id))
        }
        Err(PurchaseError::Store(e)) => Err(AppError::purchase_failed(
            "Purchase failed, please try again",
        )
        .with_source(anyhow::Error::new(e))),
    }
}
