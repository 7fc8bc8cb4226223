//! Item catalog listing endpoint.

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use seckill_core::Item;

/// List all items with their authoritative stock.
///
/// Read-through with no gating: the listing reflects the durable store,
/// not the fast counter, so it can momentarily disagree with the gate
/// while a purchase is in flight.
///
/// # Example
///
/// ```bash
/// curl http://localhost:3000/items
/// # [{"id":1,"name":"limited drop","stock":100}]
/// ```
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>, AppError> {
    let items = state.catalog.list_items().await.map_err(|e| {
        AppError::internal("Failed to fetch items").with_source(anyhow::Error::new(e))
    })?;
    Ok(Json(items))
}
