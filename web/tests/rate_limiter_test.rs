//! Fixed-window admission tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use seckill_core::{
    FixedWindowLimiter, Item, ItemId, PurchaseCoordinator, PurchaseError, StockSynchronizer,
};
use seckill_testing::{
    FixedClock, InMemoryCounterStore, InMemoryDurableStore, InMemoryWindowStore,
};
use seckill_web::{build_router, AppState};
use std::sync::Arc;

fn frozen_clock() -> Arc<FixedClock> {
    let start: DateTime<Utc> = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    Arc::new(FixedClock::new(start))
}

#[tokio::test]
async fn fourth_attempt_in_a_window_is_rejected() {
    let windows = Arc::new(InMemoryWindowStore::new());
    let limiter = FixedWindowLimiter::new(windows, frozen_clock());

    for _ in 0..3 {
        limiter.admit("10.0.0.1").await.unwrap();
    }

    let rejected = limiter.admit("10.0.0.1").await;
    assert!(matches!(
        rejected,
        Err(PurchaseError::AdmissionRejected { .. })
    ));
}

#[tokio::test]
async fn window_rollover_resets_the_budget() {
    let windows = Arc::new(InMemoryWindowStore::new());
    let clock = frozen_clock();
    let limiter = FixedWindowLimiter::new(windows, clock.clone());

    for _ in 0..3 {
        limiter.admit("10.0.0.1").await.unwrap();
    }
    assert!(limiter.admit("10.0.0.1").await.is_err());

    // The next second is a fresh window with a fresh budget.
    clock.advance(ChronoDuration::seconds(1));
    assert!(limiter.admit("10.0.0.1").await.is_ok());
}

#[tokio::test]
async fn identities_are_limited_independently() {
    let windows = Arc::new(InMemoryWindowStore::new());
    let limiter = FixedWindowLimiter::new(windows, frozen_clock());

    for _ in 0..3 {
        limiter.admit("10.0.0.1").await.unwrap();
    }
    assert!(limiter.admit("10.0.0.1").await.is_err());

    // A different client's budget is untouched.
    assert!(limiter.admit("10.0.0.2").await.is_ok());
}

#[tokio::test]
async fn window_store_failure_rejects_the_request() {
    let windows = Arc::new(InMemoryWindowStore::new());
    let limiter = FixedWindowLimiter::new(windows.clone(), frozen_clock());

    windows.fail_requests(true);

    // A scarce-resource gate fails closed, and the failure is retryable.
    let result = limiter.admit("10.0.0.1").await;
    match result {
        Err(e @ PurchaseError::Store(_)) => assert!(e.is_retryable()),
        other => panic!("expected a store failure, got {other:?}"),
    }

    windows.fail_requests(false);
    assert!(limiter.admit("10.0.0.1").await.is_ok());
}

#[tokio::test]
async fn fourth_http_request_in_a_window_gets_429() {
    let counters = Arc::new(InMemoryCounterStore::new());
    let store = Arc::new(InMemoryDurableStore::with_items(vec![Item {
        id: ItemId::new(1),
        name: "limited drop".to_string(),
        stock: 100,
    }]));
    StockSynchronizer::new(store.clone(), counters.clone())
        .run()
        .await
        .unwrap();

    let coordinator = Arc::new(PurchaseCoordinator::new(counters.clone(), store.clone()));
    let limiter = Arc::new(FixedWindowLimiter::new(
        Arc::new(InMemoryWindowStore::new()),
        frozen_clock(),
    ));
    let state = AppState::new(coordinator, limiter, store.clone());
    let server = TestServer::new(build_router(state)).unwrap();

    // All requests share one identity (no forwarding headers, no peer
    // address in an in-process router), so they share one window budget.
    for _ in 0..3 {
        let response = server.post("/purchase/1").await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    let response = server.post("/purchase/1").await;
    assert_eq!(response.status_code(), StatusCode::TOO_MANY_REQUESTS);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "TOO_MANY_REQUESTS");

    // The rejected attempt never touched the stock gate.
    assert_eq!(counters.get("item_stock_1"), Some(97));
    assert_eq!(store.order_count(ItemId::new(1)), 3);
}
