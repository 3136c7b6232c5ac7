//! Integration tests for racing submissions and status changes.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use topup_core::{OrderStatus, Price};
use topup_integration_tests::{BUYER_EMAIL, buyer_order, memory_shop_with, test_config};
use topup_shop::{OrderFilter, ShopError};

// =============================================================================
// Duplicate submissions
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_submissions_store_one_order() {
    let mut config = test_config();
    // Every submission passes the early duplicate check before any inserts.
    config.verification_delay = Duration::from_millis(50);
    let (_, shop) = memory_shop_with(config).await;
    let shop = Arc::new(shop);

    let mut tasks = JoinSet::new();
    for _ in 0..10 {
        let shop = Arc::clone(&shop);
        tasks.spawn(async move { shop.create_order(buyer_order("ff-100", 1, "RACE1")).await });
    }

    let mut created = 0;
    let mut duplicates = 0;
    while let Some(result) = tasks.join_next().await {
        match result.unwrap() {
            Ok(_) => created += 1,
            Err(ShopError::DuplicateTransaction(_)) => duplicates += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(duplicates, 9);
    assert_eq!(shop.list_orders(&OrderFilter::default()).await.len(), 1);
    shop.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_distinct_submissions_get_unique_ids() {
    let (_, shop) = memory_shop_with(test_config()).await;
    let shop = Arc::new(shop);

    let mut tasks = JoinSet::new();
    for i in 0..20 {
        let shop = Arc::clone(&shop);
        tasks.spawn(async move {
            shop.create_order(buyer_order("ff-25", 1, &format!("TRX-{i}")))
                .await
        });
    }

    let mut ids = HashSet::new();
    while let Some(result) = tasks.join_next().await {
        let order = result.unwrap().unwrap();
        assert!(ids.insert(order.id));
    }

    assert_eq!(ids.len(), 20);
    assert_eq!(shop.list_orders(&OrderFilter::default()).await.len(), 20);
    shop.shutdown().await;
}

// =============================================================================
// Racing status changes
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_completions_record_spend_once() {
    let (_, shop) = memory_shop_with(test_config()).await;
    let shop = Arc::new(shop);
    shop.login(BUYER_EMAIL).await.unwrap();
    let order = shop
        .create_order(buyer_order("ff-200", 1, "TRX1"))
        .await
        .unwrap();

    let mut tasks = JoinSet::new();
    for _ in 0..8 {
        let shop = Arc::clone(&shop);
        let id = order.id.clone();
        tasks.spawn(async move { shop.set_status(id.as_str(), OrderStatus::Completed).await });
    }

    let mut succeeded = 0;
    while let Some(result) = tasks.join_next().await {
        match result.unwrap() {
            Ok(_) => succeeded += 1,
            Err(ShopError::InvalidTransition { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(succeeded, 1);
    assert_eq!(
        shop.user(BUYER_EMAIL).await.unwrap().total_spent,
        Price::from_taka(140)
    );
    shop.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_complete_and_cancel_race_has_one_winner() {
    let (_, shop) = memory_shop_with(test_config()).await;
    let shop = Arc::new(shop);
    shop.login(BUYER_EMAIL).await.unwrap();
    let order = shop
        .create_order(buyer_order("ff-100", 1, "TRX1"))
        .await
        .unwrap();

    let complete = {
        let shop = Arc::clone(&shop);
        let id = order.id.clone();
        tokio::spawn(async move { shop.set_status(id.as_str(), OrderStatus::Completed).await })
    };
    let cancel = {
        let shop = Arc::clone(&shop);
        let id = order.id.clone();
        tokio::spawn(async move { shop.set_status(id.as_str(), OrderStatus::Cancelled).await })
    };
    let completed = complete.await.unwrap().is_ok();
    let cancelled = cancel.await.unwrap().is_ok();
    assert!(completed ^ cancelled);

    let final_status = shop.lookup_order(order.id.as_str()).await.unwrap().status;
    let spent = shop.user(BUYER_EMAIL).await.unwrap().total_spent;
    if completed {
        assert_eq!(final_status, OrderStatus::Completed);
        assert_eq!(spent, Price::from_taka(70));
    } else {
        assert_eq!(final_status, OrderStatus::Cancelled);
        assert_eq!(spent, Price::ZERO);
    }
    shop.shutdown().await;
}
