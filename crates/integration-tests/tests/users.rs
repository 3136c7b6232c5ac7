//! Integration tests for login, the admin flag and bans.

#![allow(clippy::unwrap_used)]

use topup_core::Price;
use topup_integration_tests::{ADMIN_EMAIL, BUYER_EMAIL, admin_order, buyer_order, memory_shop};
use topup_shop::ShopError;

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_first_login_registers_user() {
    let (_, shop) = memory_shop().await;

    let user = shop.login("  Buyer@Example.com ").await.unwrap();
    assert_eq!(user.email.as_str(), BUYER_EMAIL);
    assert!(!user.is_admin);
    assert!(!user.is_banned);
    assert_eq!(user.total_spent, Price::ZERO);

    // Logging in again returns the same record.
    let again = shop.login(BUYER_EMAIL).await.unwrap();
    assert_eq!(again.created_at, user.created_at);
    assert_eq!(shop.users().await.len(), 1);
}

#[tokio::test]
async fn test_admin_email_gets_admin_flag() {
    let (_, shop) = memory_shop().await;
    assert!(shop.login(ADMIN_EMAIL).await.unwrap().is_admin);
}

#[tokio::test]
async fn test_invalid_email_is_rejected() {
    let (_, shop) = memory_shop().await;
    let err = shop.login("nobody").await.unwrap_err();
    assert!(matches!(err, ShopError::InvalidEmail(_)));
    assert_eq!(err.user_message(), "Please enter a valid email address.");
    assert!(shop.users().await.is_empty());
}

// =============================================================================
// Bans
// =============================================================================

#[tokio::test]
async fn test_banned_user_cannot_log_in_or_order() {
    let (_, shop) = memory_shop().await;
    shop.login(BUYER_EMAIL).await.unwrap();
    shop.set_banned(BUYER_EMAIL, true).await.unwrap();

    let err = shop.login(BUYER_EMAIL).await.unwrap_err();
    assert!(matches!(err, ShopError::Banned(_)));
    assert_eq!(
        err.user_message(),
        "Your account has been restricted. Please contact support."
    );

    assert!(matches!(
        shop.create_order(buyer_order("ff-100", 1, "TRX1")).await,
        Err(ShopError::Banned(_))
    ));

    shop.set_banned(BUYER_EMAIL, false).await.unwrap();
    assert!(shop.login(BUYER_EMAIL).await.is_ok());
}

#[tokio::test]
async fn test_admin_can_fast_fill_for_banned_user() {
    let (_, shop) = memory_shop().await;
    shop.login(BUYER_EMAIL).await.unwrap();
    shop.set_banned(BUYER_EMAIL, true).await.unwrap();

    let order = shop
        .create_order(admin_order("ff-25", 1, BUYER_EMAIL))
        .await
        .unwrap();
    assert_eq!(order.user_email.as_str(), BUYER_EMAIL);
    shop.shutdown().await;
}

#[tokio::test]
async fn test_banning_unknown_user_fails() {
    let (_, shop) = memory_shop().await;
    assert!(matches!(
        shop.set_banned("ghost@example.com", true).await,
        Err(ShopError::EntityNotFound { kind: "user", .. })
    ));
}
