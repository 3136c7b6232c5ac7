//! Integration tests for the top-up shop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p topup-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `order_lifecycle` - Creation, transitions, deletion and lookup
//! - `concurrency` - Racing submissions and status changes
//! - `notifications` - Email outbox and in-app alerts
//! - `persistence` - File storage reloads and storage failures
//! - `users` - Login, admin flag and bans
//!
//! This library holds the shared fixtures; the tests live in `tests/`.

use std::path::PathBuf;
use std::sync::Arc;

use topup_core::{Email, PaymentMethod, ProductId};
use topup_shop::{MemoryStorage, OrderRequest, Shop, ShopConfig};

/// Email configured as the administrator in every fixture.
pub const ADMIN_EMAIL: &str = "admin@sadikstore.example";

/// A regular buyer.
pub const BUYER_EMAIL: &str = "buyer@example.com";

/// Configuration with no simulated delays.
///
/// # Panics
///
/// Never; the admin email constant is valid.
#[must_use]
pub fn test_config() -> ShopConfig {
    ShopConfig::without_delays(Email::parse(ADMIN_EMAIL).expect("valid admin email"))
}

/// A shop over fresh in-memory storage, plus the storage handle.
///
/// # Panics
///
/// Panics if the shop cannot be opened.
pub async fn memory_shop() -> (Arc<MemoryStorage>, Shop<MemoryStorage>) {
    memory_shop_with(test_config()).await
}

/// A shop over fresh in-memory storage with a custom configuration.
///
/// # Panics
///
/// Panics if the shop cannot be opened.
pub async fn memory_shop_with(config: ShopConfig) -> (Arc<MemoryStorage>, Shop<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let shop = Shop::open(config, Arc::clone(&storage))
        .await
        .expect("shop opens on empty storage");
    (storage, shop)
}

/// A buyer order paid with bKash.
#[must_use]
pub fn buyer_order(product: &str, quantity: u32, transaction_id: &str) -> OrderRequest {
    OrderRequest {
        product_id: ProductId::new(product),
        quantity,
        player_id: "5123456789".to_string(),
        payment_method: PaymentMethod::Bkash,
        transaction_id: transaction_id.to_string(),
        buyer_email: BUYER_EMAIL.to_string(),
        administrative: false,
    }
}

/// An administrator fast-fill order for `buyer`.
#[must_use]
pub fn admin_order(product: &str, quantity: u32, buyer: &str) -> OrderRequest {
    OrderRequest {
        product_id: ProductId::new(product),
        quantity,
        player_id: "9988776655".to_string(),
        payment_method: PaymentMethod::Nagad,
        transaction_id: String::new(),
        buyer_email: buyer.to_string(),
        administrative: true,
    }
}

/// A per-process scratch directory under the system temp dir.
#[must_use]
pub fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("topup-it-{name}-{}", std::process::id()))
}
