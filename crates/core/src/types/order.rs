//! Order record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Email, OrderId, OrderStatus, PaymentMethod, Price, ProductId, TransactionId};

/// A single purchase attempt.
///
/// `product_id`, `product_name` and `price` are a snapshot taken at order time;
/// later catalog edits never touch existing orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique, immutable order id.
    pub id: OrderId,
    /// In-game account the pack is delivered to (free text).
    pub player_id: String,
    /// Product the order was placed for.
    pub product_id: ProductId,
    /// Display name including quantity (`"100 Diamonds x3"`).
    pub product_name: String,
    /// Line total.
    pub price: Price,
    /// Wallet the buyer paid through.
    pub payment_method: PaymentMethod,
    /// Normalized proof-of-payment reference.
    pub transaction_id: TransactionId,
    /// Pipeline status.
    pub status: OrderStatus,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
    /// Owning identity.
    pub user_email: Email,
}

impl Order {
    /// Display name embedding the quantity.
    #[must_use]
    pub fn display_name(product_name: &str, quantity: u32) -> String {
        format!("{product_name} x{quantity}")
    }

    /// Public tracking lookup: matches the order id or the transaction id,
    /// case-insensitively.
    #[must_use]
    pub fn matches_reference(&self, reference: &str) -> bool {
        let reference = reference.trim();
        !reference.is_empty()
            && (self.id.matches(reference)
                || self.transaction_id == TransactionId::normalize(reference))
    }

    /// Admin search: substring of the player id or the transaction id.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        self.player_id.to_lowercase().contains(&needle)
            || self
                .transaction_id
                .as_str()
                .to_lowercase()
                .contains(&needle)
    }
}
