//! Shop user record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Email, Price};

/// A buyer (or the administrator) known to the shop.
///
/// There is no credential: the email is the identity. `total_spent` is a
/// denormalized aggregate equal to the sum of the user's completed orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppUser {
    /// Identity.
    pub email: Email,
    /// Whether this user may use the admin surface.
    pub is_admin: bool,
    /// Banned users cannot log in.
    pub is_banned: bool,
    /// First login (or first recorded spend).
    pub created_at: DateTime<Utc>,
    /// Sum of completed order prices.
    pub total_spent: Price,
}

impl AppUser {
    /// A fresh user with no spend.
    #[must_use]
    pub fn new(email: Email, is_admin: bool) -> Self {
        Self {
            email,
            is_admin,
            is_banned: false,
            created_at: Utc::now(),
            total_spent: Price::ZERO,
        }
    }
}
