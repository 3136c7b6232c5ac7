//! In-app notification record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Email, NotificationId, OrderId};

/// An alert shown to a user inside the app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppNotification {
    pub id: NotificationId,
    pub user_email: Email,
    pub order_id: OrderId,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

impl AppNotification {
    /// Create an unread notification with a random id.
    #[must_use]
    pub fn new(user_email: Email, order_id: OrderId, message: String) -> Self {
        Self {
            id: NotificationId::new(format!("NOTIF-{}", uuid::Uuid::new_v4().simple())),
            user_email,
            order_id,
            message,
            timestamp: Utc::now(),
            read: false,
        }
    }
}
