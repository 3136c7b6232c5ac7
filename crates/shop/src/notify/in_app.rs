//! In-app alerts.

use std::sync::Arc;

use tokio::sync::RwLock;
use topup_core::{AppNotification, Email, Order};

use super::{Notification, NotificationKind, Notifier, NotifyError};
use crate::storage::{Storage, StorageError, keys, load_json, save_json};

/// Persisted per-user alert inbox.
pub struct Inbox<S> {
    storage: Arc<S>,
    notifications: RwLock<Vec<AppNotification>>,
}

impl<S: Storage> Inbox<S> {
    /// Load the collection; an absent collection is empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the stored document cannot be read.
    pub async fn open(storage: Arc<S>) -> Result<Self, StorageError> {
        let notifications = load_json(storage.as_ref(), keys::NOTIFICATIONS)
            .await?
            .unwrap_or_default();
        Ok(Self {
            storage,
            notifications: RwLock::new(notifications),
        })
    }

    /// Append an alert.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the inbox cannot be persisted.
    pub async fn push(&self, notification: AppNotification) -> Result<(), StorageError> {
        let mut guard = self.notifications.write().await;
        let mut next = guard.clone();
        next.push(notification);
        save_json(self.storage.as_ref(), keys::NOTIFICATIONS, &next).await?;
        *guard = next;
        Ok(())
    }

    /// A user's alerts, newest first.
    pub async fn for_user(&self, email: &Email) -> Vec<AppNotification> {
        self.notifications
            .read()
            .await
            .iter()
            .rev()
            .filter(|n| n.user_email == *email)
            .cloned()
            .collect()
    }

    /// Number of unread alerts for a user.
    pub async fn unread_count(&self, email: &Email) -> usize {
        self.notifications
            .read()
            .await
            .iter()
            .filter(|n| n.user_email == *email && !n.read)
            .count()
    }

    /// Mark all of a user's alerts read. Returns how many changed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the inbox cannot be persisted.
    pub async fn mark_read(&self, email: &Email) -> Result<usize, StorageError> {
        let mut guard = self.notifications.write().await;
        let mut next = guard.clone();
        let mut changed = 0;
        for n in next.iter_mut().filter(|n| n.user_email == *email && !n.read) {
            n.read = true;
            changed += 1;
        }
        if changed > 0 {
            save_json(self.storage.as_ref(), keys::NOTIFICATIONS, &next).await?;
            *guard = next;
        }
        Ok(changed)
    }
}

/// Writes one alert per order event into an [`Inbox`].
pub struct InAppNotifier<S> {
    inbox: Arc<Inbox<S>>,
}

impl<S> InAppNotifier<S> {
    #[must_use]
    pub const fn new(inbox: Arc<Inbox<S>>) -> Self {
        Self { inbox }
    }
}

/// Alert text for an event.
#[must_use]
pub fn message_for(kind: NotificationKind, order: &Order) -> String {
    let id = &order.id;
    match kind {
        NotificationKind::Confirmation => {
            format!("Order {id} has been received and is awaiting payment verification.")
        }
        NotificationKind::Invoice => {
            format!("Success! Your order {id} has been completed. Check your game account!")
        }
        NotificationKind::Cancellation => {
            format!("Your order {id} was cancelled. Contact support for details.")
        }
        NotificationKind::Review => format!("Order {id} is now under review."),
    }
}

impl<S: Storage> Notifier for InAppNotifier<S> {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let alert = AppNotification::new(
            notification.recipient.clone(),
            notification.order.id.clone(),
            message_for(notification.kind, &notification.order),
        );
        self.inbox.push(alert).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notify::tests::sample_order;
    use crate::storage::MemoryStorage;

    async fn inbox() -> (Arc<MemoryStorage>, Arc<Inbox<MemoryStorage>>) {
        let storage = Arc::new(MemoryStorage::new());
        let inbox = Inbox::open(Arc::clone(&storage)).await.unwrap();
        (storage, Arc::new(inbox))
    }

    #[tokio::test]
    async fn test_notifier_writes_alerts_newest_first() {
        let (storage, inbox) = inbox().await;
        let notifier = InAppNotifier::new(Arc::clone(&inbox));
        let order = sample_order();

        notifier
            .notify(&Notification::for_owner(NotificationKind::Confirmation, order.clone()))
            .await
            .unwrap();
        notifier
            .notify(&Notification::for_owner(NotificationKind::Invoice, order.clone()))
            .await
            .unwrap();

        let alerts = inbox.for_user(&order.user_email).await;
        assert_eq!(alerts.len(), 2);
        assert_eq!(
            alerts[0].message,
            "Success! Your order ORD-1700000000000 has been completed. Check your game account!"
        );
        assert_eq!(inbox.unread_count(&order.user_email).await, 2);

        let reopened = Inbox::open(storage).await.unwrap();
        assert_eq!(reopened.for_user(&order.user_email).await.len(), 2);
    }

    #[tokio::test]
    async fn test_mark_read_only_touches_owner() {
        let (_, inbox) = inbox().await;
        let mine = Email::parse("buyer@example.com").unwrap();
        let theirs = Email::parse("other@example.com").unwrap();
        let order = sample_order();
        for email in [&mine, &theirs] {
            inbox
                .push(AppNotification::new(email.clone(), order.id.clone(), "hi".into()))
                .await
                .unwrap();
        }

        assert_eq!(inbox.mark_read(&mine).await.unwrap(), 1);
        assert_eq!(inbox.mark_read(&mine).await.unwrap(), 0);
        assert_eq!(inbox.unread_count(&mine).await, 0);
        assert_eq!(inbox.unread_count(&theirs).await, 1);
    }

    #[tokio::test]
    async fn test_failed_push_is_retryable() {
        let (storage, inbox) = inbox().await;
        storage.set_fail_writes(true);
        let notifier = InAppNotifier::new(Arc::clone(&inbox));
        let err = notifier
            .notify(&Notification::for_owner(NotificationKind::Review, sample_order()))
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(inbox.for_user(&sample_order().user_email).await.len(), 0);
    }
}
