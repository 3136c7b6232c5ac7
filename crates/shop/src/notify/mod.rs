//! Notification dispatch.
//!
//! A [`Notifier`] turns an order event into something the buyer sees: an email
//! in the outbox, an alert in their in-app inbox. The shop hands every event to
//! a [`Dispatcher`] after the order change has been committed; delivery then
//! runs on a background task and its outcome is only logged.

mod email;
mod in_app;
mod retry;

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tokio::task::JoinSet;
use topup_core::{Email, Order};

use crate::storage::StorageError;

pub use email::{DEFAULT_OUTBOX_CAPACITY, EmailError, EmailMessage, EmailNotifier};
pub use in_app::{InAppNotifier, Inbox, message_for};
pub use retry::Retrying;

/// Order event a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Order received, awaiting payment verification.
    Confirmation,
    /// Order completed; carries the digital invoice.
    Invoice,
    /// Order cancelled.
    Cancellation,
    /// Order picked up for manual review.
    Review,
}

impl NotificationKind {
    /// Stable lowercase name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmation => "confirmation",
            Self::Invoice => "invoice",
            Self::Cancellation => "cancellation",
            Self::Review => "review",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single event addressed to one recipient.
///
/// The order is a snapshot taken when the change was committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub recipient: Email,
    pub order: Order,
    /// `WhatsApp` support number at dispatch time; channels fall back to
    /// their own default when unset.
    pub support_whatsapp: Option<String>,
}

impl Notification {
    /// Address `kind` for `order` to the order's owner.
    #[must_use]
    pub fn for_owner(kind: NotificationKind, order: Order) -> Self {
        Self {
            kind,
            recipient: order.user_email.clone(),
            order,
            support_whatsapp: None,
        }
    }

    #[must_use]
    pub fn with_support_whatsapp(mut self, number: impl Into<String>) -> Self {
        self.support_whatsapp = Some(number.into());
        self
    }
}

/// Errors raised while delivering a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Email rendering or delivery failed.
    #[error(transparent)]
    Email(#[from] EmailError),

    /// The in-app inbox could not be persisted.
    #[error("Inbox error: {0}")]
    Storage(#[from] StorageError),
}

impl NotifyError {
    /// Returns `true` if trying again might succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Email(e) => e.is_retryable(),
            Self::Storage(_) => true,
        }
    }
}

/// Delivers notifications through one channel.
pub trait Notifier: Send + Sync + 'static {
    /// Deliver `notification`.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError` if the channel could not deliver it.
    fn notify(
        &self,
        notification: &Notification,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// Both channels are attempted; a failure in one does not stop the other.
impl<A: Notifier, B: Notifier> Notifier for (A, B) {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let (first, second) = tokio::join!(self.0.notify(notification), self.1.notify(notification));
        if let (Err(_), Err(e)) = (&first, &second) {
            tracing::warn!(
                kind = %notification.kind,
                order_id = %notification.order.id,
                error = %e,
                "Second notification channel also failed"
            );
        }
        first.and(second)
    }
}

/// The shop's default channels: email plus in-app alerts, each retried.
pub type StandardNotifier<S> = (Retrying<EmailNotifier>, Retrying<InAppNotifier<S>>);

/// Runs notifications on background tasks.
///
/// Finished tasks are reaped on each dispatch; [`Dispatcher::shutdown`] waits
/// for the rest.
pub struct Dispatcher<N> {
    notifier: Arc<N>,
    tasks: Mutex<JoinSet<()>>,
}

impl<N: Notifier> Dispatcher<N> {
    #[must_use]
    pub fn new(notifier: N) -> Self {
        Self {
            notifier: Arc::new(notifier),
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    /// The wrapped notifier.
    #[must_use]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Spawn delivery of `notification` and return immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, notification: Notification) {
        let notifier = Arc::clone(&self.notifier);
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);

        while let Some(finished) = tasks.try_join_next() {
            log_join_failure(finished);
        }

        tasks.spawn(async move {
            match notifier.notify(&notification).await {
                Ok(()) => tracing::info!(
                    kind = %notification.kind,
                    order_id = %notification.order.id,
                    to = %notification.recipient,
                    "Notification delivered"
                ),
                Err(e) => tracing::error!(
                    kind = %notification.kind,
                    order_id = %notification.order.id,
                    to = %notification.recipient,
                    error = %e,
                    "Notification failed"
                ),
            }
        });
    }

    /// Number of deliveries not yet reaped.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Wait for every outstanding delivery to finish.
    pub async fn shutdown(&self) {
        let mut tasks = std::mem::take(&mut *self.tasks.lock().unwrap_or_else(PoisonError::into_inner));
        let pending = tasks.len();
        while let Some(finished) = tasks.join_next().await {
            log_join_failure(finished);
        }
        tracing::debug!(pending, "Notification dispatcher drained");
    }
}

fn log_join_failure(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        tracing::error!(error = %e, "Notification task panicked");
    }
}
