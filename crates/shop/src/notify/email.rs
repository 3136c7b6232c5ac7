//! Transactional email for order events.
//!
//! Bodies are rendered with Askama templates (HTML plus plain-text
//! alternative). There is no mail transport: delivery waits out a simulated
//! round trip, logs the message and appends it to an in-process outbox.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use askama::Template;
use chrono::Datelike;
use thiserror::Error;

use super::{Notification, NotificationKind, Notifier, NotifyError};

const DEFAULT_SUPPORT_WHATSAPP: &str = "8801401788594";

/// Messages kept in the outbox before the oldest are dropped.
pub const DEFAULT_OUTBOX_CAPACITY: usize = 256;

/// HTML template for the order confirmation email.
#[derive(Template)]
#[template(path = "email/confirmation.html")]
struct ConfirmationEmailHtml<'a> {
    customer_name: &'a str,
    order_id: &'a str,
    product_name: &'a str,
    transaction_id: &'a str,
    status: &'a str,
    year: i32,
}

/// Plain text template for the order confirmation email.
#[derive(Template)]
#[template(path = "email/confirmation.txt")]
struct ConfirmationEmailText<'a> {
    customer_name: &'a str,
    order_id: &'a str,
    product_name: &'a str,
    transaction_id: &'a str,
    status: &'a str,
    year: i32,
}

/// HTML template for the digital invoice.
#[derive(Template)]
#[template(path = "email/invoice.html")]
struct InvoiceEmailHtml<'a> {
    order_id: &'a str,
    date: &'a str,
    email: &'a str,
    player_id: &'a str,
    product_name: &'a str,
    price: &'a str,
    support_whatsapp: &'a str,
}

/// Plain text template for the digital invoice.
#[derive(Template)]
#[template(path = "email/invoice.txt")]
struct InvoiceEmailText<'a> {
    order_id: &'a str,
    date: &'a str,
    email: &'a str,
    player_id: &'a str,
    product_name: &'a str,
    price: &'a str,
    support_whatsapp: &'a str,
}

/// HTML template for the cancellation email.
#[derive(Template)]
#[template(path = "email/cancellation.html")]
struct CancellationEmailHtml<'a> {
    order_id: &'a str,
    product_name: &'a str,
    transaction_id: &'a str,
    support_whatsapp: &'a str,
}

/// Plain text template for the cancellation email.
#[derive(Template)]
#[template(path = "email/cancellation.txt")]
struct CancellationEmailText<'a> {
    order_id: &'a str,
    product_name: &'a str,
    transaction_id: &'a str,
    support_whatsapp: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl EmailError {
    /// Rendering is deterministic, so no email error is worth retrying.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Template(_) => false,
        }
    }
}

/// A rendered email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Renders order emails and records them in an outbox.
///
/// The outbox lets the CLI and tests observe what was sent. It is bounded and
/// keeps only the most recent messages. Clones share the same outbox.
#[derive(Debug, Clone)]
pub struct EmailNotifier {
    delivery_delay: Duration,
    support_whatsapp: String,
    outbox_capacity: usize,
    outbox: Arc<Mutex<VecDeque<EmailMessage>>>,
}

impl EmailNotifier {
    /// Create a notifier whose simulated delivery takes `delivery_delay`.
    #[must_use]
    pub fn new(delivery_delay: Duration) -> Self {
        Self {
            delivery_delay,
            support_whatsapp: DEFAULT_SUPPORT_WHATSAPP.to_string(),
            outbox_capacity: DEFAULT_OUTBOX_CAPACITY,
            outbox: Arc::default(),
        }
    }

    /// Use `number` for the `WhatsApp` support links of notifications that do
    /// not carry their own.
    #[must_use]
    pub fn with_support_whatsapp(mut self, number: impl Into<String>) -> Self {
        self.support_whatsapp = number.into();
        self
    }

    /// Keep at most `capacity` messages in the outbox.
    #[must_use]
    pub const fn with_outbox_capacity(mut self, capacity: usize) -> Self {
        self.outbox_capacity = capacity;
        self
    }

    /// The most recently delivered emails, oldest first.
    #[must_use]
    pub fn outbox(&self) -> Vec<EmailMessage> {
        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Render the email for `notification`. Events without an email yield `None`.
    ///
    /// # Errors
    ///
    /// Returns `EmailError::Template` if a template fails to render.
    pub fn render(&self, notification: &Notification) -> Result<Option<EmailMessage>, EmailError> {
        let order = &notification.order;
        let order_id = order.id.as_str();
        let product_name = order.product_name.as_str();
        let transaction_id = order.transaction_id.as_str();
        let support_whatsapp = notification
            .support_whatsapp
            .as_deref()
            .unwrap_or(&self.support_whatsapp);

        let (subject, html, text) = match notification.kind {
            NotificationKind::Confirmation => {
                let customer_name = notification.recipient.local_part();
                let status = order.status.as_str().to_uppercase();
                let year = order.created_at.year();
                let html = ConfirmationEmailHtml {
                    customer_name,
                    order_id,
                    product_name,
                    transaction_id,
                    status: &status,
                    year,
                }
                .render()?;
                let text = ConfirmationEmailText {
                    customer_name,
                    order_id,
                    product_name,
                    transaction_id,
                    status: &status,
                    year,
                }
                .render()?;
                (format!("Confirmation: {product_name}"), html, text)
            }
            NotificationKind::Invoice => {
                let date = order.created_at.format("%B %-d, %Y %I:%M %p").to_string();
                let email = notification.recipient.as_str();
                let price = order.price.to_string();
                let html = InvoiceEmailHtml {
                    order_id,
                    date: &date,
                    email,
                    player_id: &order.player_id,
                    product_name,
                    price: &price,
                    support_whatsapp,
                }
                .render()?;
                let text = InvoiceEmailText {
                    order_id,
                    date: &date,
                    email,
                    player_id: &order.player_id,
                    product_name,
                    price: &price,
                    support_whatsapp,
                }
                .render()?;
                (
                    format!("Success! Digital Invoice for Order #{order_id}"),
                    html,
                    text,
                )
            }
            NotificationKind::Cancellation => {
                let html = CancellationEmailHtml {
                    order_id,
                    product_name,
                    transaction_id,
                    support_whatsapp,
                }
                .render()?;
                let text = CancellationEmailText {
                    order_id,
                    product_name,
                    transaction_id,
                    support_whatsapp,
                }
                .render()?;
                (format!("Order #{order_id} Cancelled"), html, text)
            }
            NotificationKind::Review => return Ok(None),
        };

        Ok(Some(EmailMessage {
            to: notification.recipient.to_string(),
            subject,
            html,
            text,
        }))
    }
}

impl Notifier for EmailNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let Some(message) = self.render(notification)? else {
            return Ok(());
        };

        tokio::time::sleep(self.delivery_delay).await;

        tracing::info!(to = %message.to, subject = %message.subject, "Email sent successfully");
        let mut outbox = self.outbox.lock().unwrap_or_else(PoisonError::into_inner);
        outbox.push_back(message);
        while outbox.len() > self.outbox_capacity {
            outbox.pop_front();
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notify::tests::sample_order;

    fn notifier() -> EmailNotifier {
        EmailNotifier::new(Duration::ZERO)
    }

    #[test]
    fn test_confirmation_email() {
        let n = Notification::for_owner(NotificationKind::Confirmation, sample_order());
        let message = notifier().render(&n).unwrap().unwrap();
        assert_eq!(message.to, "buyer@example.com");
        assert_eq!(message.subject, "Confirmation: 100 Diamonds x3");
        assert!(message.html.contains("BK7X9Q"));
        assert!(message.html.contains("PENDING"));
        assert!(message.text.contains("Hello buyer,"));
    }

    #[test]
    fn test_invoice_email() {
        let n = Notification::for_owner(NotificationKind::Invoice, sample_order());
        let message = notifier()
            .with_support_whatsapp("8800000000000")
            .render(&n)
            .unwrap()
            .unwrap();
        assert_eq!(
            message.subject,
            "Success! Digital Invoice for Order #ORD-1700000000000"
        );
        assert!(message.html.contains("৳210"));
        assert!(message.html.contains("5123456789"));
        assert!(message.text.contains("https://wa.me/8800000000000"));
    }

    #[test]
    fn test_notification_support_number_wins() {
        let n = Notification::for_owner(NotificationKind::Cancellation, sample_order())
            .with_support_whatsapp("8801700000000");
        let message = notifier()
            .with_support_whatsapp("8800000000000")
            .render(&n)
            .unwrap()
            .unwrap();
        assert!(message.text.contains("https://wa.me/8801700000000"));
        assert!(!message.text.contains("8800000000000"));
    }

    #[test]
    fn test_review_has_no_email() {
        let n = Notification::for_owner(NotificationKind::Review, sample_order());
        assert!(notifier().render(&n).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delivery_records_outbox() {
        let email = notifier();
        let order = sample_order();
        email
            .notify(&Notification::for_owner(NotificationKind::Cancellation, order.clone()))
            .await
            .unwrap();
        email
            .notify(&Notification::for_owner(NotificationKind::Review, order))
            .await
            .unwrap();

        let outbox = email.outbox();
        assert_eq!(outbox.len(), 1);
        assert_eq!(outbox[0].subject, "Order #ORD-1700000000000 Cancelled");
    }

    #[tokio::test]
    async fn test_outbox_keeps_most_recent_messages() {
        let email = notifier().with_outbox_capacity(2);
        for kind in [
            NotificationKind::Confirmation,
            NotificationKind::Invoice,
            NotificationKind::Cancellation,
        ] {
            email
                .notify(&Notification::for_owner(kind, sample_order()))
                .await
                .unwrap();
        }

        let subjects: Vec<String> = email.outbox().into_iter().map(|m| m.subject).collect();
        assert_eq!(
            subjects,
            [
                "Success! Digital Invoice for Order #ORD-1700000000000",
                "Order #ORD-1700000000000 Cancelled",
            ]
        );
    }
}
