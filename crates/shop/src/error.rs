//! Unified error handling for shop operations.
//!
//! Every facade operation returns `Result<T, ShopError>`. Collaborators show
//! [`ShopError::user_message`] to the person at the keyboard; the `Display`
//! form carries the detail and is meant for logs.

use thiserror::Error;
use topup_core::{Email, EmailError, OrderId, OrderStatus, TransactionId};

use crate::storage::StorageError;

/// Message shown when persistence fails while submitting.
pub const TRANSIENT_MESSAGE: &str = "Submission failed: a network error occurred. Please try again.";

/// Application-level error type for the shop.
#[derive(Debug, Error)]
pub enum ShopError {
    /// A required field is missing or invalid.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The normalized transaction id was already used by another order.
    #[error("transaction id {0} has already been used")]
    DuplicateTransaction(TransactionId),

    /// The account is restricted.
    #[error("user {0} is banned")]
    Banned(Email),

    /// No order with this id (or transaction id).
    #[error("order not found: {0}")]
    OrderNotFound(String),

    /// Some other referenced entity does not exist.
    #[error("{kind} not found: {id}")]
    EntityNotFound {
        /// Entity kind (`product`, `category`, `user`).
        kind: &'static str,
        /// Requested id.
        id: String,
    },

    /// The requested status change is not an edge of the order pipeline.
    #[error("order {order_id} cannot move from {from} to {to}")]
    InvalidTransition {
        order_id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Email input did not parse.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Persistence failed; the mutation was not applied.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ShopError {
    /// Text safe to show to the submitter.
    ///
    /// Storage failures are logged and collapse to a generic transient message;
    /// the submitter is expected to retry manually.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => format!("Error: {msg}"),
            Self::DuplicateTransaction(_) => {
                "Error: This Transaction ID has already been used.".to_string()
            }
            Self::Banned(_) => {
                "Your account has been restricted. Please contact support.".to_string()
            }
            Self::OrderNotFound(_) => "Order not found.".to_string(),
            Self::EntityNotFound { kind, .. } => format!("The requested {kind} does not exist."),
            Self::InvalidTransition { from, to, .. } => {
                format!("An order that is {from} cannot be marked {to}.")
            }
            Self::InvalidEmail(_) => "Please enter a valid email address.".to_string(),
            Self::Storage(err) => {
                tracing::error!(error = %err, "Storage failure surfaced to submitter");
                TRANSIENT_MESSAGE.to_string()
            }
        }
    }
}

/// Result type alias for `ShopError`.
pub type Result<T> = std::result::Result<T, ShopError>;
