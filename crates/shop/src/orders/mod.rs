//! The durable order collection.
//!
//! Orders are kept newest-first, which is the canonical display order. All
//! writers go through [`OrderStore::begin`], which holds the store's write lock
//! until the returned [`OrdersTxn`] is dropped. Duplicate checks, inserts and
//! status changes therefore never interleave.

pub mod lifecycle;

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockWriteGuard};
use topup_core::{Email, Order, OrderStatus};

use crate::storage::{Storage, StorageError, keys, load_json, save_json};

/// Read-side filter for [`OrderStore::list`]. Every set field must match.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Only orders in this status.
    pub status: Option<OrderStatus>,
    /// Only orders owned by this user.
    pub owner: Option<Email>,
    /// Case-insensitive substring of the player id or transaction id.
    pub search: Option<String>,
}

impl OrderFilter {
    /// Filter on status.
    #[must_use]
    pub const fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter on owner.
    #[must_use]
    pub fn with_owner(mut self, owner: Email) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Filter on search text.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Returns `true` if `order` passes every set criterion.
    #[must_use]
    pub fn accepts(&self, order: &Order) -> bool {
        self.status.is_none_or(|s| order.status == s)
            && self.owner.as_ref().is_none_or(|e| order.user_email == *e)
            && self
                .search
                .as_deref()
                .is_none_or(|needle| order.matches_search(needle))
    }
}

/// Order collection backed by a [`Storage`].
pub struct OrderStore<S> {
    storage: Arc<S>,
    orders: RwLock<Vec<Order>>,
}

impl<S: Storage> OrderStore<S> {
    /// Load the collection; an absent collection is empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the stored document cannot be read.
    pub async fn open(storage: Arc<S>) -> Result<Self, StorageError> {
        let orders: Vec<Order> = load_json(storage.as_ref(), keys::ORDERS)
            .await?
            .unwrap_or_default();
        tracing::info!(count = orders.len(), "Order store loaded");
        Ok(Self {
            storage,
            orders: RwLock::new(orders),
        })
    }

    /// Snapshot of matching orders, newest first.
    pub async fn list(&self, filter: &OrderFilter) -> Vec<Order> {
        self.orders
            .read()
            .await
            .iter()
            .filter(|o| filter.accepts(o))
            .cloned()
            .collect()
    }

    /// Apply `f` to the current orders under the read lock.
    pub async fn read<T>(&self, f: impl FnOnce(&[Order]) -> T) -> T {
        f(&self.orders.read().await)
    }

    /// Start an exclusive write.
    pub async fn begin(&self) -> OrdersTxn<'_, S> {
        OrdersTxn {
            guard: self.orders.write().await,
            storage: self.storage.as_ref(),
        }
    }
}

/// Exclusive access to the order collection.
///
/// Changes become visible only through [`OrdersTxn::commit`], which persists
/// the new collection before swapping it in. A failed commit leaves both the
/// stored document and the in-memory view untouched.
pub struct OrdersTxn<'a, S> {
    guard: RwLockWriteGuard<'a, Vec<Order>>,
    storage: &'a S,
}

impl<S: Storage> OrdersTxn<'_, S> {
    /// Current orders, newest first.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.guard
    }

    /// Persist `next` and make it the current collection.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if persisting fails; nothing changes in that case.
    pub async fn commit(&mut self, next: Vec<Order>) -> Result<(), StorageError> {
        save_json(self.storage, keys::ORDERS, &next).await?;
        *self.guard = next;
        Ok(())
    }
}
