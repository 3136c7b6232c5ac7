//! Users and their spend aggregate.
//!
//! `total_spent` is maintained incrementally: the shop calls
//! [`UserLedger::record_spend`] exactly once per order that reaches
//! `completed`, so the aggregate always equals the sum of that user's completed
//! orders. It is never recomputed from the order collection.

use std::sync::Arc;

use tokio::sync::RwLock;
use topup_core::{AppUser, Email, Price};

use crate::error::{Result, ShopError};
use crate::storage::{Storage, StorageError, keys, load_json, save_json};

/// User collection backed by a [`Storage`].
pub struct UserLedger<S> {
    storage: Arc<S>,
    users: RwLock<Vec<AppUser>>,
}

impl<S: Storage> UserLedger<S> {
    /// Load the collection; an absent collection is empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the stored document cannot be read.
    pub async fn open(storage: Arc<S>) -> std::result::Result<Self, StorageError> {
        let users: Vec<AppUser> = load_json(storage.as_ref(), keys::APP_USERS)
            .await?
            .unwrap_or_default();
        tracing::info!(count = users.len(), "User ledger loaded");
        Ok(Self {
            storage,
            users: RwLock::new(users),
        })
    }

    /// All users in registration order.
    pub async fn users(&self) -> Vec<AppUser> {
        self.users.read().await.clone()
    }

    /// Number of registered users.
    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Look up a user.
    pub async fn get(&self, email: &Email) -> Option<AppUser> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.email == *email)
            .cloned()
    }

    /// Returns `true` if the user exists and is banned.
    pub async fn is_banned(&self, email: &Email) -> bool {
        self.get(email).await.is_some_and(|u| u.is_banned)
    }

    /// Return the existing user, or register a new one with no spend.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Storage` if the new user cannot be persisted.
    pub async fn register_if_absent(&self, email: &Email, is_admin: bool) -> Result<AppUser> {
        self.mutate(email, |users| {
            if let Some(user) = users.iter().find(|u| u.email == *email) {
                return Ok((user.clone(), false));
            }
            let user = AppUser::new(email.clone(), is_admin);
            users.push(user.clone());
            tracing::info!(email = %email, is_admin, "User registered");
            Ok((user, true))
        })
        .await
    }

    /// Add `amount` to the user's aggregate, registering the user if needed.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Validation` if the new total is out of range, or
    /// `ShopError::Storage` if the change cannot be persisted.
    pub async fn record_spend(&self, email: &Email, amount: Price) -> Result<AppUser> {
        self.mutate(email, |users| {
            let index = match users.iter().position(|u| u.email == *email) {
                Some(index) => index,
                None => {
                    users.push(AppUser::new(email.clone(), false));
                    users.len() - 1
                }
            };
            let user = users
                .get_mut(index)
                .ok_or_else(|| not_found(email))?;
            user.total_spent = user.total_spent.checked_add(amount).ok_or_else(|| {
                ShopError::Validation(format!("total spend for {email} is out of range"))
            })?;
            tracing::info!(email = %email, amount = %amount, total = %user.total_spent, "Spend recorded");
            Ok((user.clone(), true))
        })
        .await
    }

    /// Ban or unban a user.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::EntityNotFound` for an unknown user, or
    /// `ShopError::Storage` if the change cannot be persisted.
    pub async fn set_banned(&self, email: &Email, banned: bool) -> Result<AppUser> {
        self.mutate(email, |users| {
            let user = users
                .iter_mut()
                .find(|u| u.email == *email)
                .ok_or_else(|| not_found(email))?;
            let changed = user.is_banned != banned;
            user.is_banned = banned;
            Ok((user.clone(), changed))
        })
        .await
    }

    /// Run `f` on a copy of the collection; persist and swap it in when `f`
    /// reports a change.
    async fn mutate(
        &self,
        email: &Email,
        f: impl FnOnce(&mut Vec<AppUser>) -> Result<(AppUser, bool)>,
    ) -> Result<AppUser> {
        let mut guard = self.users.write().await;
        let mut next = guard.clone();
        let (user, changed) = f(&mut next)?;
        if changed {
            save_json(self.storage.as_ref(), keys::APP_USERS, &next)
                .await
                .inspect_err(|e| tracing::error!(email = %email, error = %e, "Ledger write failed"))?;
            *guard = next;
        }
        Ok(user)
    }
}

fn not_found(email: &Email) -> ShopError {
    ShopError::EntityNotFound {
        kind: "user",
        id: email.to_string(),
    }
}
