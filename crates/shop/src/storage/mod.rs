//! Persistence of named collections.
//!
//! Every collection is stored under a single key as one JSON document. The
//! shop never reads partial documents: a collection is loaded once at startup
//! and rewritten whole after each committed mutation.
//!
//! # Keys
//!
//! - `orders` - Order records, newest first
//! - `products` - Catalog products (seeded when absent)
//! - `settings` - Store settings (seeded when absent)
//! - `banners` - Home-page banners (seeded when absent)
//! - `app_users` - Users and their spend aggregate
//! - `notifications` - In-app alerts

mod file;
mod memory;

use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Storage keys, one per collection.
pub mod keys {
    pub const ORDERS: &str = "orders";
    pub const PRODUCTS: &str = "products";
    pub const SETTINGS: &str = "settings";
    pub const BANNERS: &str = "banners";
    pub const APP_USERS: &str = "app_users";
    pub const NOTIFICATIONS: &str = "notifications";
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("I/O error on {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A stored document could not be encoded or decoded.
    #[error("serialization error on {key}: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A key/value store of structured-text documents.
///
/// Implementations must make `save` atomic per key: after it returns `Ok`, a
/// subsequent `load` of the same key observes the whole new document, and after
/// it returns `Err` the previous document is still intact.
pub trait Storage: Send + Sync + 'static {
    /// Load the raw document stored under `key`, or `None` if absent.
    fn load(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Replace the document stored under `key`.
    fn save(&self, key: &str, value: &str)
    -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Load and decode the collection stored under `key`.
///
/// # Errors
///
/// Returns `StorageError` if the backend fails or the document is malformed.
pub async fn load_json<S, T>(storage: &S, key: &str) -> Result<Option<T>, StorageError>
where
    S: Storage,
    T: DeserializeOwned,
{
    let Some(raw) = storage.load(key).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Serialization {
            key: key.to_string(),
            source,
        })
}

/// Encode and store `value` under `key`.
///
/// # Errors
///
/// Returns `StorageError` if encoding or the backend fails.
pub async fn save_json<S, T>(storage: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    S: Storage,
    T: Serialize + ?Sized + Sync,
{
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialization {
        key: key.to_string(),
        source,
    })?;
    storage.save(key, &raw).await?;
    tracing::debug!(key, bytes = raw.len(), "Collection saved");
    Ok(())
}
