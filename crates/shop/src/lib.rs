//! Top-up shop library.
//!
//! Order lifecycle, user spend ledger, catalog and notification dispatch for a
//! game top-up store. Buyers submit a payment reference for a catalog pack;
//! administrators verify it out of band and move the order to `completed` or
//! `cancelled`.
//!
//! Everything goes through [`Shop`], which is generic over its [`Storage`]
//! backend and its [`Notifier`]:
//!
//! - [`storage`] - Named JSON collections on disk or in memory
//! - [`orders`] - The order collection and the pure lifecycle rules
//! - [`ledger`] - Users and their spend aggregate
//! - [`catalog`] - Products, categories, settings and banners
//! - [`notify`] - Email and in-app notifications on background tasks

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod ledger;
pub mod notify;
pub mod orders;
mod shop;
pub mod storage;

pub use config::{ConfigError, NotifyConfig, ShopConfig};
pub use error::{Result, ShopError};
pub use notify::{Notifier, StandardNotifier};
pub use orders::OrderFilter;
pub use orders::lifecycle::OrderRequest;
pub use shop::{Shop, Stats};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
