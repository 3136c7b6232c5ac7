//! Core types for the top-up shop.
//!
//! This module provides type-safe wrappers for common domain concepts and the
//! records persisted by the shop.

pub mod catalog;
pub mod email;
pub mod id;
pub mod notification;
pub mod order;
pub mod price;
pub mod status;
pub mod user;

pub use catalog::{Banner, Category, Product, ProductKind, StoreSettings};
pub use email::{Email, EmailError};
pub use id::*;
pub use notification::AppNotification;
pub use order::Order;
pub use price::Price;
pub use status::*;
pub use user::AppUser;
