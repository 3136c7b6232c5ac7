//! Top-up shop core - shared types library.
//!
//! This crate provides the types used across all top-up shop components:
//! - `shop` - Order lifecycle, ledger, catalog and notification dispatch
//! - `cli` - Command-line front end for buyers and administrators
//!
//! # Architecture
//!
//! The core crate contains only types and pure rules - no I/O, no storage,
//! no async runtime. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, money and statuses, plus the
//!   persisted domain records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
