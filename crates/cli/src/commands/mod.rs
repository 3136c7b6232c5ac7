//! Command implementations.
//!
//! Every command opens the shop on the configured data directory, runs one
//! facade operation and prints the result to stdout. Logs go to stderr.

pub mod account;
pub mod catalog;
pub mod order;

use std::sync::Arc;

use thiserror::Error;
use topup_shop::{ConfigError, FileStorage, Shop, ShopConfig, ShopError};

/// The shop as the CLI runs it.
pub type CliShop = Shop<FileStorage>;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A shop operation failed.
    #[error(transparent)]
    Shop(#[from] ShopError),

    /// Output could not be encoded.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Open the shop from environment configuration.
///
/// # Errors
///
/// Returns `CliError` if configuration is invalid or a collection cannot be loaded.
pub async fn open_shop() -> Result<CliShop, CliError> {
    let config = ShopConfig::from_env()?;
    tracing::debug!(data_dir = %config.data_dir.display(), "Opening shop");
    let storage = Arc::new(FileStorage::new(config.data_dir.clone()));
    Ok(Shop::open(config, storage).await?)
}
