//! Shop configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TOPUP_ADMIN_EMAIL` - Email that is granted the admin flag on first login
//!
//! ## Optional
//! - `TOPUP_DATA_DIR` - Directory holding the persisted collections (default: `.topup`)
//! - `TOPUP_VERIFICATION_DELAY_MS` - Simulated payment verification round trip (default: 800)
//! - `TOPUP_EMAIL_DELAY_MS` - Simulated email delivery round trip (default: 1000)
//! - `TOPUP_NOTIFY_MAX_ATTEMPTS` - Delivery attempts per notification (default: 3)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use topup_core::Email;

const DEFAULT_DATA_DIR: &str = ".topup";
const DEFAULT_VERIFICATION_DELAY_MS: &str = "800";
const DEFAULT_EMAIL_DELAY_MS: &str = "1000";
const DEFAULT_NOTIFY_MAX_ATTEMPTS: &str = "3";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Shop configuration.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Email granted the admin flag when it first logs in.
    pub admin_email: Email,
    /// Directory for file-backed storage.
    pub data_dir: PathBuf,
    /// Simulated payment verification round trip before an order is stored.
    pub verification_delay: Duration,
    /// Delivery retry policy for notifications.
    pub notify: NotifyConfig,
}

/// Notification delivery configuration.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Attempts per notifier before the event is dropped (at least 1).
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub retry_delay: Duration,
    /// Simulated email delivery round trip.
    pub email_delay: Duration,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_millis(200),
            email_delay: Duration::from_millis(1000),
        }
    }
}

impl ShopConfig {
    /// Configuration with production defaults for everything but the admin email.
    #[must_use]
    pub fn new(admin_email: Email) -> Self {
        Self {
            admin_email,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            verification_delay: Duration::from_millis(800),
            notify: NotifyConfig::default(),
        }
    }

    /// Configuration with every simulated delay removed, for tests and tooling.
    #[must_use]
    pub fn without_delays(admin_email: Email) -> Self {
        Self {
            verification_delay: Duration::ZERO,
            notify: NotifyConfig {
                retry_delay: Duration::ZERO,
                email_delay: Duration::ZERO,
                ..NotifyConfig::default()
            },
            ..Self::new(admin_email)
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let admin_email = lookup("TOPUP_ADMIN_EMAIL")
            .ok_or_else(|| ConfigError::MissingEnvVar("TOPUP_ADMIN_EMAIL".to_string()))?;
        let admin_email = Email::parse(&admin_email).map_err(|e| {
            ConfigError::InvalidEnvVar("TOPUP_ADMIN_EMAIL".to_string(), e.to_string())
        })?;

        let data_dir = PathBuf::from(
            lookup("TOPUP_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
        );
        let verification_delay = Duration::from_millis(parse_or_default(
            &lookup,
            "TOPUP_VERIFICATION_DELAY_MS",
            DEFAULT_VERIFICATION_DELAY_MS,
        )?);
        let email_delay = Duration::from_millis(parse_or_default(
            &lookup,
            "TOPUP_EMAIL_DELAY_MS",
            DEFAULT_EMAIL_DELAY_MS,
        )?);
        let max_attempts: u32 = parse_or_default(
            &lookup,
            "TOPUP_NOTIFY_MAX_ATTEMPTS",
            DEFAULT_NOTIFY_MAX_ATTEMPTS,
        )?;
        if max_attempts == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "TOPUP_NOTIFY_MAX_ATTEMPTS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            admin_email,
            data_dir,
            verification_delay,
            notify: NotifyConfig {
                max_attempts,
                email_delay,
                ..NotifyConfig::default()
            },
        })
    }
}

fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .unwrap_or_else(|| default.to_string())
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
