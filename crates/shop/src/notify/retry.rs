//! Bounded retry with exponential backoff for a single channel.

use std::time::Duration;

use tokio::time::sleep;

use super::{Notification, Notifier, NotifyError};
use crate::config::NotifyConfig;

/// Retries a notifier on retryable errors.
///
/// The delay starts at `initial_delay` and doubles after every failed attempt.
/// Delivery is at-least-once: a channel that succeeded but reported an error
/// may see the same notification again.
#[derive(Debug, Clone)]
pub struct Retrying<N> {
    inner: N,
    max_attempts: u32,
    initial_delay: Duration,
}

impl<N> Retrying<N> {
    /// Wrap `inner`. `max_attempts` is clamped to at least one.
    #[must_use]
    pub fn new(inner: N, max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            initial_delay,
        }
    }

    /// Wrap `inner` with the configured policy.
    #[must_use]
    pub fn from_config(inner: N, config: &NotifyConfig) -> Self {
        Self::new(inner, config.max_attempts, config.retry_delay)
    }

    /// The wrapped notifier.
    #[must_use]
    pub const fn inner(&self) -> &N {
        &self.inner
    }
}

impl<N: Notifier> Notifier for Retrying<N> {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut delay = self.initial_delay;
        let mut attempt = 1;
        loop {
            match self.inner.notify(notification).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < self.max_attempts && e.is_retryable() => {
                    tracing::warn!(
                        kind = %notification.kind,
                        order_id = %notification.order.id,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Notification attempt failed, retrying"
                    );
                    sleep(delay).await;
                    delay = delay.saturating_mul(2);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
