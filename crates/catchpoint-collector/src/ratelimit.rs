//! Fixed-delay pacing for outbound API calls.

use std::time::Duration;

/// Enforces a minimum interval between upstream requests. A zero delay is a
/// valid no-op configuration; there is no jitter and no backoff.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    delay: Duration,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_secs(delay_secs: u64) -> Self {
        Self::new(Duration::from_secs(delay_secs))
    }

    /// Sleeps for the configured delay before the caller issues its next
    /// request. Cannot fail.
    pub async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
