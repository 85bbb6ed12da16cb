/*!
 * Retry with exponential backoff for backend calls.
 */

use log::debug;
use std::time::Duration;

use crate::app_config::RetryConfig;
use crate::errors::{ProviderError, TranslationError};
use crate::providers::TranslationBackend;

/// How often and how patiently a backend call is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, at least 1
    pub max_attempts: u32,
    /// Delay after the first failure; doubled after each further failure
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay to wait after the failed attempt number `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Call the backend until it returns non-empty text or attempts run out
    pub async fn translate(
        &self,
        backend: &dyn TranslationBackend,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let mut last_error = ProviderError::EmptyResponse;

        for attempt in 0..self.max_attempts {
            match backend.translate(text, source_language, target_language).await {
                Ok(translated) if !translated.trim().is_empty() => return Ok(translated),
                Ok(_) => last_error = ProviderError::EmptyResponse,
                Err(e) => last_error = e,
            }

            if attempt + 1 < self.max_attempts {
                let delay = self.delay_for(attempt);
                debug!(
                    "Attempt {}/{} failed ({}), retrying in {:?}",
                    attempt + 1,
                    self.max_attempts,
                    last_error,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
        }

        Err(TranslationError::Backend {
            attempts: self.max_attempts,
            source: last_error,
        })
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(config: RetryConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_millis(config.base_delay_ms))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryConfig::default().into()
    }
}
