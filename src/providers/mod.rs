/*!
 * Translation backends.
 *
 * The pipeline only needs one operation from a backend: translate a string
 * between two languages. Backends are treated as unreliable; retries,
 * timeouts and fallbacks live in the translation executor.
 *
 * - `google`: the public Google translate web endpoint
 * - `mock`: scripted backends for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all translation backends
#[async_trait]
pub trait TranslationBackend: Send + Sync + Debug {
    /// Translate `text` from `source_language` (a code or "auto") to `target_language`
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text, possibly empty, or an error
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError>;

    /// Short name used in logs
    fn name(&self) -> &str;
}

pub mod google;
pub mod mock;
