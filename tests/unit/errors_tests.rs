/*!
 * Tests for error types
 */

use std::error::Error;
use std::time::Duration;
use srtbatch::errors::{AppError, ProviderError, TranslationError};

#[test]
fn test_backend_error_shouldExposeProviderSource() {
    let error = TranslationError::Backend {
        attempts: 3,
        source: ProviderError::RateLimitExceeded("slow down".to_string()),
    };
    let source = error.source().map(|s| s.to_string()).unwrap_or_default();
    assert!(source.contains("slow down"));
    assert!(error.to_string().contains("3 attempt"));
}

#[test]
fn test_translation_error_shouldConvertIntoAppError() {
    let app: AppError = TranslationError::Timeout(Duration::from_secs(180)).into();
    assert!(matches!(app, AppError::Translation(TranslationError::Timeout(_))));
}

#[test]
fn test_anyhow_error_shouldConvertIntoUnknown() {
    let app: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(app, AppError::Unknown(ref message) if message == "boom"));
}
