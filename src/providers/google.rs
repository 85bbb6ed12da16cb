/*!
 * Google translate web endpoint.
 *
 * Speaks the keyless `translate_a/single` protocol: the text goes in a form
 * field and the reply is a nested JSON array whose first element lists the
 * translated sentences.
 */

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::app_config::TranslationConfig;
use crate::errors::ProviderError;
use crate::providers::TranslationBackend;

/// Client for the Google translate web endpoint
#[derive(Debug)]
pub struct GoogleTranslate {
    /// Endpoint URL, without query parameters
    endpoint: String,
    /// HTTP client for making requests
    client: Client,
}

impl GoogleTranslate {
    /// Create a new client with a per-request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::builder()
                .timeout(timeout)
                .pool_idle_timeout(Duration::from_secs(90))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Create a client from the translation section of the config
    pub fn from_config(config: &TranslationConfig) -> Self {
        Self::new(config.endpoint.clone(), config.request_timeout())
    }

    /// Build the request URL for a language pair
    pub fn request_url(&self, source_language: &str, target_language: &str) -> Result<Url, ProviderError> {
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("client", "gtx"),
                ("sl", source_language),
                ("tl", target_language),
                ("dt", "t"),
            ],
        )
        .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint {}: {}", self.endpoint, e)))
    }

    /// Concatenate the translated sentences of a response.
    ///
    /// The reply looks like `[[["Bonjour","Hello",...],["le monde","world",...]],null,"en",...]`.
    pub fn extract_text(body: &Value) -> Result<String, ProviderError> {
        let sentences = body
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::ParseError("Missing sentence list".to_string()))?;

        Ok(sentences
            .iter()
            .filter_map(|sentence| sentence.get(0).and_then(Value::as_str))
            .collect())
    }
}

#[async_trait]
impl TranslationBackend for GoogleTranslate {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let url = self.request_url(source_language, target_language)?;
        debug!("Google request: {} chars, {} -> {}", text.chars().count(), source_language, target_language);

        let response = self
            .client
            .post(url)
            .form(&[("q", text)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimitExceeded(format!("Google answered {}", status)));
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Google translate error ({}): {}", status, message);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Self::extract_text(&body)
    }

    fn name(&self) -> &str {
        "google"
    }
}
