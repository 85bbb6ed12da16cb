/*!
 * Mock backend implementations for testing.
 *
 * This module provides scripted backends that simulate different behaviors:
 * - `MockBackend::echo()` - Returns the input unchanged
 * - `MockBackend::uppercase()` - Returns the input uppercased
 * - `MockBackend::fail_times(n)` - Fails n times, then echoes
 * - `MockBackend::failing()` - Always fails with an error
 * - `MockBackend::hanging()` - Never answers
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::TranslationBackend;

/// Behavior mode for the mock backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Returns the text unchanged
    Echo,
    /// Returns the text uppercased
    Uppercase,
    /// Fails the first `failures` calls, then echoes
    FailTimes { failures: usize },
    /// Always fails with an error
    Failing,
    /// Returns an empty string
    Empty,
    /// Echoes after a delay
    Slow { delay_ms: u64 },
    /// Never returns
    Hanging,
    /// Mangles batch markers so the response no longer splits
    CorruptDelimiters,
}

/// Mock backend for testing translation behavior
#[derive(Debug)]
pub struct MockBackend {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of translate calls made
    call_count: Arc<AtomicUsize>,
    /// Calls currently running
    in_flight: Arc<AtomicUsize>,
    /// Highest number of simultaneous calls seen
    max_in_flight: Arc<AtomicUsize>,
    /// Texts received, in call order
    requests: Arc<Mutex<Vec<String>>>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&str) -> String>,
}

/// Decrements the in-flight counter even when the call is cancelled
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockBackend {
    /// Create a new mock backend with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    pub fn uppercase() -> Self {
        Self::new(MockBehavior::Uppercase)
    }

    pub fn fail_times(failures: usize) -> Self {
        Self::new(MockBehavior::FailTimes { failures })
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    pub fn hanging() -> Self {
        Self::new(MockBehavior::Hanging)
    }

    pub fn corrupt_delimiters() -> Self {
        Self::new(MockBehavior::CorruptDelimiters)
    }

    /// Set a custom response generator used by the echo-style behaviors
    pub fn with_custom_response(mut self, generator: fn(&str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of translate calls made so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Highest number of calls that were running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Texts received so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn respond(&self, text: &str) -> String {
        match self.custom_response {
            Some(generator) => generator(text),
            None => text.to_string(),
        }
    }
}

impl Clone for MockBackend {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            call_count: Arc::clone(&self.call_count),
            in_flight: Arc::clone(&self.in_flight),
            max_in_flight: Arc::clone(&self.max_in_flight),
            requests: Arc::clone(&self.requests),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl TranslationBackend for MockBackend {
    async fn translate(
        &self,
        text: &str,
        _source_language: &str,
        _target_language: &str,
    ) -> Result<String, ProviderError> {
        let count = self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(text.to_string());
        }

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlightGuard(Arc::clone(&self.in_flight));
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Echo => Ok(self.respond(text)),
            MockBehavior::Uppercase => Ok(text.to_uppercase()),
            MockBehavior::FailTimes { failures } => {
                if count < failures {
                    Err(ProviderError::ConnectionError(format!("simulated failure {}", count + 1)))
                } else {
                    Ok(self.respond(text))
                }
            }
            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 503,
                message: "simulated outage".to_string(),
            }),
            MockBehavior::Empty => Ok(String::new()),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(self.respond(text))
            }
            MockBehavior::Hanging => {
                std::future::pending::<()>().await;
                Ok(String::new())
            }
            MockBehavior::CorruptDelimiters => Ok(text.replace("||---", "").replace("---||", "")),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
