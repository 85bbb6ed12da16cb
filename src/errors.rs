/*!
 * Error types for the srtbatch application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling a translation backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The backend answered with nothing usable
    #[error("Translation returned an empty response")]
    EmptyResponse,
}

/// Errors that can occur while loading or parsing a subtitle file
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid UTF-8
    #[error("{path} is not valid UTF-8 (convert it first)")]
    InvalidUtf8 { path: PathBuf },

    /// A cue ends before it starts
    #[error("Invalid time range for cue {index}: end {end_ms}ms < start {start_ms}ms")]
    InvalidTimeRange {
        index: usize,
        start_ms: u64,
        end_ms: u64,
    },

    /// Nothing that looks like a cue was found
    #[error("No subtitle cues were found")]
    NoCues,
}

/// Batch-level translation failures.
///
/// None of these escape a run: the executor turns them into fallbacks and
/// reports them as status messages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    /// The backend kept failing until the retry budget ran out
    #[error("backend failed after {attempts} attempt(s): {source}")]
    Backend {
        attempts: u32,
        #[source]
        source: ProviderError,
    },

    /// The translated blob did not split back into one segment per cue
    #[error("split mismatch: got {actual} segment(s), expected {expected}")]
    Split { expected: usize, actual: usize },

    /// The batch did not finish within its wait bound
    #[error("batch timed out after {0:?}")]
    Timeout(Duration),
}

impl TranslationError {
    /// Stable label for the error class, used in logs and status lines
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Backend { .. } => "backend",
            Self::Split { .. } => "split",
            Self::Timeout(_) => "timeout",
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// A run was started without any input file
    #[error("No input files were given")]
    NoInputFiles,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
