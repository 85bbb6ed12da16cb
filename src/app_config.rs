use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code, or "auto" to let the backend detect it
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Where and how translated files are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation backend type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google translate web endpoint
    #[default]
    Google,
}

impl std::fmt::Display for TranslationProvider {
    // @returns: Lowercase provider identifier, as written in conf.json
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Google => write!(f, "google"),
        }
    }
}

/// Batch size and worker count for one script class
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct BatchProfileConfig {
    /// Cues per backend request
    pub batch_size: usize,

    /// Batches in flight at once for a single file
    pub workers: usize,
}

/// Batching policy
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BatchingConfig {
    /// Profile for ordinary target languages
    #[serde(default = "default_standard_profile")]
    pub standard: BatchProfileConfig,

    /// Profile for complex-script target languages
    #[serde(default = "default_complex_script_profile")]
    pub complex_script: BatchProfileConfig,

    /// Primary language subtags treated as complex-script targets
    #[serde(default = "default_complex_script_languages")]
    pub complex_script_languages: Vec<String>,
}

impl Default for BatchingConfig {
    fn default() -> Self {
        Self {
            standard: default_standard_profile(),
            complex_script: default_complex_script_profile(),
            complex_script_languages: default_complex_script_languages(),
        }
    }
}

/// Retry policy for backend calls
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts per batch, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt, doubled for each further attempt
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

/// What cues of a batch become when the translated blob does not split cleanly
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplitFailurePolicy {
    /// Keep the source text of every cue in the batch
    #[default]
    Source,
    /// Replace every cue in the batch with a tagged copy of its cleaned text
    Tagged,
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation backend to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Backend endpoint URL
    #[serde(default = "default_google_endpoint")]
    pub endpoint: String,

    /// HTTP timeout for a single backend request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Wait bound for a whole batch, retries included
    #[serde(default = "default_batch_timeout_secs")]
    pub batch_timeout_secs: u64,

    #[serde(default)]
    pub batching: BatchingConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub split_failure: SplitFailurePolicy,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            endpoint: default_google_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
            batch_timeout_secs: default_batch_timeout_secs(),
            batching: BatchingConfig::default(),
            retry: RetryConfig::default(),
            split_failure: SplitFailurePolicy::default(),
        }
    }
}

impl TranslationConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn batch_timeout(&self) -> Duration {
        Duration::from_secs(self.batch_timeout_secs)
    }
}

/// Output settings
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct OutputConfig {
    /// Folder for translated files; next to each input when unset
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Overwrite translated files that already exist
    #[serde(default)]
    pub force_overwrite: bool,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "auto".to_string()
}

fn default_target_language() -> String {
    "si".to_string()
}

fn default_google_endpoint() -> String {
    "https://translate.googleapis.com/translate_a/single".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_batch_timeout_secs() -> u64 {
    180
}

fn default_standard_profile() -> BatchProfileConfig {
    BatchProfileConfig { batch_size: 15, workers: 5 }
}

fn default_complex_script_profile() -> BatchProfileConfig {
    BatchProfileConfig { batch_size: 5, workers: 3 }
}

fn default_complex_script_languages() -> Vec<String> {
    ["zh", "ja", "ko", "th", "vi"].iter().map(|s| s.to_string()).collect()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    2000 // doubled on each retry
}

impl Config {
    /// Load the config file, or write a default one when it does not exist yet
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        language_utils::resolve_source_language(&self.source_language)?;
        language_utils::resolve_target_language(&self.target_language)?;

        let translation = &self.translation;
        if translation.endpoint.trim().is_empty() {
            return Err(anyhow!("Translation endpoint cannot be empty"));
        }
        if translation.request_timeout_secs == 0 || translation.batch_timeout_secs == 0 {
            return Err(anyhow!("Timeouts must be greater than zero"));
        }
        if translation.retry.max_attempts == 0 {
            return Err(anyhow!("retry.max_attempts must be at least 1"));
        }

        let batching = &translation.batching;
        for (name, profile) in [("standard", batching.standard), ("complex_script", batching.complex_script)] {
            if profile.batch_size == 0 || profile.workers == 0 {
                return Err(anyhow!("Batch profile '{}' needs batch_size and workers of at least 1", name));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
