/*!
 * Tests for application configuration
 */

use anyhow::Result;
use std::fs;
use std::time::Duration;
use srtbatch::app_config::{Config, SplitFailurePolicy, TranslationProvider};
use crate::common;

#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config.source_language, "auto");
    assert_eq!(config.target_language, "si");
    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.translation.batching, config.translation.batching);
    Ok(())
}

#[test]
fn test_load_or_create_withCustomFile_shouldReadOverrides() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{
            "target_language": "ja",
            "translation": {
                "batch_timeout_secs": 30,
                "retry": { "max_attempts": 5, "base_delay_ms": 100 },
                "split_failure": "tagged"
            },
            "output": { "force_overwrite": true }
        }"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.target_language, "ja");
    assert_eq!(config.translation.provider, TranslationProvider::Google);
    assert_eq!(config.translation.provider.to_string(), "google");
    assert_eq!(config.translation.batch_timeout(), Duration::from_secs(30));
    assert_eq!(config.translation.retry.max_attempts, 5);
    assert_eq!(config.translation.split_failure, SplitFailurePolicy::Tagged);
    assert!(config.output.force_overwrite);
    assert!(config.validate().is_ok());
    Ok(())
}

#[test]
fn test_load_or_create_withBrokenJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");
    fs::write(&path, "{ not json")?;
    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

#[test]
fn test_validate_withBadValues_shouldFail() {
    let mut config = Config::default();
    config.translation.retry.max_attempts = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.translation.batch_timeout_secs = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.target_language = "xx".to_string();
    assert!(config.validate().is_err());
}
