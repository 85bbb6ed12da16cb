/*!
 * Common test utilities for the srtbatch test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use anyhow::Result;
use tempfile::TempDir;

use srtbatch::app_config::Config;
use srtbatch::subtitle_processor::{Cue, SubtitleDocument};

static INIT_LOGGING: Once = Once::new();

/// Route library logs to the test output
pub fn init_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Three-cue subtitle content, the middle cue has no text
pub const SAMPLE_SRT: &str = "1
00:00:01,000 --> 00:00:04,000
Hello

2
00:00:05,000 --> 00:00:09,000

3
00:00:10,000 --> 00:00:14,000
World
";

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_SRT)
}

/// Build SRT content with one cue per text
pub fn srt_content(texts: &[&str]) -> String {
    sample_document(texts).to_srt_string()
}

/// Build an in-memory document with one cue per text, numbered from 1
pub fn sample_document(texts: &[&str]) -> SubtitleDocument {
    let cues = texts
        .iter()
        .enumerate()
        .map(|(i, text)| Cue::new(i + 1, (i as u64) * 3000, (i as u64) * 3000 + 2500, *text))
        .collect();
    SubtitleDocument::new(PathBuf::from("sample.srt"), cues)
}

/// Default config targeting `target_language`, with millisecond retry delays
pub fn test_config(target_language: &str) -> Config {
    let mut config = Config::default();
    config.target_language = target_language.to_string();
    config.translation.retry.base_delay_ms = 1;
    config
}
