/*!
 * Tests for subtitle parsing and writing
 */

use anyhow::Result;
use srtbatch::errors::SubtitleError;
use srtbatch::subtitle_processor::{Cue, SubtitleDocument};
use crate::common;

/// Test that timing lines are parsed and formatted back unchanged
#[test]
fn test_timing_line_withCommaOrDot_shouldParseAndFormat() -> Result<()> {
    let cues = SubtitleDocument::parse_srt_string("1\n01:23:45.678 --> 01:23:46,000\nHi\n")?;
    assert_eq!(cues[0].start_ms, 5025678);
    assert_eq!(Cue::format_timestamp(cues[0].start_ms), "01:23:45,678");
    Ok(())
}

/// Test that non-sequential numbering and empty cues survive parsing
#[test]
fn test_parse_withGapsAndEmptyCue_shouldKeepNumberingAndOrder() -> Result<()> {
    let content = "5\n00:00:01,000 --> 00:00:02,000\nFirst\n\n9\n00:00:03,000 --> 00:00:04,000\n\n12\n00:00:05,000 --> 00:00:06,500\nLine one\nLine two\n";
    let cues = SubtitleDocument::parse_srt_string(content)?;

    assert_eq!(cues.len(), 3);
    assert_eq!(cues.iter().map(|c| c.index).collect::<Vec<_>>(), vec![5, 9, 12]);
    assert_eq!(cues[1].text, "");
    assert_eq!(cues[2].text, "Line one\nLine two");
    assert_eq!(cues[2].end_ms, 6500);
    Ok(())
}

/// Test BOM and CRLF handling
#[test]
fn test_parse_withBomAndCrlf_shouldParseCleanly() -> Result<()> {
    let content = "\u{feff}1\r\n00:00:01,000 --> 00:00:02,000\r\nHello\r\n\r\n2\r\n00:00:03,000 --> 00:00:04,000\r\nWorld\r\n";
    let cues = SubtitleDocument::parse_srt_string(content)?;
    assert_eq!(cues.len(), 2);
    assert_eq!(cues[0].index, 1);
    assert_eq!(cues[1].text, "World");
    Ok(())
}

/// Test that a block with a broken timing line is skipped
#[test]
fn test_parse_withBrokenTiming_shouldSkipBlock() -> Result<()> {
    let content = "1\nnot a timing line\nLost\n\n2\n00:00:03,000 --> 00:00:04,000\nKept\n";
    let cues = SubtitleDocument::parse_srt_string(content)?;
    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "Kept");
    Ok(())
}

/// Test that content without cues is rejected
#[test]
fn test_parse_withNoCues_shouldFail() {
    let result = SubtitleDocument::parse_srt_string("just some text\n");
    assert!(matches!(result, Err(SubtitleError::NoCues)));
}

/// Test that a cue ending before it starts is rejected
#[test]
fn test_parse_withReversedTimes_shouldFail() {
    let content = "1\n00:00:05,000 --> 00:00:01,000\nBackwards\n";
    let result = SubtitleDocument::parse_srt_string(content);
    assert!(matches!(result, Err(SubtitleError::InvalidTimeRange { index: 1, .. })));
}

/// Test writing and reading back a document with an empty cue
#[test]
fn test_write_then_read_withEmptyCue_shouldBeIdentical() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out.srt");
    let document = common::sample_document(&["Hello", "", "<i>World</i>"]);

    document.write_to_srt(&path)?;
    let reloaded = SubtitleDocument::from_file(&path)?;

    assert_eq!(reloaded.cues, document.cues);
    Ok(())
}

/// Test that non UTF-8 input is reported, not guessed
#[test]
fn test_from_file_withLatin1Bytes_shouldReportInvalidUtf8() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("latin1.srt");
    std::fs::write(&path, b"1\n00:00:01,000 --> 00:00:02,000\nCaf\xe9\n")?;

    let result = SubtitleDocument::from_file(&path);
    assert!(matches!(result, Err(SubtitleError::InvalidUtf8 { .. })));
    Ok(())
}
