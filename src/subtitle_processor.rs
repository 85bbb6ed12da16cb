use std::collections::HashSet;
use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Context, Result};
use log::{debug, warn};

use crate::errors::SubtitleError;

// @module: SRT parsing, cue model and serialization

// @const: SRT timing line regex, accepts ',' or '.' before milliseconds
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d{1,2}):(\d{2}):(\d{2})[,.](\d{3})").unwrap()
});

// @struct: Single timed caption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    // @field: 1-based sequence number as written in the file
    pub index: usize,

    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,

    // @field: Caption text, lines joined with '\n'
    pub text: String,
}

impl Cue {
    pub fn new(index: usize, start_ms: u64, end_ms: u64, text: impl Into<String>) -> Self {
        Cue {
            index,
            start_ms,
            end_ms,
            text: text.into(),
        }
    }

    // @creates: Cue with checked time range
    // @validates: start <= end
    pub fn new_validated(index: usize, start_ms: u64, end_ms: u64, text: impl Into<String>) -> Result<Self, SubtitleError> {
        if end_ms < start_ms {
            return Err(SubtitleError::InvalidTimeRange { index, start_ms, end_ms });
        }
        Ok(Self::new(index, start_ms, end_ms, text))
    }

    /// Same timing and index, different text
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Cue {
            text: text.into(),
            ..self.clone()
        }
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(
            f,
            "{} --> {}",
            Self::format_timestamp(self.start_ms),
            Self::format_timestamp(self.end_ms)
        )?;
        if !self.text.is_empty() {
            writeln!(f, "{}", self.text)?;
        }
        writeln!(f)
    }
}

/// Ordered sequence of cues loaded from one file
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleDocument {
    /// Where the document was read from
    pub source_file: PathBuf,

    /// Cues in file order
    pub cues: Vec<Cue>,
}

impl SubtitleDocument {
    pub fn new(source_file: PathBuf, cues: Vec<Cue>) -> Self {
        SubtitleDocument { source_file, cues }
    }

    /// Load and parse a UTF-8 SRT file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| SubtitleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content = String::from_utf8(bytes).map_err(|_| SubtitleError::InvalidUtf8 {
            path: path.to_path_buf(),
        })?;

        let cues = Self::parse_srt_string(&content)?;
        debug!("Parsed {} cues from {}", cues.len(), path.display());
        Ok(Self::new(path.to_path_buf(), cues))
    }

    /// Serialize back to SRT text
    pub fn to_srt_string(&self) -> String {
        self.cues.iter().map(|cue| cue.to_string()).collect()
    }

    /// Write the document as UTF-8 SRT
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;

        for cue in &self.cues {
            write!(file, "{}", cue)
                .with_context(|| format!("Failed to write subtitle file: {}", path.display()))?;
        }

        Ok(())
    }

    /// Parse SRT content into cues.
    ///
    /// Blocks keep their file order and numbering. A block whose text is empty is
    /// kept as an empty cue. Duplicate cue numbers are kept but logged. Blocks with a broken timing line are skipped with a
    /// warning; content without a single usable block is an error.
    pub fn parse_srt_string(content: &str) -> Result<Vec<Cue>, SubtitleError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut cues = Vec::new();

        let mut current_index: Option<usize> = None;
        let mut current_times: Option<(u64, u64)> = None;
        let mut current_text: Vec<&str> = Vec::new();
        let mut skipping = false;
        let mut seen_indices = HashSet::new();

        let mut finish = |index: Option<usize>, times: Option<(u64, u64)>, text: &mut Vec<&str>| -> Result<(), SubtitleError> {
            if let (Some(index), Some((start_ms, end_ms))) = (index, times) {
                cues.push(Cue::new_validated(index, start_ms, end_ms, text.join("\n"))?);
            }
            text.clear();
            Ok(())
        };

        for (line_no, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim_end();
            let trimmed = line.trim();

            if trimmed.is_empty() {
                // A blank line always closes the current block
                finish(current_index.take(), current_times.take(), &mut current_text)?;
                skipping = false;
                continue;
            }

            if skipping {
                continue;
            }

            match (current_index, current_times) {
                (None, _) => match trimmed.parse::<usize>() {
                    Ok(index) => {
                        if !seen_indices.insert(index) {
                            warn!("Duplicate cue number {} at line {}", index, line_no + 1);
                        }
                        current_index = Some(index);
                    }
                    Err(_) => {
                        warn!("Unexpected text at line {} before a cue number: {}", line_no + 1, trimmed);
                        skipping = true;
                    }
                },
                (Some(index), None) => match Self::parse_timing_line(trimmed) {
                    Some(times) => current_times = Some(times),
                    None => {
                        warn!("Skipping cue {}: bad timing line at line {}: {}", index, line_no + 1, trimmed);
                        current_index = None;
                        skipping = true;
                    }
                },
                (Some(_), Some(_)) => current_text.push(line),
            }
        }

        finish(current_index.take(), current_times.take(), &mut current_text)?;

        if cues.is_empty() {
            return Err(SubtitleError::NoCues);
        }

        Ok(cues)
    }

    fn parse_timing_line(line: &str) -> Option<(u64, u64)> {
        let caps = TIMESTAMP_REGEX.captures(line)?;
        let part = |i: usize| -> u64 { caps.get(i).map_or(0, |m| m.as_str().parse().unwrap_or(0)) };

        let start = (part(1) * 3600 + part(2) * 60 + part(3)) * 1000 + part(4);
        let end = (part(5) * 3600 + part(6) * 60 + part(7)) * 1000 + part(8);
        Some((start, end))
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Document")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Cues: {}", self.cues.len())?;
        Ok(())
    }
}
