/*!
 * Cue text normalization.
 *
 * Strips SSA-style override blocks (`{\an8}`, `{\i1}`) and inline markup
 * (`<i>`, `<font color=..>`) and collapses whitespace, so the backend only
 * sees the words.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// `{...}` override blocks
static BRACE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\}").unwrap());

/// `<...>` markup tags
static ANGLE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Any run of whitespace, including line breaks
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize raw cue text for translation.
///
/// Idempotent: `normalize_text(&normalize_text(s)) == normalize_text(s)`.
pub fn normalize_text(text: &str) -> String {
    let text = BRACE_TAG_REGEX.replace_all(text, "");
    let text = ANGLE_TAG_REGEX.replace_all(&text, "");
    WHITESPACE_REGEX.replace_all(&text, " ").trim().to_string()
}
