/*!
 * Rebuilding a document from translated texts.
 */

use crate::subtitle_processor::SubtitleDocument;

use super::executor::TranslationResult;
use super::normalizer::normalize_text;

/// Whether `translated` should replace the cue text `source`.
///
/// The translation is taken when its normalized form is non-empty and not
/// exactly equal to the normalized source. A fallback that echoes the cleaned
/// source therefore keeps the original text, markup included.
pub fn translation_took(source: &str, translated: &str) -> bool {
    let translated = normalize_text(translated);
    !translated.is_empty() && translated != normalize_text(source)
}

/// Cue text from a translated segment: trimmed, with blank lines dropped so the
/// text can never end its SRT block early
fn cue_text(translated: &str) -> String {
    translated
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the output document: same cues, same order, same timing; only text may change
pub fn reassemble(document: &SubtitleDocument, result: &TranslationResult) -> SubtitleDocument {
    let cues = document
        .cues
        .iter()
        .enumerate()
        .map(|(position, cue)| match result.get(position) {
            Some(translated) if translation_took(&cue.text, translated) => cue.with_text(cue_text(translated)),
            _ => cue.clone(),
        })
        .collect();

    SubtitleDocument::new(document.source_file.clone(), cues)
}
