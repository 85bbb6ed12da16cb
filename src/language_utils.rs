/*!
 * Language utilities
 *
 * Resolves user-supplied language names and codes to the codes sent to the
 * translation backend, and decides which targets belong to the
 * complex-script class.
 */

use anyhow::{anyhow, Result};
use isolang::Language;

/// Languages offered by name, with the code the backend expects
pub const KNOWN_LANGUAGES: &[(&str, &str)] = &[
    ("Arabic", "ar"),
    ("Bengali", "bn"),
    ("Chinese (Simplified)", "zh-CN"),
    ("Chinese (Traditional)", "zh-TW"),
    ("Croatian", "hr"),
    ("Czech", "cs"),
    ("Danish", "da"),
    ("Dutch", "nl"),
    ("English", "en"),
    ("Filipino", "tl"),
    ("Finnish", "fi"),
    ("French", "fr"),
    ("German", "de"),
    ("Greek", "el"),
    ("Hindi", "hi"),
    ("Hungarian", "hu"),
    ("Indonesian", "id"),
    ("Italian", "it"),
    ("Japanese", "ja"),
    ("Korean", "ko"),
    ("Malay", "ms"),
    ("Norwegian", "no"),
    ("Polish", "pl"),
    ("Portuguese", "pt"),
    ("Romanian", "ro"),
    ("Russian", "ru"),
    ("Sinhala", "si"),
    ("Spanish", "es"),
    ("Swedish", "sv"),
    ("Thai", "th"),
    ("Turkish", "tr"),
    ("Ukrainian", "uk"),
    ("Vietnamese", "vi"),
];

/// Source value asking the backend to detect the language
pub const AUTO_DETECT: &str = "auto";

/// Primary subtag of a code, lowercased ("zh-CN" -> "zh")
pub fn primary_subtag(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Normalize a language code to ISO 639-3 (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = primary_subtag(code);

    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    } else if normalized_code.len() == 3 {
        // ISO 639-2/B codes that differ from 639-2/T
        let part2t = match normalized_code.as_str() {
            "fre" => "fra",
            "ger" => "deu",
            "dut" => "nld",
            "gre" => "ell",
            "chi" => "zho",
            "cze" => "ces",
            "rum" => "ron",
            "may" => "msa",
            other => other,
        };
        if Language::from_639_3(part2t).is_some() {
            return Ok(part2t.to_string());
        }
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Check if two language codes name the same language, ignoring region subtags
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_to_part2t(code1), normalize_to_part2t(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Resolve a language name or code to the code sent to the backend
pub fn resolve_language(input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("Language cannot be empty"));
    }

    if let Some((_, code)) = KNOWN_LANGUAGES
        .iter()
        .find(|(name, code)| name.eq_ignore_ascii_case(input) || code.eq_ignore_ascii_case(input))
    {
        return Ok(code.to_string());
    }

    normalize_to_part2t(input)?;
    Ok(input.to_string())
}

/// Resolve a source language, which may also be "auto"
pub fn resolve_source_language(input: &str) -> Result<String> {
    if input.trim().eq_ignore_ascii_case(AUTO_DETECT) {
        return Ok(AUTO_DETECT.to_string());
    }
    resolve_language(input)
}

/// Resolve a target language; "auto" is not a valid target
pub fn resolve_target_language(input: &str) -> Result<String> {
    if input.trim().eq_ignore_ascii_case(AUTO_DETECT) {
        return Err(anyhow!("'auto' can only be used as a source language"));
    }
    resolve_language(input)
}

/// Get the display name for a code
pub fn get_language_name(code: &str) -> Result<String> {
    if let Some((name, _)) = KNOWN_LANGUAGES.iter().find(|(_, c)| c.eq_ignore_ascii_case(code.trim())) {
        return Ok(name.to_string());
    }

    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Whether a target code belongs to the configured complex-script class
pub fn is_complex_script(code: &str, complex_script_languages: &[String]) -> bool {
    let subtag = primary_subtag(code);
    complex_script_languages
        .iter()
        .any(|entry| primary_subtag(entry) == subtag || language_codes_match(entry, code))
}

/// Code as used in output file names ("zh-CN" -> "zhcn")
pub fn output_language_tag(code: &str) -> String {
    code.replace('-', "").to_lowercase()
}
