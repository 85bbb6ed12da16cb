/*!
 * Tests for language code utilities
 */

use srtbatch::language_utils::{
    get_language_name, is_complex_script, language_codes_match, output_language_tag,
    resolve_source_language, resolve_target_language, KNOWN_LANGUAGES,
};

#[test]
fn test_resolve_withNamesAndCodes_shouldReturnBackendCodes() {
    assert_eq!(resolve_target_language("Sinhala").unwrap(), "si");
    assert_eq!(resolve_target_language("CHINESE (TRADITIONAL)").unwrap(), "zh-TW");
    assert_eq!(resolve_target_language("de").unwrap(), "de");
}

#[test]
fn test_resolve_withAuto_shouldOnlyWorkForSource() {
    assert_eq!(resolve_source_language("auto").unwrap(), "auto");
    assert_eq!(resolve_source_language("AUTO").unwrap(), "auto");
    assert!(resolve_target_language("auto").is_err());
}

#[test]
fn test_known_languages_shouldAllResolveToThemselves() {
    for (name, code) in KNOWN_LANGUAGES {
        assert_eq!(resolve_target_language(code).unwrap(), *code, "{}", name);
        assert_eq!(get_language_name(code).unwrap(), *name);
    }
}

#[test]
fn test_codes_match_withDifferentForms_shouldMatch() {
    assert!(language_codes_match("en", "eng"));
    assert!(!language_codes_match("en", "fr"));
}

#[test]
fn test_complex_script_withRegionalCodes_shouldMatchPrimarySubtag() {
    let complex: Vec<String> = vec!["zh".to_string(), "th".to_string()];
    assert!(is_complex_script("zh-CN", &complex));
    assert!(is_complex_script("TH", &complex));
    assert!(!is_complex_script("fr", &complex));
}

#[test]
fn test_output_language_tag_shouldStripDashesAndLowercase() {
    assert_eq!(output_language_tag("zh-CN"), "zhcn");
    assert_eq!(output_language_tag("si"), "si");
}
