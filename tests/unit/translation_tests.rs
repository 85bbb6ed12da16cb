/*!
 * Tests for text normalization, batching and packing
 */

use srtbatch::app_config::BatchingConfig;
use srtbatch::errors::TranslationError;
use srtbatch::translation::{
    normalize_text, BatchProfile, CueBatcher, DelimiterStrategy, HashedDelimiter, PackedBatch,
    translation_took,
};
use crate::common;

#[test]
fn test_normalize_withTagsAndWhitespace_shouldCleanText() {
    assert_eq!(normalize_text("{\\an8}<i>Hello</i>\n  <b>world</b> "), "Hello world");
    assert_eq!(normalize_text("{\\pos(10,10)}"), "");
}

#[test]
fn test_normalize_appliedTwice_shouldBeIdempotent() {
    let samples = ["  a  b ", "<font color=\"red\">x</font>\ty", "{\\i1}z{\\i0}", "", "plain"];
    for sample in samples {
        let once = normalize_text(sample);
        assert_eq!(normalize_text(&once), once);
    }
}

#[test]
fn test_batches_withThirtyOneCues_shouldCoverEveryCueOnceInOrder() {
    let texts: Vec<String> = (0..31).map(|i| format!("line {}", i)).collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let document = common::sample_document(&refs);

    let batches = CueBatcher::new(15).plan(&document);
    let flattened: Vec<usize> = batches.iter().flat_map(|b| b.positions.clone()).collect();

    assert_eq!(batches.iter().map(|b| b.len()).collect::<Vec<_>>(), vec![15, 15, 1]);
    assert_eq!(flattened, (0..31).collect::<Vec<_>>());
}

#[test]
fn test_profile_withComplexScriptTargets_shouldUseSmallBatches() {
    let config = BatchingConfig::default();
    for target in ["zh-CN", "zh-TW", "ja", "ko", "th", "vi"] {
        assert_eq!(BatchProfile::for_target(target, &config).batch_size, 5, "{}", target);
    }
    for target in ["fr", "si", "ar", "hi"] {
        assert_eq!(BatchProfile::for_target(target, &config).batch_size, 15, "{}", target);
    }
}

#[test]
fn test_unpack_withMarkerDroppedByBackend_shouldFailWholeBatch() {
    let sources = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let packed = PackedBatch::pack(2, sources, &HashedDelimiter);
    let mangled = packed.payload().replace(packed.marker(), "");

    let err = packed.unpack(&mangled).unwrap_err();
    assert_eq!(err, TranslationError::Split { expected: 3, actual: 1 });
}

#[test]
fn test_marker_withSameBatch_shouldBeDeterministic() {
    let texts = vec!["Hello".to_string(), "World".to_string()];
    assert_eq!(HashedDelimiter.marker(4, &texts), HashedDelimiter.marker(4, &texts));
    assert!(HashedDelimiter.marker(4, &texts).starts_with("||---UNIQUE_SUB_SPLIT_"));
}

#[test]
fn test_translation_took_withEchoedSource_shouldKeepOriginal() {
    assert!(!translation_took("<i>Hello</i>", "Hello"));
    assert!(translation_took("<i>Hello</i>", "Bonjour"));
}

#[test]
fn test_retry_withEmptyBackend_shouldStopAfterMaxAttempts() {
    use srtbatch::providers::mock::MockBackend;
    use srtbatch::translation::RetryPolicy;
    use std::time::Duration;

    let backend = MockBackend::empty();
    let policy = RetryPolicy::new(4, Duration::from_millis(1));

    let result = tokio_test::block_on(policy.translate(&backend, "text", "auto", "fr"));

    assert_eq!(result.unwrap_err().kind(), "backend");
    assert_eq!(backend.call_count(), 4);
}
