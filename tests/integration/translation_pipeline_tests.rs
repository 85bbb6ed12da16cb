/*!
 * Integration tests for the batch pipeline against scripted backends
 */

use std::sync::Arc;
use std::time::Duration;

use srtbatch::app_config::{BatchingConfig, TranslationConfig};
use srtbatch::providers::mock::MockBackend;
use srtbatch::subtitle_processor::SubtitleDocument;
use srtbatch::translation::{reassemble, BatchExecutor, BatchProfile, RetryPolicy};
use crate::common;

fn executor(backend: &MockBackend) -> BatchExecutor {
    BatchExecutor::new(Arc::new(backend.clone()), &TranslationConfig::default())
        .with_retry(RetryPolicy::new(3, Duration::from_millis(1)))
}

fn standard() -> BatchProfile {
    BatchProfile::for_target("fr", &BatchingConfig::default())
}

fn texts(document: &SubtitleDocument) -> Vec<&str> {
    document.cues.iter().map(|c| c.text.as_str()).collect()
}

fn assert_same_structure(input: &SubtitleDocument, output: &SubtitleDocument) {
    assert_eq!(input.cues.len(), output.cues.len());
    for (a, b) in input.cues.iter().zip(&output.cues) {
        assert_eq!((a.index, a.start_ms, a.end_ms), (b.index, b.start_ms, b.end_ms));
    }
}

#[tokio::test]
async fn test_uppercase_backend_withEmptyMiddleCue_shouldTranslateInOneBatch() {
    common::init_logging();
    let backend = MockBackend::uppercase();
    let input = common::sample_document(&["Hello", "", "World"]);

    let report = executor(&backend)
        .translate_document(&input, standard(), "auto", "fr", |_| {})
        .await;
    let output = reassemble(&input, &report.result);

    assert_eq!(backend.call_count(), 1);
    assert_eq!(report.batches, 1);
    assert_eq!(texts(&output), vec!["HELLO", "", "WORLD"]);
    assert_same_structure(&input, &output);
}

#[tokio::test]
async fn test_flaky_backend_withTwoFailures_shouldSucceedOnThirdAttempt() {
    let backend = MockBackend::fail_times(2).with_custom_response(|t| t.to_uppercase());
    let input = common::sample_document(&["one", "two"]);

    let report = executor(&backend)
        .translate_document(&input, standard(), "auto", "fr", |_| {})
        .await;

    assert_eq!(backend.call_count(), 3);
    assert!(report.failures.is_empty());
    assert_eq!(texts(&reassemble(&input, &report.result)), vec!["ONE", "TWO"]);
}

#[tokio::test]
async fn test_hanging_backend_withShortTimeout_shouldFallBackAndFinish() {
    let backend = MockBackend::hanging();
    let input = common::sample_document(&["<i>Hello</i>", "World"]);

    let report = executor(&backend)
        .with_batch_timeout(Duration::from_millis(50))
        .translate_document(&input, standard(), "auto", "fr", |_| {})
        .await;
    let output = reassemble(&input, &report.result);

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].error.kind(), "timeout");
    assert_eq!(output, input);
}

#[tokio::test]
async fn test_failing_backend_shouldKeepEveryCueUnchanged() {
    let backend = MockBackend::failing();
    let owned: Vec<String> = (0..20).map(|i| format!("{{\\an8}}line <b>{}</b>", i)).collect();
    let refs: Vec<&str> = owned.iter().map(String::as_str).collect();
    let input = common::sample_document(&refs);

    let report = executor(&backend)
        .translate_document(&input, standard(), "auto", "fr", |_| {})
        .await;
    let output = reassemble(&input, &report.result);

    assert_eq!(report.batches, 2);
    assert_eq!(backend.call_count(), 2 * 3);
    assert!(report.failures.iter().all(|f| f.error.kind() == "backend"));
    assert_eq!(output, input);
}

#[tokio::test]
async fn test_corrupted_delimiters_shouldFallBackForWholeBatch() {
    let backend = MockBackend::corrupt_delimiters();
    let input = common::sample_document(&["alpha", "beta", "gamma"]);

    let report = executor(&backend)
        .translate_document(&input, standard(), "auto", "fr", |_| {})
        .await;

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].error.kind(), "split");
    assert_eq!(report.failures[0].cues, 3);
    assert_eq!(reassemble(&input, &report.result), input);
}

#[tokio::test]
async fn test_blank_segment_shouldFallBackForThatCueOnly() {
    let backend = MockBackend::echo().with_custom_response(|t| t.replace("two", " ").to_uppercase());
    let input = common::sample_document(&["one", "two", "three"]);

    let report = executor(&backend)
        .translate_document(&input, standard(), "auto", "fr", |_| {})
        .await;

    assert!(report.failures.is_empty());
    assert_eq!(texts(&reassemble(&input, &report.result)), vec!["ONE", "two", "THREE"]);
}

#[tokio::test]
async fn test_pool_sizes_withSlowBackend_shouldProduceSameOutput() {
    let owned: Vec<String> = (0..40).map(|i| format!("cue number {}", i)).collect();
    let refs: Vec<&str> = owned.iter().map(String::as_str).collect();
    let input = common::sample_document(&refs);

    let mut outputs = Vec::new();
    for pool_size in [1, 5] {
        let backend = MockBackend::slow(5).with_custom_response(|t| t.to_uppercase());
        let profile = BatchProfile { batch_size: 3, pool_size };
        let report = executor(&backend)
            .translate_document(&input, profile, "auto", "fr", |_| {})
            .await;
        assert!(backend.max_in_flight() <= pool_size);
        outputs.push(reassemble(&input, &report.result));
    }

    assert_eq!(outputs[0], outputs[1]);
    assert_eq!(outputs[0].cues[39].text, "CUE NUMBER 39");
}

#[tokio::test]
async fn test_complex_script_target_shouldUseSmallBatchesAndFewWorkers() {
    let backend = MockBackend::slow(10);
    let owned: Vec<String> = (0..12).map(|i| format!("sentence {}", i)).collect();
    let refs: Vec<&str> = owned.iter().map(String::as_str).collect();
    let input = common::sample_document(&refs);
    let profile = BatchProfile::for_target("ja", &BatchingConfig::default());

    let report = executor(&backend)
        .translate_document(&input, profile, "auto", "ja", |_| {})
        .await;

    assert_eq!(report.batches, 3);
    assert_eq!(backend.call_count(), 3);
    assert!(backend.max_in_flight() <= 3);
}
