/*!
 * Concurrent batch execution for one file.
 *
 * Every batch is an independent unit of work: clean, pack, call the backend
 * with retries under a wait bound, then unpack. Units run concurrently up to
 * the pool size of the file's batch profile. Results are merged by cue
 * position, so completion order does not matter.
 */

use futures::stream::{self, StreamExt};
use log::{debug, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{SplitFailurePolicy, TranslationConfig};
use crate::errors::TranslationError;
use crate::providers::TranslationBackend;
use crate::subtitle_processor::SubtitleDocument;

use super::batch::{Batch, CueBatcher};
use super::concurrency::BatchProfile;
use super::normalizer::normalize_text;
use super::packing::{DelimiterStrategy, HashedDelimiter, PackedBatch};
use super::retry::RetryPolicy;

/// Translated texts of one file, addressed by cue position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationResult {
    slots: Vec<Option<String>>,
}

impl TranslationResult {
    /// An empty result for a document with `len` cues
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    /// Record the text for a cue position; out-of-range positions are ignored
    pub fn set(&mut self, position: usize, text: String) {
        if let Some(slot) = self.slots.get_mut(position) {
            *slot = Some(text);
        }
    }

    pub fn get(&self, position: usize) -> Option<&str> {
        self.slots.get(position).and_then(|slot| slot.as_deref())
    }

    /// Number of positions that received a text
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// A batch that fell back instead of translating
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure {
    /// Sequence number of the batch within its file
    pub sequence: usize,
    /// Number of cues that fell back
    pub cues: usize,
    pub error: TranslationError,
}

/// Progress notification emitted after each batch is merged
#[derive(Debug, Clone, Copy)]
pub struct BatchUpdate<'a> {
    pub sequence: usize,
    /// Translatable cues merged so far, including fallbacks
    pub completed: usize,
    /// Translatable cues in the file
    pub total: usize,
    /// Set when this batch fell back
    pub error: Option<&'a TranslationError>,
}

/// Outcome of translating one file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub result: TranslationResult,
    pub batches: usize,
    pub translatable: usize,
    pub failures: Vec<BatchFailure>,
    pub elapsed: Duration,
}

/// Runs the batches of one file against a backend
#[derive(Debug, Clone)]
pub struct BatchExecutor {
    /// The backend every batch is sent to
    backend: Arc<dyn TranslationBackend>,

    /// Retry budget for each backend call
    retry: RetryPolicy,

    /// Wait bound for one batch, retries included
    batch_timeout: Duration,

    /// Fallback used when a translated blob does not split
    split_failure: SplitFailurePolicy,

    /// Marker generator for packing
    delimiter: Arc<dyn DelimiterStrategy>,
}

impl BatchExecutor {
    pub fn new(backend: Arc<dyn TranslationBackend>, config: &TranslationConfig) -> Self {
        Self {
            backend,
            retry: config.retry.into(),
            batch_timeout: config.batch_timeout(),
            split_failure: config.split_failure,
            delimiter: Arc::new(HashedDelimiter),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_batch_timeout(mut self, batch_timeout: Duration) -> Self {
        self.batch_timeout = batch_timeout;
        self
    }

    pub fn with_split_failure(mut self, split_failure: SplitFailurePolicy) -> Self {
        self.split_failure = split_failure;
        self
    }

    pub fn with_delimiter(mut self, delimiter: Arc<dyn DelimiterStrategy>) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Translate every translatable cue of a document.
    ///
    /// Never fails: a batch that cannot be translated contributes fallback
    /// texts and a `BatchFailure` entry. `on_update` runs once per batch, in
    /// completion order.
    pub async fn translate_document<F>(
        &self,
        document: &SubtitleDocument,
        profile: BatchProfile,
        source_language: &str,
        target_language: &str,
        mut on_update: F,
    ) -> FileReport
    where
        F: FnMut(BatchUpdate<'_>),
    {
        let start_time = Instant::now();
        let batches = CueBatcher::new(profile.batch_size).plan(document);
        let translatable: usize = batches.iter().map(Batch::len).sum();

        let mut result = TranslationResult::new(document.cues.len());
        let mut failures = Vec::new();
        let mut completed = 0;

        let mut outcomes = stream::iter(batches.iter().cloned())
            .map(|batch| {
                let texts: Vec<String> = batch
                    .positions
                    .iter()
                    .map(|&position| normalize_text(&document.cues[position].text))
                    .collect();
                async move {
                    let outcome = self.run_batch(batch.sequence, texts.clone(), source_language, target_language).await;
                    (batch, texts, outcome)
                }
            })
            .buffer_unordered(profile.pool_size.max(1));

        while let Some((batch, texts, outcome)) = outcomes.next().await {
            let (translated, error) = match outcome {
                Ok(translated) => (translated, None),
                Err(error) => {
                    warn!(
                        "Batch {} ({} cues) fell back [{}]: {}",
                        batch.sequence + 1,
                        batch.len(),
                        error.kind(),
                        error
                    );
                    (self.fallback(&texts, &error), Some(error))
                }
            };

            for (&position, text) in batch.positions.iter().zip(translated) {
                result.set(position, text);
            }

            completed += batch.len();
            on_update(BatchUpdate {
                sequence: batch.sequence,
                completed,
                total: translatable,
                error: error.as_ref(),
            });

            if let Some(error) = error {
                failures.push(BatchFailure {
                    sequence: batch.sequence,
                    cues: batch.len(),
                    error,
                });
            }
        }

        let elapsed = start_time.elapsed();
        debug!(
            "Translated {} cue(s) in {} batch(es), {} failure(s), {:?}",
            translatable,
            batches.len(),
            failures.len(),
            elapsed
        );

        FileReport {
            result,
            batches: batches.len(),
            translatable,
            failures,
            elapsed,
        }
    }

    /// One unit of work: pack, call the backend under the wait bound, unpack
    async fn run_batch(
        &self,
        sequence: usize,
        texts: Vec<String>,
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, TranslationError> {
        let packed = PackedBatch::pack(sequence, texts, self.delimiter.as_ref());

        let call = self
            .retry
            .translate(self.backend.as_ref(), packed.payload(), source_language, target_language);
        let translated = tokio::time::timeout(self.batch_timeout, call)
            .await
            .map_err(|_| TranslationError::Timeout(self.batch_timeout))??;

        packed.unpack(&translated)
    }

    /// Texts emitted for a failed batch, applied to every cue in it
    fn fallback(&self, texts: &[String], error: &TranslationError) -> Vec<String> {
        match (error, self.split_failure) {
            (TranslationError::Split { .. }, SplitFailurePolicy::Tagged) => {
                let total = texts.len();
                texts
                    .iter()
                    .enumerate()
                    .map(|(i, text)| format!("[SPLIT ERROR {}/{}] {}", i + 1, total, text))
                    .collect()
            }
            _ => texts.to_vec(),
        }
    }
}
