/*!
 * Cue batching.
 *
 * Splits the translatable cues of a document into bounded, ordered batches.
 * A batch only records cue positions; texts are read back from the document
 * when the batch is packed.
 */

use log::debug;

use crate::subtitle_processor::SubtitleDocument;
use super::normalizer::normalize_text;

/// A bounded group of cues translated in one backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// 0-based order of the batch within its file
    pub sequence: usize,

    /// Positions of the cues in `SubtitleDocument::cues`, ascending
    pub positions: Vec<usize>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Groups translatable cue positions into fixed-size batches
#[derive(Debug, Clone, Copy)]
pub struct CueBatcher {
    batch_size: usize,
}

impl CueBatcher {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// Positions of cues that have something left to translate once cleaned.
    ///
    /// Blank and markup-only cues never enter a batch and keep their text.
    pub fn translatable_positions(document: &SubtitleDocument) -> Vec<usize> {
        document
            .cues
            .iter()
            .enumerate()
            .filter(|(_, cue)| !normalize_text(&cue.text).is_empty())
            .map(|(position, _)| position)
            .collect()
    }

    /// Partition ordered positions into batches of at most `batch_size`
    pub fn partition(&self, positions: &[usize]) -> Vec<Batch> {
        positions
            .chunks(self.batch_size)
            .enumerate()
            .map(|(sequence, chunk)| Batch {
                sequence,
                positions: chunk.to_vec(),
            })
            .collect()
    }

    /// Plan the batches for a whole document
    pub fn plan(&self, document: &SubtitleDocument) -> Vec<Batch> {
        let positions = Self::translatable_positions(document);
        let batches = self.partition(&positions);
        debug!(
            "Planned {} batch(es) for {} of {} cues (batch size {})",
            batches.len(),
            positions.len(),
            document.cues.len(),
            self.batch_size
        );
        batches
    }
}
