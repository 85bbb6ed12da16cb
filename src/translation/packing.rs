/*!
 * Delimited packing of batch texts.
 *
 * A batch's cleaned texts travel to the backend as one string, joined by a
 * marker derived from the batch content. The translated string is split back
 * on the same marker and must yield exactly one segment per text.
 */

use sha2::{Digest, Sha256};
use std::fmt::Debug;

use crate::errors::TranslationError;

/// Produces the marker that separates texts of one batch
pub trait DelimiterStrategy: Send + Sync + Debug {
    /// Marker for the batch with the given sequence number and texts.
    ///
    /// The marker must not occur inside any of `texts`.
    fn marker(&self, sequence: usize, texts: &[String]) -> String;
}

/// Marker built from a SHA-256 of the batch sequence number and its texts.
///
/// The marker is all upper case so backends that change letter case keep it intact.
#[derive(Debug, Clone, Default)]
pub struct HashedDelimiter;

impl HashedDelimiter {
    fn token(sequence: usize, texts: &[String], salt: u32) -> String {
        let mut hasher = Sha256::new();
        hasher.update(sequence.to_le_bytes());
        hasher.update(salt.to_le_bytes());
        for text in texts {
            hasher.update(text.as_bytes());
            hasher.update([0u8]);
        }
        let digest = hasher.finalize();
        digest[..8].iter().map(|b| format!("{:02X}", b)).collect()
    }
}

impl DelimiterStrategy for HashedDelimiter {
    fn marker(&self, sequence: usize, texts: &[String]) -> String {
        let mut salt = 0u32;
        loop {
            let marker = format!("||---UNIQUE_SUB_SPLIT_{}---||", Self::token(sequence, texts, salt));
            if !texts.iter().any(|text| text.contains(&marker)) {
                return marker;
            }
            salt = salt.wrapping_add(1);
        }
    }
}

/// One batch's texts packed into a single backend payload
#[derive(Debug, Clone)]
pub struct PackedBatch {
    marker: String,
    payload: String,
    sources: Vec<String>,
}

impl PackedBatch {
    /// Join cleaned texts with a marker chosen by `strategy`
    pub fn pack(sequence: usize, sources: Vec<String>, strategy: &dyn DelimiterStrategy) -> Self {
        let marker = strategy.marker(sequence, &sources);
        let separator = format!("\n\n{}\n\n", marker);
        let payload = sources.join(&separator);
        Self {
            marker,
            payload,
            sources,
        }
    }

    /// The combined string sent to the backend
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// The cleaned texts that were packed
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Split a translated payload back into one text per source.
    ///
    /// A segment count mismatch is a batch-wide split error. Segments that come
    /// back empty fall back to their cleaned source text.
    pub fn unpack(&self, translated: &str) -> Result<Vec<String>, TranslationError> {
        let segments: Vec<&str> = translated.split(self.marker.as_str()).collect();

        if segments.len() != self.sources.len() {
            return Err(TranslationError::Split {
                expected: self.sources.len(),
                actual: segments.len(),
            });
        }

        Ok(segments
            .iter()
            .zip(&self.sources)
            .map(|(segment, source)| {
                let segment = segment.trim();
                if segment.is_empty() {
                    source.clone()
                } else {
                    segment.to_string()
                }
            })
            .collect())
    }
}
