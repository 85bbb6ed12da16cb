/*!
 * Batch translation of subtitle documents.
 *
 * - `normalizer`: cleaning cue text before it is sent
 * - `batch`: grouping translatable cues into ordered batches
 * - `concurrency`: batch and pool sizes per target script class
 * - `packing`: joining a batch into one payload and splitting it back
 * - `retry`: exponential backoff around backend calls
 * - `executor`: concurrent execution of a file's batches
 * - `reassembly`: building the translated document
 */

// Re-export main types for easier usage
pub use self::batch::{Batch, CueBatcher};
pub use self::concurrency::{BatchProfile, ScriptClass};
pub use self::executor::{BatchExecutor, BatchFailure, BatchUpdate, FileReport, TranslationResult};
pub use self::normalizer::normalize_text;
pub use self::packing::{DelimiterStrategy, HashedDelimiter, PackedBatch};
pub use self::reassembly::{reassemble, translation_took};
pub use self::retry::RetryPolicy;

// Submodules
pub mod batch;
pub mod concurrency;
pub mod executor;
pub mod normalizer;
pub mod packing;
pub mod reassembly;
pub mod retry;
