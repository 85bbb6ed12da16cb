/*!
 * # srtbatch - batch subtitle translation
 *
 * A Rust library for translating SRT subtitle files through an unreliable
 * machine-translation backend without ever corrupting their structure.
 *
 * ## Features
 *
 * - Cleans cue text of style and markup tags before translation
 * - Packs cues into delimited batches, one backend call per batch
 * - Runs the batches of a file concurrently with retries and a wait bound
 * - Smaller batches and fewer workers for complex-script targets
 * - Falls back to the source text whenever a batch cannot be validated
 * - Keeps cue count, numbering and timing identical to the input
 * - Reports progress and status through a pollable queue
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: SRT parsing and writing
 * - `translation`: The batch pipeline:
 *   - `translation::normalizer`: Cue text cleaning
 *   - `translation::batch`: Cue batching
 *   - `translation::packing`: Delimited packing and unpacking
 *   - `translation::executor`: Concurrent batch execution
 *   - `translation::reassembly`: Rebuilding translated documents
 * - `status`: Progress and status queue
 * - `app_controller`: Run orchestration and saving
 * - `file_utils`: File system operations
 * - `language_utils`: Language tables and code utilities
 * - `providers`: Translation backends (`google`, `mock`)
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod status;
pub mod subtitle_processor;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunHandle, Session, TranslatedFile};
pub use subtitle_processor::{Cue, SubtitleDocument};
pub use language_utils::{language_codes_match, normalize_to_part2t, get_language_name};
pub use errors::{AppError, ProviderError, SubtitleError, TranslationError};
