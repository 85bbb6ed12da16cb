/*!
 * Script-class batch tuning.
 *
 * Complex-script targets get smaller batches and fewer workers.
 */

use crate::app_config::BatchingConfig;
use crate::language_utils;

/// Script class of a target language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptClass {
    Standard,
    Complex,
}

impl ScriptClass {
    /// Classify a target language code
    pub fn for_language(target_language: &str, config: &BatchingConfig) -> Self {
        if language_utils::is_complex_script(target_language, &config.complex_script_languages) {
            Self::Complex
        } else {
            Self::Standard
        }
    }
}

/// Batch size and pool size used for one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProfile {
    /// Cues per batch
    pub batch_size: usize,
    /// Concurrent batches
    pub pool_size: usize,
}

impl BatchProfile {
    /// Get the profile for a script class
    pub fn for_class(class: ScriptClass, config: &BatchingConfig) -> Self {
        let profile = match class {
            ScriptClass::Standard => config.standard,
            ScriptClass::Complex => config.complex_script,
        };
        Self {
            batch_size: profile.batch_size.max(1),
            pool_size: profile.workers.max(1),
        }
    }

    /// Get the profile for a target language
    pub fn for_target(target_language: &str, config: &BatchingConfig) -> Self {
        Self::for_class(ScriptClass::for_language(target_language, config), config)
    }
}
