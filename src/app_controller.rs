use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::app_config::{BatchingConfig, Config, TranslationProvider};
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::providers::TranslationBackend;
use crate::providers::google::GoogleTranslate;
use crate::status::{self, ProgressTracker, Severity, StatusMessage, StatusReceiver, StatusSender};
use crate::subtitle_processor::SubtitleDocument;
use crate::translation::{BatchExecutor, BatchProfile, CueBatcher, reassemble};

// @module: Application controller for batch subtitle translation

/// Longest error message shown on a status line
pub const STATUS_MESSAGE_LIMIT: usize = 50;

/// What a run works on
#[derive(Debug, Clone)]
pub struct Session {
    // @field: Input files, processed in order
    pub files: Vec<PathBuf>,
    // @field: Source code or "auto"
    pub source_language: String,
    // @field: Target code
    pub target_language: String,
}

impl Session {
    pub fn new(files: Vec<PathBuf>, source_language: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            files,
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }
}

/// Per-file numbers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileStats {
    pub cues: usize,
    pub translatable: usize,
    pub batches: usize,
    pub failed_batches: usize,
    pub fallback_cues: usize,
    pub elapsed: Duration,
}

/// A translated file waiting to be saved
#[derive(Debug, Clone)]
pub struct TranslatedFile {
    pub source_path: PathBuf,
    pub document: SubtitleDocument,
    pub stats: FileStats,
}

/// Completion payload of a run
pub type RunOutput = Vec<TranslatedFile>;

/// Totals over a finished run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub files: usize,
    pub cues: usize,
    pub batches: usize,
    pub failed_batches: usize,
    pub fallback_cues: usize,
}

impl RunSummary {
    pub fn from_files(files: &[TranslatedFile]) -> Self {
        files.iter().fold(Self::default(), |mut summary, file| {
            summary.files += 1;
            summary.cues += file.stats.cues;
            summary.batches += file.stats.batches;
            summary.failed_batches += file.stats.failed_batches;
            summary.fallback_cues += file.stats.fallback_cues;
            summary
        })
    }
}

/// A run in progress
#[derive(Debug)]
pub struct RunHandle {
    receiver: StatusReceiver<RunOutput>,
    task: JoinHandle<()>,
}

impl RunHandle {
    /// Status stream of the run, for polling
    pub fn receiver_mut(&mut self) -> &mut StatusReceiver<RunOutput> {
        &mut self.receiver
    }

    /// Whether the background task is still working
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Wait for the run, passing every status message to `on_message`, and return its output
    pub async fn finish_with<F>(mut self, mut on_message: F) -> Result<RunOutput, AppError>
    where
        F: FnMut(&StatusMessage<RunOutput>),
    {
        while let Some(message) = self.receiver.recv().await {
            on_message(&message);
            if let StatusMessage::Done(output) = message {
                return Ok(output);
            }
        }

        // Every sender is gone without a result: the task died
        match self.task.await {
            Err(e) => Err(AppError::Unknown(format!("Translation run aborted: {}", e))),
            Ok(()) => Err(AppError::Unknown("Translation run ended without a result".to_string())),
        }
    }

    /// Wait for the run and return its output
    pub async fn finish(self) -> Result<RunOutput, AppError> {
        self.finish_with(|_| {}).await
    }
}

/// Result of saving one translated file
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Written(PathBuf),
    /// The output existed and overwriting was off
    Skipped(PathBuf),
    Failed { path: PathBuf, error: String },
}

/// Main application controller for subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Backend shared by every batch of every run
    backend: Arc<dyn TranslationBackend>,
}

impl Controller {
    // @method: Create a controller with the backend named in the configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate().map_err(|e| AppError::Config(e.to_string()))?;
        debug!("Using the {} translation backend", config.translation.provider);
        let backend: Arc<dyn TranslationBackend> = match config.translation.provider {
            TranslationProvider::Google => Arc::new(GoogleTranslate::from_config(&config.translation)),
        };
        Ok(Self::with_backend(config, backend))
    }

    // @method: Create a controller around an existing backend
    pub fn with_backend(config: Config, backend: Arc<dyn TranslationBackend>) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Session over `files` with the configured language pair
    pub fn session(&self, files: Vec<PathBuf>) -> Session {
        Session::new(files, &self.config.source_language, &self.config.target_language)
    }

    /// Start translating a session in the background.
    ///
    /// Fails immediately when there is nothing to translate or the language
    /// pair is invalid; once started a run always finishes with `Done`.
    /// Must be called from within a tokio runtime.
    pub fn start_run(&self, session: Session) -> Result<RunHandle, AppError> {
        if session.files.is_empty() {
            return Err(AppError::NoInputFiles);
        }
        let source_language = language_utils::resolve_source_language(&session.source_language)
            .map_err(|e| AppError::Config(e.to_string()))?;
        let target_language = language_utils::resolve_target_language(&session.target_language)
            .map_err(|e| AppError::Config(e.to_string()))?;

        let session = Session::new(session.files, source_language, target_language);
        let executor = BatchExecutor::new(Arc::clone(&self.backend), &self.config.translation);
        let batching = self.config.translation.batching.clone();
        let (sender, receiver) = status::channel();

        info!(
            "Starting run: {} file(s), {} -> {} via {}",
            session.files.len(),
            session.source_language,
            session.target_language,
            self.backend.name()
        );

        let task = tokio::spawn(async move {
            let output = run_session(&executor, &batching, &session, &sender).await;
            sender.done(output);
        });

        Ok(RunHandle { receiver, task })
    }

    /// Save every translated file; a failure on one file does not stop the others
    pub fn save_all(&self, files: &[TranslatedFile], target_language: &str) -> Vec<SaveOutcome> {
        let output_dir = self.config.output.directory.as_deref();
        let force_overwrite = self.config.output.force_overwrite;

        files
            .iter()
            .map(|file| Self::save_one(file, output_dir, target_language, force_overwrite))
            .collect()
    }

    fn save_one(
        file: &TranslatedFile,
        output_dir: Option<&Path>,
        target_language: &str,
        force_overwrite: bool,
    ) -> SaveOutcome {
        let path = FileManager::generate_output_path(&file.source_path, output_dir, target_language);

        if path.exists() && !force_overwrite {
            warn!("Skipping {}, translation already exists (use -f to force overwrite)", path.display());
            return SaveOutcome::Skipped(path);
        }

        match file.document.write_to_srt(&path) {
            Ok(()) => {
                info!("Success: {}", path.display());
                SaveOutcome::Written(path)
            }
            Err(e) => {
                error!("Failed to save {}: {:#}", path.display(), e);
                SaveOutcome::Failed {
                    path,
                    error: format!("{:#}", e),
                }
            }
        }
    }

    // Format duration in a human-readable format
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

/// Translate the files of a session one after another
async fn run_session(
    executor: &BatchExecutor,
    batching: &BatchingConfig,
    session: &Session,
    sender: &StatusSender<RunOutput>,
) -> RunOutput {
    let total_files = session.files.len();
    let profile = BatchProfile::for_target(&session.target_language, batching);
    let mut tracker = ProgressTracker::new(total_files);
    let mut output = Vec::with_capacity(total_files);

    debug!(
        "Batch profile for {}: {} cues per batch, {} concurrent",
        session.target_language, profile.batch_size, profile.pool_size
    );

    for (file_index, path) in session.files.iter().enumerate() {
        let file_number = file_index + 1;
        sender.log(
            Severity::Info,
            format!("File {}/{}: {}", file_number, total_files, path.display()),
        );

        let document = match SubtitleDocument::from_file(path) {
            Ok(document) => document,
            Err(e) => {
                error!("Skipping {}: {}", path.display(), e);
                sender.log(
                    Severity::Error,
                    format!("load: {}", status::truncate_message(&e.to_string(), STATUS_MESSAGE_LIMIT)),
                );
                sender.progress(tracker.file_done(file_index), file_number, total_files);
                continue;
            }
        };

        if CueBatcher::translatable_positions(&document).is_empty() {
            warn!("{} has no text to translate, keeping it unchanged", path.display());
            sender.log(Severity::Warning, format!("File {}/{}: nothing to translate", file_number, total_files));
        }

        let report = executor
            .translate_document(
                &document,
                profile,
                &session.source_language,
                &session.target_language,
                |update| {
                    let fraction = tracker.update(file_index, update.completed, update.total);
                    sender.progress(fraction, file_index, total_files);
                    match update.error {
                        Some(e) => sender.log(
                            Severity::Error,
                            format!("{}: {}", e.kind(), status::truncate_message(&e.to_string(), STATUS_MESSAGE_LIMIT)),
                        ),
                        None => sender.log(
                            Severity::Info,
                            format!("File {}/{} - {}/{} lines", file_number, total_files, update.completed, update.total),
                        ),
                    }
                },
            )
            .await;

        let stats = FileStats {
            cues: document.cues.len(),
            translatable: report.translatable,
            batches: report.batches,
            failed_batches: report.failures.len(),
            fallback_cues: report.failures.iter().map(|f| f.cues).sum(),
            elapsed: report.elapsed,
        };
        info!(
            "Translated {} in {} ({} batch(es), {} fell back)",
            path.display(),
            Controller::format_duration(stats.elapsed),
            stats.batches,
            stats.failed_batches
        );

        output.push(TranslatedFile {
            source_path: path.clone(),
            document: reassemble(&document, &report.result),
            stats,
        });
        sender.progress(tracker.file_done(file_index), file_number, total_files);
    }

    output
}
