// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{error, warn, info, debug, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand, Args};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};

use srtbatch::app_config::{self, BatchingConfig, Config};
use srtbatch::app_controller::{Controller, RunSummary, SaveOutcome};
use srtbatch::file_utils::FileManager;
use srtbatch::language_utils;
use srtbatch::status::{Severity, StatusBoard, StatusMessage};

/// Interval at which the status queue is drained
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Resolution of the progress bar
const PROGRESS_STEPS: u64 = 1000;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate subtitle files (default command)
    Translate(TranslateArgs),

    /// List the languages known by name
    Languages,

    /// Generate shell completions for srtbatch
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct TranslateArgs {
    /// Subtitle files or directories to translate
    #[arg(value_name = "INPUT_PATHS")]
    input_paths: Vec<PathBuf>,

    /// Source language name or code, or 'auto'
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language name or code (e.g. 'fr', 'Sinhala', 'zh-CN')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Directory for translated files (default: next to each input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// srtbatch - batch subtitle translation
///
/// Translates SRT files cue by cue through a machine-translation backend while
/// keeping numbering and timing intact.
#[derive(Parser, Debug)]
#[command(name = "srtbatch")]
#[command(version)]
#[command(about = "Batch subtitle translation tool")]
#[command(long_about = "srtbatch translates SRT subtitle files in batches and writes <name>.<lang>.srt next to them.

EXAMPLES:
    srtbatch movie.srt                          # Translate using default config
    srtbatch -t fr movie.srt                    # Translate to French
    srtbatch -s en -t zh-CN -o out/ season1/    # Translate a whole directory
    srtbatch -f -t Sinhala movie.srt            # Overwrite an existing translation
    srtbatch languages                          # List languages known by name
    srtbatch completions bash > srtbatch.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The filter lives in log::max_level so it can be changed after init
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "srtbatch", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Languages) => {
            print_languages();
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => run_translate(cli.translate).await,
    }
}

fn print_languages() {
    let complex = BatchingConfig::default().complex_script_languages;
    println!("{:<24} {:<7} complex script", "Language", "Code");
    for (name, code) in language_utils::KNOWN_LANGUAGES {
        let marker = if language_utils::is_complex_script(code, &complex) { "*" } else { "" };
        println!("{:<24} {:<7} {}", name, code, marker);
    }
    println!();
    println!("Other ISO 639-1 codes are accepted as well; 'auto' detects the source language.");
}

/// Load the config file and apply command line overrides
fn build_config(options: &TranslateArgs) -> Result<Config> {
    let mut config = Config::load_or_create(&options.config_path)?;

    if let Some(source_language) = &options.source_language {
        config.source_language = source_language.clone();
    }
    if let Some(target_language) = &options.target_language {
        config.target_language = target_language.clone();
    }
    if let Some(output_dir) = &options.output_dir {
        config.output.directory = Some(output_dir.clone());
    }
    if options.force_overwrite {
        config.output.force_overwrite = true;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Names such as "Sinhala" become the codes the backend expects
    config.source_language = language_utils::resolve_source_language(&config.source_language)
        .context("Invalid source language")?;
    config.target_language = language_utils::resolve_target_language(&config.target_language)
        .context("Invalid target language")?;

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(PROGRESS_STEPS);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% {msg}")
        .or_else(|_| ProgressStyle::default_bar().template("[{bar:40}] {percent}% {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style.progress_chars("=>-"));
    bar.enable_steady_tick(POLL_INTERVAL);
    bar
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    if options.input_paths.is_empty() {
        return Err(anyhow!("At least one INPUT_PATH is required"));
    }

    let config = build_config(&options)?;
    log::set_max_level(config.log_level.to_level_filter());

    let files = FileManager::collect_inputs(&options.input_paths)?;
    if files.is_empty() {
        warn!("No .srt files found in the given inputs");
        return Ok(());
    }

    let target_language = config.target_language.clone();
    let controller = Controller::with_config(config)?;
    info!(
        "Translating {} file(s) from {} to {}",
        files.len(),
        controller.config().source_language,
        language_utils::get_language_name(&target_language).unwrap_or_else(|_| target_language.clone())
    );

    let mut handle = controller.start_run(controller.session(files))?;
    let bar = progress_bar();
    let mut board = StatusBoard::new();
    let mut ticker = tokio::time::interval(POLL_INTERVAL);

    loop {
        ticker.tick().await;
        let task_ended = !handle.is_running();

        for message in handle.receiver_mut().drain() {
            match &message {
                StatusMessage::Log { severity, text } => {
                    bar.suspend(|| match severity {
                        Severity::Info => debug!("{}", text),
                        Severity::Warning => warn!("{}", text),
                        Severity::Error => error!("{}", text),
                    });
                    bar.set_message(text.clone());
                }
                StatusMessage::Progress { fraction, completed, total } => {
                    bar.set_position((fraction * PROGRESS_STEPS as f64).round() as u64);
                    debug!("Progress {:.1}% ({}/{} files done)", fraction * 100.0, completed, total);
                }
                StatusMessage::Done(_) => {}
            }
            board.apply(message);
        }

        if board.is_finished() {
            break;
        }
        if task_ended {
            bar.abandon();
            return Err(anyhow!("Translation run stopped without a result"));
        }
    }
    bar.finish_and_clear();

    let output = board.take_output().unwrap_or_default();
    let summary = RunSummary::from_files(&output);
    if let Some(last_error) = &board.last_error {
        warn!("Last error: {}", last_error);
    }

    let outcomes = controller.save_all(&output, &target_language);
    let written = outcomes.iter().filter(|o| matches!(o, SaveOutcome::Written(_))).count();
    let skipped = outcomes.iter().filter(|o| matches!(o, SaveOutcome::Skipped(_))).count();
    let failed = outcomes.len() - written - skipped;

    info!(
        "Done: {} file(s) written, {} skipped, {} failed; {} cue(s) in {} batch(es), {} batch(es) fell back",
        written, skipped, failed, summary.cues, summary.batches, summary.failed_batches
    );

    if failed > 0 {
        return Err(anyhow!("{} file(s) could not be saved", failed));
    }
    Ok(())
}
