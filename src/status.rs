/*!
 * Progress and status reporting.
 *
 * A run reports through a queue with many producers and one consumer. The
 * consumer polls at a fixed interval, drains whatever is queued without
 * blocking and folds it into a `StatusBoard`.
 */

use std::fmt;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::mpsc::error::TryRecvError;

/// Severity of a log message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// One message of a run's status stream
#[derive(Debug, Clone, PartialEq)]
pub enum StatusMessage<T> {
    /// A line for the log view
    Log { severity: Severity, text: String },
    /// Overall fraction in [0, 1] and the number of files finished out of `total`
    Progress { fraction: f64, completed: usize, total: usize },
    /// The run finished; carries its output
    Done(T),
}

/// Producer side; cheap to clone
#[derive(Debug)]
pub struct StatusSender<T> {
    inner: UnboundedSender<StatusMessage<T>>,
}

impl<T> Clone for StatusSender<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> StatusSender<T> {
    /// Queue a message. A dropped consumer is not an error for the producer.
    pub fn send(&self, message: StatusMessage<T>) {
        let _ = self.inner.send(message);
    }

    pub fn log(&self, severity: Severity, text: impl Into<String>) {
        self.send(StatusMessage::Log {
            severity,
            text: text.into(),
        });
    }

    pub fn progress(&self, fraction: f64, completed: usize, total: usize) {
        self.send(StatusMessage::Progress {
            fraction,
            completed,
            total,
        });
    }

    pub fn done(&self, output: T) {
        self.send(StatusMessage::Done(output));
    }
}

/// Consumer side
#[derive(Debug)]
pub struct StatusReceiver<T> {
    inner: UnboundedReceiver<StatusMessage<T>>,
}

impl<T> StatusReceiver<T> {
    /// Take every message queued right now; never waits
    pub fn drain(&mut self) -> Vec<StatusMessage<T>> {
        let mut messages = Vec::new();
        loop {
            match self.inner.try_recv() {
                Ok(message) => messages.push(message),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        messages
    }

    /// Wait for the next message; `None` once every sender is gone
    pub async fn recv(&mut self) -> Option<StatusMessage<T>> {
        self.inner.recv().await
    }
}

/// Create a status queue
pub fn channel<T>() -> (StatusSender<T>, StatusReceiver<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (StatusSender { inner: tx }, StatusReceiver { inner: rx })
}

/// Observable state built from a status stream
#[derive(Debug)]
pub struct StatusBoard<T> {
    /// Overall progress in [0, 1]
    pub fraction: f64,
    /// Most recent status line
    pub status_line: String,
    /// Most recent error line, if any
    pub last_error: Option<String>,
    /// Every log line received, in order
    pub log: Vec<(Severity, String)>,
    /// Output of the run once `Done` arrived
    pub output: Option<T>,
}

impl<T> Default for StatusBoard<T> {
    fn default() -> Self {
        Self {
            fraction: 0.0,
            status_line: String::new(),
            last_error: None,
            log: Vec::new(),
            output: None,
        }
    }
}

impl<T> StatusBoard<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one message into the board
    pub fn apply(&mut self, message: StatusMessage<T>) {
        match message {
            StatusMessage::Log { severity, text } => {
                if severity == Severity::Error {
                    self.last_error = Some(text.clone());
                }
                self.status_line = text.clone();
                self.log.push((severity, text));
            }
            StatusMessage::Progress { fraction, .. } => {
                self.fraction = fraction.clamp(0.0, 1.0).max(self.fraction);
            }
            StatusMessage::Done(output) => {
                self.fraction = 1.0;
                self.output = Some(output);
            }
        }
    }

    /// Drain the receiver into the board; returns how many messages were applied
    pub fn poll(&mut self, receiver: &mut StatusReceiver<T>) -> usize {
        let messages = receiver.drain();
        let count = messages.len();
        for message in messages {
            self.apply(message);
        }
        count
    }

    pub fn is_finished(&self) -> bool {
        self.output.is_some()
    }

    /// Take the run output, leaving the board unfinished
    pub fn take_output(&mut self) -> Option<T> {
        self.output.take()
    }
}

/// Overall progress of a multi-file run.
///
/// The fraction is `(files done + fraction of current file) / files` and never
/// goes backwards.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total_files: usize,
    last: f64,
}

impl ProgressTracker {
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files: total_files.max(1),
            last: 0.0,
        }
    }

    /// Fraction after `done` of `total` cues of file `file_index` (0-based) are merged.
    ///
    /// A file with nothing to translate counts as complete.
    pub fn update(&mut self, file_index: usize, done: usize, total: usize) -> f64 {
        let within = if total == 0 {
            1.0
        } else {
            (done.min(total) as f64) / (total as f64)
        };
        let fraction = ((file_index as f64 + within) / self.total_files as f64).min(1.0);
        self.last = self.last.max(fraction);
        self.last
    }

    /// Mark file `file_index` as complete
    pub fn file_done(&mut self, file_index: usize) -> f64 {
        self.update(file_index, 1, 1)
    }

    pub fn current(&self) -> f64 {
        self.last
    }
}

/// Shorten a message to `max_chars` characters for a status line
pub fn truncate_message(message: &str, max_chars: usize) -> String {
    if message.chars().count() <= max_chars {
        message.to_string()
    } else {
        let mut shortened: String = message.chars().take(max_chars).collect();
        shortened.push_str("...");
        shortened
    }
}
