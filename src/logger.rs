//! Pluggable progress loggers.
//!
//! The engine's `[RETRY]` progress lines go through a minimal [`Logger`]
//! seam. Two reference implementations ship with the crate: write to
//! standard output and append to a file, each selectable via a
//! [`LoggerFactory`]. Loggers carry no decision logic.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Minimal logging capability consumed by the retry engine.
pub trait Logger: Send + Sync + fmt::Debug {
    /// Emit a single-line, human-readable message.
    fn log(&self, message: &str);
}

/// Creates a logger; lets hosts defer the choice of sink.
pub trait LoggerFactory: Send + Sync + fmt::Debug {
    fn create_logger(&self) -> Arc<dyn Logger>;
}

/// Logger writing one line per message to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutLogger;

impl Logger for StdoutLogger {
    fn log(&self, message: &str) {
        println!("{message}");
    }
}

/// Factory for [`StdoutLogger`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutLoggerFactory;

impl LoggerFactory for StdoutLoggerFactory {
    fn create_logger(&self) -> Arc<dyn Logger> {
        Arc::new(StdoutLogger)
    }
}

/// Logger appending one line per message to a file.
///
/// Logging is best effort: an unwritable file is reported through
/// `tracing` and the message is dropped rather than failing the test run.
#[derive(Debug, Clone)]
pub struct FileLogger {
    path: PathBuf,
}

impl FileLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Logger for FileLogger {
    fn log(&self, message: &str) {
        let result = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| writeln!(file, "{message}"));
        if let Err(error) = result {
            tracing::warn!(path = %self.path.display(), %error, "failed to append log line");
        }
    }
}

/// Factory for [`FileLogger`].
#[derive(Debug, Clone)]
pub struct FileLoggerFactory {
    path: PathBuf,
}

impl FileLoggerFactory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LoggerFactory for FileLoggerFactory {
    fn create_logger(&self) -> Arc<dyn Logger> {
        Arc::new(FileLogger::new(self.path.clone()))
    }
}

/// Test logger that stores messages in memory.
#[derive(Debug, Clone)]
pub struct MemoryLogger {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self { lines: Arc::new(Mutex::new(Vec::new())) }
    }

    /// All logged lines, in emission order.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap().clear();
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_logger_records_in_order() {
        let logger = MemoryLogger::new();
        logger.log("first");
        logger.log("second");
        assert_eq!(logger.lines(), vec!["first".to_string(), "second".to_string()]);

        logger.clear();
        assert!(logger.lines().is_empty());
    }

    #[test]
    fn file_logger_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("retry.log");

        let logger = FileLoggerFactory::new(&path).create_logger();
        logger.log("[RETRY] Retrying 1 of 3");
        logger.log("[RETRY] Retrying 2 of 3");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "[RETRY] Retrying 1 of 3\n[RETRY] Retrying 2 of 3\n");
    }

    #[test]
    fn file_logger_swallows_unwritable_path() {
        let logger = FileLogger::new("/definitely/not/a/real/dir/retry.log");
        // Must not panic; the line is dropped.
        logger.log("lost");
    }

    #[test]
    fn stdout_factory_creates_logger() {
        let logger = StdoutLoggerFactory.create_logger();
        logger.log("[RETRY] Retrying 1 of 1");
    }
}
