use chrono::Local;
use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::panic::PanicHookInfo;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }
}

pub trait Logger {
    fn log(&self, level: Level, message: &str);

    fn start(&self) {
        self.info(&format!(
            "{} {} starting",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ));
    }

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warning(&self, message: &str) {
        self.log(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    fn panic(&self, info: &PanicHookInfo<'_>) {
        self.error(&format!("Panic: {}", info));
    }
}

/// Writes every line to stderr and, when configured, appends it to a log file.
/// Stdout is left alone: it carries the JSON result.
pub struct SinkLogger {
    file: RefCell<Option<File>>,
}

impl SinkLogger {
    pub fn new(log_file: Option<&Path>) -> Self {
        let file = log_file.and_then(|path| match open_append(path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("Unable to open log file {}: {}", path.display(), e);
                None
            }
        });

        Self {
            file: RefCell::new(file),
        }
    }
}

fn open_append(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn render(level: Level, message: &str) -> String {
    format!(
        "{} - {} - {}",
        Local::now().format(TIMESTAMP_FORMAT),
        level.as_str(),
        message
    )
}

impl Logger for SinkLogger {
    fn log(&self, level: Level, message: &str) {
        let line = render(level, message);

        eprintln!("{}", line);

        if let Some(file) = self.file.borrow_mut().as_mut() {
            // Logging is best-effort; a full disk must not change the result.
            _ = writeln!(file, "{}", line);
        }
    }
}

pub fn get_logger(log_file: Option<PathBuf>) -> SinkLogger {
    SinkLogger::new(log_file.as_deref())
}

/// Keeps lines in memory so tests can inspect what was logged.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryLogger {
    pub lines: RefCell<Vec<(Level, String)>>,
}

#[cfg(test)]
impl MemoryLogger {
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.lines
            .borrow()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }
}

#[cfg(test)]
impl Logger for MemoryLogger {
    fn log(&self, level: Level, message: &str) {
        self.lines.borrow_mut().push((level, message.to_string()));
    }
}
