//! Leveled logging capability injected into the driver.
//!
//! The driver only emits lifecycle and debug notices through this trait; it
//! never makes decisions based on logging. Three implementations ship with
//! the crate:
//!
//! - [`ConsoleLogger`] -- writes plain lines to stderr (the default)
//! - [`TracingLogger`] -- forwards to the `tracing` macros
//! - [`NoopLogger`] -- discards everything

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity of a log line, ordered from least to most severe.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// A leveled logger.
///
/// Implementors provide [`Logger::log`]; the per-level methods forward to it.
/// Messages are passed as [`fmt::Arguments`], so call sites use
/// `format_args!`:
///
/// ```
/// use docdb_store::{Logger, NoopLogger};
///
/// let log = NoopLogger;
/// log.debug(format_args!("creating database in '{}'", "./store"));
/// ```
pub trait Logger: Send + Sync {
    /// Emit a message at the given level.
    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>);

    fn fatal(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Fatal, args)
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Error, args)
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Warn, args)
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Info, args)
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Debug, args)
    }

    fn trace(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Trace, args)
    }
}

/// Writes `LEVEL timestamp message` lines to stderr.
///
/// Lines below the configured minimum level are dropped. Binaries that
/// already install `tracing_subscriber::fmt()` should pass [`TracingLogger`].
#[derive(Clone, Debug)]
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn format_line(level: LogLevel, args: fmt::Arguments<'_>) -> String {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        format!("{:<5} {now} {args}", level.as_str())
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new(LogLevel::default())
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if level < self.min_level {
            return;
        }
        let line = Self::format_line(level, args);
        // Write errors on stderr are dropped.
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }
}

/// Forwards log lines to the `tracing` ecosystem.
///
/// `Fatal` has no `tracing` counterpart and is emitted at error level with a
/// `fatal = true` field.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        match level {
            LogLevel::Trace => tracing::trace!("{args}"),
            LogLevel::Debug => tracing::debug!("{args}"),
            LogLevel::Info => tracing::info!("{args}"),
            LogLevel::Warn => tracing::warn!("{args}"),
            LogLevel::Error => tracing::error!("{args}"),
            LogLevel::Fatal => tracing::error!(fatal = true, "{args}"),
        }
    }
}

/// Discards every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _level: LogLevel, _args: fmt::Arguments<'_>) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Captures formatted lines for assertions.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingLogger {
        lines: Mutex<Vec<(LogLevel, String)>>,
    }

    impl RecordingLogger {
        pub(crate) fn lines(&self) -> Vec<(LogLevel, String)> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl Logger for RecordingLogger {
        fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
            self.lines.lock().unwrap().push((level, args.to_string()));
        }
    }
}
