//! Module log levels and the tracing-only log sink.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LogError;
use crate::ports::ModuleLog;

/// Integration log level, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum LogLevel {
    Error,
    Warning,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    /// Numeric id used by the OneVizion integration log (`Error` = 0).
    pub fn id(self) -> u8 {
        match self {
            LogLevel::Error => 0,
            LogLevel::Warning => 1,
            LogLevel::Info => 2,
            LogLevel::Debug => 3,
        }
    }

    /// Whether an event at `event` passes a sink configured at `self`.
    pub fn allows(self, event: LogLevel) -> bool {
        event.id() <= self.id()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Error => write!(f, "Error"),
            LogLevel::Warning => write!(f, "Warning"),
            LogLevel::Info => write!(f, "Info"),
            LogLevel::Debug => write!(f, "Debug"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            other => Err(format!(
                "unknown log level '{other}'; expected: error, warning, info, debug"
            )),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = String;

    fn try_from(s: String) -> Result<Self, String> {
        s.parse()
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.to_string()
    }
}

/// Emit one module log event through `tracing`.
pub fn emit(level: LogLevel, message: &str, description: &str) {
    match level {
        LogLevel::Error => tracing::error!(description, "{message}"),
        LogLevel::Warning => tracing::warn!(description, "{message}"),
        LogLevel::Info => tracing::info!(description, "{message}"),
        LogLevel::Debug => tracing::debug!(description, "{message}"),
    }
}

/// A [`ModuleLog`] that only writes to the process' tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl ModuleLog for TracingLog {
    fn add(&self, level: LogLevel, message: &str, description: &str) -> Result<(), LogError> {
        emit(level, message, description);
        Ok(())
    }
}
