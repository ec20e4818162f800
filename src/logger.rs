//! # Logger Adapters
//!
//! The handler reports every dispatched event to an optional external [`Logger`]. Calls
//! are synchronous and fire-and-forget: the handler never inspects a response.

use crate::constants::error_types::*;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Logging severity vocabulary accepted by [`Logger`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

impl LogLevel {
    /// Fixed runtime error code → log level table
    pub fn for_error_code(code: i32) -> Self {
        match code {
            E_ERROR | E_USER_ERROR | E_RECOVERABLE_ERROR | E_CORE_ERROR | E_COMPILE_ERROR => {
                LogLevel::Critical
            }
            E_PARSE => LogLevel::Error,
            E_WARNING | E_USER_WARNING | E_CORE_WARNING | E_COMPILE_WARNING => LogLevel::Warning,
            E_NOTICE | E_USER_NOTICE => LogLevel::Notice,
            E_STRICT => LogLevel::Debug,
            E_DEPRECATED | E_USER_DEPRECATED => LogLevel::Info,
            _ => LogLevel::Notice,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Notice => "notice",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
            LogLevel::Alert => "alert",
            LogLevel::Emergency => "emergency",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External log sink
pub trait Logger: Send + Sync {
    fn log(&self, level: LogLevel, message: &str, fields: &Value);
}

/// Forwards log calls to `tracing`, folding the eight levels onto tracing's five
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str, fields: &Value) {
        let level_name = level.as_str();
        match level {
            LogLevel::Debug => tracing::debug!(log_level = level_name, fields = %fields, "{message}"),
            LogLevel::Info | LogLevel::Notice => {
                tracing::info!(log_level = level_name, fields = %fields, "{message}")
            }
            LogLevel::Warning => tracing::warn!(log_level = level_name, fields = %fields, "{message}"),
            LogLevel::Error | LogLevel::Critical | LogLevel::Alert | LogLevel::Emergency => {
                tracing::error!(log_level = level_name, fields = %fields, "{message}")
            }
        }
    }
}

/// One captured logger call
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub fields: Value,
}

/// Captures logger calls in memory
#[derive(Debug, Default)]
pub struct MemoryLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: LogLevel, message: &str, fields: &Value) {
        self.records.lock().push(LogRecord {
            level,
            message: message.to_string(),
            fields: fields.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_code_level_table() {
        assert_eq!(LogLevel::for_error_code(E_ERROR), LogLevel::Critical);
        assert_eq!(LogLevel::for_error_code(E_RECOVERABLE_ERROR), LogLevel::Critical);
        assert_eq!(LogLevel::for_error_code(E_PARSE), LogLevel::Error);
        assert_eq!(LogLevel::for_error_code(E_USER_WARNING), LogLevel::Warning);
        assert_eq!(LogLevel::for_error_code(E_NOTICE), LogLevel::Notice);
        assert_eq!(LogLevel::for_error_code(E_STRICT), LogLevel::Debug);
        assert_eq!(LogLevel::for_error_code(E_USER_DEPRECATED), LogLevel::Info);
        assert_eq!(LogLevel::for_error_code(E_WARNING | E_NOTICE), LogLevel::Notice);
    }

    #[test]
    fn test_memory_logger_captures_calls() {
        let logger = MemoryLogger::new();
        logger.log(LogLevel::Warning, "disk low", &json!({"free": 1}));
        let records = logger.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, LogLevel::Warning);
        assert_eq!(records[0].fields["free"], json!(1));
    }

    #[test]
    fn test_level_serializes_lowercase() {
        assert_eq!(serde_json::to_value(LogLevel::Critical).unwrap(), json!("critical"));
    }
}
