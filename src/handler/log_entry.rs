//! Debug log records.

use crate::exception::Exception;
use crate::types::RuntimeError;
use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::backtrace::Backtrace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Error,
    Exception,
}

/// The dispatched event a [`LogEntry`] describes
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum LoggedEvent {
    Error(RuntimeError),
    Exception(Exception),
}

/// Immutable record of one dispatched error or exception
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    time: DateTime<Utc>,
    handled: bool,
    /// The error was silenced at its call site
    controlled: bool,
    event: LoggedEvent,
    trace: Option<String>,
}

impl LogEntry {
    pub fn error(error: RuntimeError, handled: bool, controlled: bool) -> Self {
        Self::new(LoggedEvent::Error(error), handled, controlled)
    }

    pub fn exception(exception: Exception, handled: bool) -> Self {
        Self::new(LoggedEvent::Exception(exception), handled, false)
    }

    fn new(event: LoggedEvent, handled: bool, controlled: bool) -> Self {
        Self {
            time: Utc::now().trunc_subsecs(6),
            handled,
            controlled,
            event,
            trace: None,
        }
    }

    /// Attaches a backtrace of the current thread
    pub fn with_trace(mut self) -> Self {
        self.trace = Some(Backtrace::force_capture().to_string());
        self
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn handled(&self) -> bool {
        self.handled
    }

    pub fn controlled(&self) -> bool {
        self.controlled
    }

    pub fn event(&self) -> &LoggedEvent {
        &self.event
    }

    pub fn trace(&self) -> Option<&str> {
        self.trace.as_deref()
    }

    pub fn kind(&self) -> EventKind {
        match self.event {
            LoggedEvent::Error(_) => EventKind::Error,
            LoggedEvent::Exception(_) => EventKind::Exception,
        }
    }

    pub fn message(&self) -> &str {
        match &self.event {
            LoggedEvent::Error(error) => &error.message,
            LoggedEvent::Exception(exception) => exception.message(),
        }
    }

    pub fn as_error(&self) -> Option<&RuntimeError> {
        match &self.event {
            LoggedEvent::Error(error) => Some(error),
            LoggedEvent::Exception(_) => None,
        }
    }

    pub fn as_exception(&self) -> Option<&Exception> {
        match &self.event {
            LoggedEvent::Exception(exception) => Some(exception),
            LoggedEvent::Error(_) => None,
        }
    }

    /// Flat fields passed to a [`crate::Logger`]
    pub fn to_fields(&self) -> Value {
        let mut fields = match &self.event {
            LoggedEvent::Error(error) => json!({
                "type": error.type_name(),
                "code": error.code,
                "file": error.file,
                "line": error.line,
            }),
            LoggedEvent::Exception(exception) => json!({
                "type": exception.kind().name(),
                "code": exception.code(),
                "case": exception.case().map(|case| case.to_string()),
                "context": exception.context(),
                "file": exception.file(),
                "line": exception.line(),
            }),
        };

        fields["time"] = json!(self.time.to_rfc3339());
        fields["handled"] = json!(self.handled);
        fields["controlled"] = json!(self.controlled);
        if let Some(trace) = &self.trace {
            fields["trace"] = json!(trace);
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::error_types::E_NOTICE;
    use crate::exception::{ErrorCase, SplError};
    use chrono::Timelike;

    #[test]
    fn test_error_entry_fields() {
        let entry = LogEntry::error(RuntimeError::new(E_NOTICE, "note").at("a.rs", 4), true, false);
        assert_eq!(entry.kind(), EventKind::Error);
        assert_eq!(entry.message(), "note");

        let fields = entry.to_fields();
        assert_eq!(fields["type"], json!("E_NOTICE"));
        assert_eq!(fields["line"], json!(4));
        assert_eq!(fields["handled"], json!(true));
        assert!(fields.get("trace").is_none());
    }

    #[test]
    fn test_exception_entry_fields() {
        let entry = LogEntry::exception(SplError::Range.exceptable(json!({"max": 3}), None), false);
        let fields = entry.to_fields();
        assert_eq!(fields["type"], json!("RangeException"));
        assert_eq!(fields["case"], json!("SplError.Range"));
        assert_eq!(fields["context"]["max"], json!(3));
        assert!(entry.as_exception().is_some());
        assert!(entry.as_error().is_none());
    }

    #[test]
    fn test_time_has_microsecond_precision() {
        let entry = LogEntry::exception(Exception::new(crate::ExceptionKind::Logic, "x"), true);
        assert_eq!(entry.time().nanosecond() % 1_000, 0);
    }

    #[test]
    fn test_trace_capture() {
        let entry = LogEntry::error(RuntimeError::new(E_NOTICE, "n"), false, false).with_trace();
        assert!(entry.trace().is_some());
        assert!(entry.to_fields().get("trace").is_some());
    }

    #[test]
    fn test_serializes_tagged_event() {
        let entry = LogEntry::error(RuntimeError::new(E_NOTICE, "n"), false, true);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["event"]["kind"], json!("error"));
        assert_eq!(value["controlled"], json!(true));
    }
}
