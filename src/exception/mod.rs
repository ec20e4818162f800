//! # Exceptable
//!
//! Structured exception values: a kind from a closed taxonomy, a numeric code, an
//! optional typed error case, free-form context, and a chain of causing exceptions.
//!
//! ## Usage
//!
//! ```rust
//! use exceptable::{Exception, ExceptionKind, SplError, ErrorCase};
//! use serde_json::json;
//!
//! let io = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml missing");
//! let cause = Exception::from_error(&io);
//! let e = SplError::UnexpectedValue.exceptable(json!({"path": "config.toml"}), Some(cause));
//!
//! assert_eq!(e.kind(), ExceptionKind::UnexpectedValue);
//! assert_eq!(e.root().message(), "config.toml missing");
//! assert!(e.has(&SplError::UnexpectedValue));
//! ```

pub mod case;
pub mod cases;
pub mod kind;

pub use case::{format_message, CaseId, ErrorCase};
pub use cases::{ExceptableError, SplError};
pub use kind::{Ancestry, ExceptionKind};

use crate::constants::context_keys::{ROOT_MESSAGE, ROOT_TYPE};
use crate::types::RuntimeError;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::panic::Location;

/// Free-form exception context
pub type Context = serde_json::Map<String, Value>;

/// An exception value
#[derive(Debug, Clone, Serialize)]
pub struct Exception {
    kind: ExceptionKind,
    code: i64,
    message: String,
    case: Option<CaseId>,
    context: Context,
    previous: Option<Box<Exception>>,
    file: String,
    line: u32,
}

impl Exception {
    /// Creates an exception of the given kind, located at the caller
    #[track_caller]
    pub fn new(kind: ExceptionKind, message: impl Into<String>) -> Self {
        let location = Location::caller();
        let mut exception = Self {
            kind,
            code: 0,
            message: message.into(),
            case: None,
            context: Context::new(),
            previous: None,
            file: location.file().to_string(),
            line: location.line(),
        };
        exception.refresh_root_context();
        exception
    }

    /// Creates an exception for an error case
    #[track_caller]
    pub fn from_case(case: &dyn ErrorCase, context: Value, previous: Option<Exception>) -> Self {
        let location = Location::caller();
        let mut context = into_context(context);

        match &previous {
            Some(previous) => {
                let root = previous.root();
                context.insert(ROOT_MESSAGE.to_string(), Value::from(root.message.clone()));
                context.insert(ROOT_TYPE.to_string(), Value::from(root.kind.name()));
            }
            None => {
                context.insert(ROOT_MESSAGE.to_string(), Value::from(""));
                context.insert(ROOT_TYPE.to_string(), Value::from(case.exception_kind().name()));
            }
        }

        Self {
            kind: case.exception_kind(),
            code: case.code(),
            message: case.message(&context),
            case: Some(case.id()),
            context,
            previous: previous.map(Box::new),
            file: location.file().to_string(),
            line: location.line(),
        }
    }

    /// Converts any error, and its `source()` chain, into an exception chain
    #[track_caller]
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let previous = error.source().map(Self::from_error);
        let exception = Self::new(ExceptionKind::Runtime, error.to_string());
        match previous {
            Some(previous) => exception.caused_by(previous),
            None => exception,
        }
    }

    /// Converts a panic payload into an exception
    #[track_caller]
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else if let Some(exception) = payload.downcast_ref::<Exception>() {
            return exception.clone();
        } else {
            "panic with non-string payload".to_string()
        };

        Self::new(ExceptionKind::Runtime, message).with_context(serde_json::json!({"panic": true}))
    }

    /// Converts a runtime error into an `ErrorException`, keeping its location
    pub fn from_runtime_error(error: &RuntimeError) -> Self {
        Self {
            kind: ExceptionKind::ErrorException,
            code: i64::from(error.code),
            message: error.message.clone(),
            case: None,
            context: Context::new(),
            previous: None,
            file: error.file.clone(),
            line: error.line,
        }
        .with_context(serde_json::json!({"severity": error.code}))
        .with_root_context()
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = code;
        self
    }

    /// Merges `context` (an object, or any value stored under `"value"`) into this exception
    pub fn with_context(mut self, context: Value) -> Self {
        self.context.extend(into_context(context));
        self
    }

    /// Sets the causing exception
    pub fn caused_by(mut self, previous: Exception) -> Self {
        self.previous = Some(Box::new(previous));
        self.with_root_context()
    }

    /// Overrides the reported source location
    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = file.into();
        self.line = line;
        self
    }

    pub fn kind(&self) -> ExceptionKind {
        self.kind
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn case(&self) -> Option<CaseId> {
        self.case
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn previous(&self) -> Option<&Exception> {
        self.previous.as_deref()
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// `(file, line)` where the exception was created
    pub fn location(&self) -> (&str, u32) {
        (&self.file, self.line)
    }

    /// This exception followed by each causing exception
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    /// The innermost causing exception (or `self`)
    pub fn root(&self) -> &Exception {
        self.chain().last().unwrap_or(self)
    }

    /// True if this exception was created for `case`
    pub fn is(&self, case: &dyn ErrorCase) -> bool {
        self.case == Some(case.id())
    }

    /// True if this exception or any cause was created for `case`
    pub fn has(&self, case: &dyn ErrorCase) -> bool {
        self.has_case(case.id())
    }

    pub fn has_case(&self, id: CaseId) -> bool {
        self.chain().any(|e| e.case == Some(id))
    }

    fn with_root_context(mut self) -> Self {
        self.refresh_root_context();
        self
    }

    fn refresh_root_context(&mut self) {
        let (message, kind) = {
            let root = self.root();
            (root.message.clone(), root.kind)
        };
        self.context.insert(ROOT_MESSAGE.to_string(), Value::from(message));
        self.context.insert(ROOT_TYPE.to_string(), Value::from(kind.name()));
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Exception {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.previous
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Iterator over an exception's cause chain
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: Option<&'a Exception>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Exception;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.previous.as_deref();
        Some(current)
    }
}

fn into_context(value: Value) -> Context {
    match value {
        Value::Object(map) => map,
        Value::Null => Context::new(),
        other => {
            let mut map = Context::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::error_types::E_WARNING;
    use serde_json::json;

    #[test]
    fn test_new_exception_is_its_own_root() {
        let e = Exception::new(ExceptionKind::Domain, "bad input");
        assert_eq!(e.root().message(), "bad input");
        assert_eq!(e.context()[ROOT_TYPE], json!("DomainException"));
        assert!(e.file().ends_with("mod.rs"));
    }

    #[test]
    fn test_cause_chain_traversal() {
        let root = Exception::new(ExceptionKind::Exception, "root").with_code(42);
        let middle = Exception::new(ExceptionKind::Logic, "middle").caused_by(root);
        let top = ExceptableError::UnknownError.exceptable(json!({}), Some(middle));

        assert_eq!(top.chain().count(), 3);
        assert_eq!(top.root().code(), 42);
        assert_eq!(top.message(), "ExceptableError.UnknownError: root");
        assert!(top.has(&ExceptableError::UnknownError));
        assert!(!top.previous().map(|e| e.has(&ExceptableError::UnknownError)).unwrap_or(true));
    }

    #[test]
    fn test_from_error_keeps_sources() {
        #[derive(Debug, thiserror::Error)]
        #[error("outer failure")]
        struct Outer(#[source] std::io::Error);

        let error = Outer(std::io::Error::other("inner failure"));
        let e = Exception::from_error(&error);
        assert_eq!(e.message(), "outer failure");
        assert_eq!(e.root().message(), "inner failure");
        assert_eq!(e.context()[ROOT_MESSAGE], json!("inner failure"));
    }

    #[test]
    fn test_from_panic_payloads() {
        let e = Exception::from_panic(&"static str");
        assert_eq!(e.message(), "static str");
        let e = Exception::from_panic(&String::from("owned"));
        assert_eq!(e.message(), "owned");
        assert_eq!(e.context()["panic"], json!(true));
    }

    #[test]
    fn test_from_runtime_error() {
        let error = RuntimeError::new(E_WARNING, "watch out").at("lib.rs", 3);
        let e = Exception::from_runtime_error(&error);
        assert_eq!(e.kind(), ExceptionKind::ErrorException);
        assert_eq!(e.code(), i64::from(E_WARNING));
        assert_eq!((e.file(), e.line()), ("lib.rs", 3));
    }

    #[test]
    fn test_scalar_context_is_wrapped() {
        let e = Exception::new(ExceptionKind::Exception, "x").with_context(json!(7));
        assert_eq!(e.context()["value"], json!(7));
    }

    #[test]
    fn test_std_error_source() {
        use std::error::Error as _;
        let e = Exception::new(ExceptionKind::Logic, "top")
            .caused_by(Exception::new(ExceptionKind::Exception, "bottom"));
        assert_eq!(e.source().map(|s| s.to_string()).as_deref(), Some("Exception: bottom"));
    }
}
