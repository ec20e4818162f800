//! Built-in error cases.

use super::{ErrorCase, ExceptionKind};
use serde::Serialize;

/// Error cases raised by the library itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExceptableError {
    UnacceptableError = 0,
    UncaughtException = 1,
    UnknownError = 2,
    HandlerFailed = 3,
}

impl ErrorCase for ExceptableError {
    fn group(&self) -> &'static str {
        "ExceptableError"
    }

    fn name(&self) -> &'static str {
        match self {
            Self::UnacceptableError => "UnacceptableError",
            Self::UncaughtException => "UncaughtException",
            Self::UnknownError => "UnknownError",
            Self::HandlerFailed => "HandlerFailed",
        }
    }

    fn code(&self) -> i64 {
        *self as i64
    }

    fn template(&self) -> &'static str {
        match self {
            Self::UnacceptableError => "Invalid Error type '{type}'",
            Self::UncaughtException => "Uncaught Exception ({__rootType__}): {__rootMessage__}",
            Self::UnknownError => "{__rootMessage__}",
            Self::HandlerFailed => "{handler} handler ({type}) failed: {failure}",
        }
    }

    fn exception_kind(&self) -> ExceptionKind {
        match self {
            Self::UnacceptableError | Self::HandlerFailed => ExceptionKind::Logic,
            Self::UncaughtException | Self::UnknownError => ExceptionKind::Runtime,
        }
    }
}

/// Error cases corresponding to the standard exception kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SplError {
    BadFunctionCall = 1,
    BadMethodCall = 2,
    Domain = 3,
    InvalidArgument = 4,
    Length = 5,
    Logic = 6,
    OutOfBounds = 7,
    OutOfRange = 8,
    Overflow = 9,
    Range = 10,
    Runtime = 11,
    Underflow = 12,
    UnexpectedValue = 13,
}

impl ErrorCase for SplError {
    fn group(&self) -> &'static str {
        "SplError"
    }

    fn name(&self) -> &'static str {
        match self {
            Self::BadFunctionCall => "BadFunctionCall",
            Self::BadMethodCall => "BadMethodCall",
            Self::Domain => "Domain",
            Self::InvalidArgument => "InvalidArgument",
            Self::Length => "Length",
            Self::Logic => "Logic",
            Self::OutOfBounds => "OutOfBounds",
            Self::OutOfRange => "OutOfRange",
            Self::Overflow => "Overflow",
            Self::Range => "Range",
            Self::Runtime => "Runtime",
            Self::Underflow => "Underflow",
            Self::UnexpectedValue => "UnexpectedValue",
        }
    }

    fn code(&self) -> i64 {
        *self as i64
    }

    fn template(&self) -> &'static str {
        "{__rootMessage__}"
    }

    fn exception_kind(&self) -> ExceptionKind {
        match self {
            Self::BadFunctionCall => ExceptionKind::BadFunctionCall,
            Self::BadMethodCall => ExceptionKind::BadMethodCall,
            Self::Domain => ExceptionKind::Domain,
            Self::InvalidArgument => ExceptionKind::InvalidArgument,
            Self::Length => ExceptionKind::Length,
            Self::Logic => ExceptionKind::Logic,
            Self::OutOfBounds => ExceptionKind::OutOfBounds,
            Self::OutOfRange => ExceptionKind::OutOfRange,
            Self::Overflow => ExceptionKind::Overflow,
            Self::Range => ExceptionKind::Range,
            Self::Runtime => ExceptionKind::Runtime,
            Self::Underflow => ExceptionKind::Underflow,
            Self::UnexpectedValue => ExceptionKind::UnexpectedValue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exception::Exception;
    use serde_json::json;

    #[test]
    fn test_spl_cases_map_to_matching_kinds() {
        let e = SplError::Overflow.exceptable(json!(null), None);
        assert_eq!(e.kind(), ExceptionKind::Overflow);
        assert_eq!(e.code(), 9);
    }

    #[test]
    fn test_spl_message_uses_root_message() {
        let cause = Exception::new(ExceptionKind::Exception, "stack is full");
        let e = SplError::Overflow.exceptable(json!({}), Some(cause));
        assert_eq!(e.message(), "SplError.Overflow: stack is full");
    }

    #[test]
    fn test_uncaught_message_names_root_kind() {
        let cause = Exception::new(ExceptionKind::Domain, "out of domain");
        let e = ExceptableError::UncaughtException.exceptable(json!({}), Some(cause));
        assert_eq!(
            e.message(),
            "ExceptableError.UncaughtException: Uncaught Exception (DomainException): out of domain"
        );
        assert_eq!(e.kind(), ExceptionKind::Runtime);
    }

    #[test]
    fn test_unformattable_message_falls_back_to_name() {
        let e = ExceptableError::UnacceptableError.exceptable(json!({}), None);
        assert_eq!(e.message(), "ExceptableError.UnacceptableError");
        assert_eq!(e.kind(), ExceptionKind::Logic);
    }
}
