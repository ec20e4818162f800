//! Closed taxonomy of exception kinds.
//!
//! Each kind declares its parent explicitly, so handler resolution can walk the
//! ancestry of a kind without any runtime type introspection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Exception kind, with `Throwable` as the universal base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExceptionKind {
    Throwable,
    Exception,
    /// A runtime error converted into an exception
    ErrorException,
    Logic,
    BadFunctionCall,
    BadMethodCall,
    Domain,
    InvalidArgument,
    Length,
    OutOfRange,
    Runtime,
    OutOfBounds,
    Overflow,
    Range,
    Underflow,
    UnexpectedValue,
}

impl ExceptionKind {
    pub const ALL: [ExceptionKind; 16] = [
        ExceptionKind::Throwable,
        ExceptionKind::Exception,
        ExceptionKind::ErrorException,
        ExceptionKind::Logic,
        ExceptionKind::BadFunctionCall,
        ExceptionKind::BadMethodCall,
        ExceptionKind::Domain,
        ExceptionKind::InvalidArgument,
        ExceptionKind::Length,
        ExceptionKind::OutOfRange,
        ExceptionKind::Runtime,
        ExceptionKind::OutOfBounds,
        ExceptionKind::Overflow,
        ExceptionKind::Range,
        ExceptionKind::Underflow,
        ExceptionKind::UnexpectedValue,
    ];

    /// Direct parent kind; `None` only for `Throwable`
    pub const fn parent(self) -> Option<ExceptionKind> {
        use ExceptionKind::*;
        match self {
            Throwable => None,
            Exception => Some(Throwable),
            ErrorException | Logic | Runtime => Some(Exception),
            BadFunctionCall | Domain | InvalidArgument | Length | OutOfRange => Some(Logic),
            BadMethodCall => Some(BadFunctionCall),
            OutOfBounds | Overflow | Range | Underflow | UnexpectedValue => Some(Runtime),
        }
    }

    /// This kind followed by each ancestor, ending with `Throwable`
    pub fn ancestry(self) -> Ancestry {
        Ancestry { next: Some(self) }
    }

    /// True if `self` is `other` or descends from it
    pub fn is_a(self, other: ExceptionKind) -> bool {
        self.ancestry().any(|kind| kind == other)
    }

    pub const fn name(self) -> &'static str {
        use ExceptionKind::*;
        match self {
            Throwable => "Throwable",
            Exception => "Exception",
            ErrorException => "ErrorException",
            Logic => "LogicException",
            BadFunctionCall => "BadFunctionCallException",
            BadMethodCall => "BadMethodCallException",
            Domain => "DomainException",
            InvalidArgument => "InvalidArgumentException",
            Length => "LengthException",
            OutOfRange => "OutOfRangeException",
            Runtime => "RuntimeException",
            OutOfBounds => "OutOfBoundsException",
            Overflow => "OverflowException",
            Range => "RangeException",
            Underflow => "UnderflowException",
            UnexpectedValue => "UnexpectedValueException",
        }
    }
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Iterator over a kind's ancestry chain
#[derive(Debug, Clone)]
pub struct Ancestry {
    next: Option<ExceptionKind>,
}

impl Iterator for Ancestry {
    type Item = ExceptionKind;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}
