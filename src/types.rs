//! # Runtime Error Classification
//!
//! Value types describing a raw runtime error event: the bitmask of error types a
//! handler is registered for, the three canonical severities exposed to handlers,
//! and the `RuntimeError` record itself.

use crate::constants::error_types::{self, DEPRECATIONS, E_PARSE, FATAL, WARNINGS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::panic::Location;

/// Bitmask of runtime error types
///
/// `-1` (`ErrorTypes::ALL`) matches every code; `0` (`ErrorTypes::NONE`) matches none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorTypes(i32);

impl ErrorTypes {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(error_types::ANY);

    pub const fn new(bits: i32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> i32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Membership test: every bit of `code` must be present in this mask
    pub const fn contains(self, code: i32) -> bool {
        code != 0 && (code & self.0) == code
    }
}

impl From<i32> for ErrorTypes {
    fn from(bits: i32) -> Self {
        Self(bits)
    }
}

impl BitOr for ErrorTypes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<i32> for ErrorTypes {
    type Output = Self;

    fn bitor(self, rhs: i32) -> Self {
        Self(self.0 | rhs)
    }
}

impl BitOrAssign for ErrorTypes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Canonical severity exposed to handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Notice,
}

impl Severity {
    /// Collapses a runtime error code onto one of the three severities
    pub fn from_code(code: i32) -> Self {
        if code & (FATAL | E_PARSE) != 0 {
            Severity::Error
        } else if code & WARNINGS != 0 {
            Severity::Warning
        } else {
            Severity::Notice
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Notice => write!(f, "notice"),
        }
    }
}

/// A raw runtime error as reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeError {
    pub code: i32,
    pub message: String,
    pub file: String,
    pub line: u32,
}

impl RuntimeError {
    /// Creates a runtime error located at the caller
    #[track_caller]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        let location = Location::caller();
        Self {
            code,
            message: message.into(),
            file: location.file().to_string(),
            line: location.line(),
        }
    }

    /// Overrides the reported source location
    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = file.into();
        self.line = line;
        self
    }

    pub fn severity(&self) -> Severity {
        Severity::from_code(self.code)
    }

    pub fn is_fatal(&self) -> bool {
        self.code & FATAL != 0
    }

    pub fn is_deprecation(&self) -> bool {
        self.code & DEPRECATIONS != 0
    }

    pub fn type_name(&self) -> &'static str {
        error_types::name(self.code)
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} in {}:{}",
            self.type_name(),
            self.message,
            self.file,
            self.line
        )
    }
}
