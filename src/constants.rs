//! # System Constants
//!
//! Runtime error type codes, sentinel values, and well-known context keys shared by
//! the handler, the exception types, and the host hook tables.
//!
//! Error type codes are bit flags so that a single registration can cover several of
//! them (`E_WARNING | E_USER_WARNING`). The numeric values follow the conventional
//! `E_*` table so codes stay recognisable in logs and log aggregation.

/// Runtime error type bit flags
pub mod error_types {
    pub const E_ERROR: i32 = 1;
    pub const E_WARNING: i32 = 2;
    pub const E_PARSE: i32 = 4;
    pub const E_NOTICE: i32 = 8;
    pub const E_CORE_ERROR: i32 = 16;
    pub const E_CORE_WARNING: i32 = 32;
    pub const E_COMPILE_ERROR: i32 = 64;
    pub const E_COMPILE_WARNING: i32 = 128;
    pub const E_USER_ERROR: i32 = 256;
    pub const E_USER_WARNING: i32 = 512;
    pub const E_USER_NOTICE: i32 = 1024;
    pub const E_STRICT: i32 = 2048;
    pub const E_RECOVERABLE_ERROR: i32 = 4096;
    pub const E_DEPRECATED: i32 = 8192;
    pub const E_USER_DEPRECATED: i32 = 16384;

    /// Every defined error type
    pub const E_ALL: i32 = 32767;

    /// Registration shorthand for "any error type"
    pub const ANY: i32 = -1;

    /// Error types that terminate the script/process when left unhandled
    pub const FATAL: i32 = E_ERROR | E_CORE_ERROR | E_COMPILE_ERROR | E_USER_ERROR | E_RECOVERABLE_ERROR;

    pub const WARNINGS: i32 = E_WARNING | E_CORE_WARNING | E_COMPILE_WARNING | E_USER_WARNING;

    pub const NOTICES: i32 = E_NOTICE | E_USER_NOTICE | E_STRICT;

    pub const DEPRECATIONS: i32 = E_DEPRECATED | E_USER_DEPRECATED;

    /// Human-readable name for a single error type code
    pub fn name(code: i32) -> &'static str {
        match code {
            E_ERROR => "E_ERROR",
            E_WARNING => "E_WARNING",
            E_PARSE => "E_PARSE",
            E_NOTICE => "E_NOTICE",
            E_CORE_ERROR => "E_CORE_ERROR",
            E_CORE_WARNING => "E_CORE_WARNING",
            E_COMPILE_ERROR => "E_COMPILE_ERROR",
            E_COMPILE_WARNING => "E_COMPILE_WARNING",
            E_USER_ERROR => "E_USER_ERROR",
            E_USER_WARNING => "E_USER_WARNING",
            E_USER_NOTICE => "E_USER_NOTICE",
            E_STRICT => "E_STRICT",
            E_RECOVERABLE_ERROR => "E_RECOVERABLE_ERROR",
            E_DEPRECATED => "E_DEPRECATED",
            E_USER_DEPRECATED => "E_USER_DEPRECATED",
            _ => "E_UNKNOWN",
        }
    }
}

/// Exception handler code sentinel meaning "any code for this kind"
pub const ANY_CODE: i64 = 0;

/// Context keys populated on every exception
pub mod context_keys {
    pub const ROOT_MESSAGE: &str = "__rootMessage__";
    pub const ROOT_TYPE: &str = "__rootType__";
}

/// Environment variables read by [`crate::config::HandlerOptions::from_env`]
pub mod env {
    pub const DEBUG: &str = "EXCEPTABLE_DEBUG";
    pub const SCREAM: &str = "EXCEPTABLE_SCREAM";
    pub const THROW: &str = "EXCEPTABLE_THROW";
    pub const PREFIX: &str = "EXCEPTABLE";
}

#[cfg(test)]
mod tests {
    use super::error_types::*;

    #[test]
    fn test_e_all_covers_every_type() {
        let all = [
            E_ERROR,
            E_WARNING,
            E_PARSE,
            E_NOTICE,
            E_CORE_ERROR,
            E_CORE_WARNING,
            E_COMPILE_ERROR,
            E_COMPILE_WARNING,
            E_USER_ERROR,
            E_USER_WARNING,
            E_USER_NOTICE,
            E_STRICT,
            E_RECOVERABLE_ERROR,
            E_DEPRECATED,
            E_USER_DEPRECATED,
        ];
        assert_eq!(all.iter().fold(0, |acc, c| acc | c), E_ALL);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(name(E_USER_WARNING), "E_USER_WARNING");
        assert_eq!(name(3), "E_UNKNOWN");
    }
}
