#![allow(clippy::doc_markdown)] // Allow technical terms like ErrorException in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Exceptable
//!
//! Structured exceptions and a process-wide error, exception and shutdown handler.
//!
//! ## Overview
//!
//! The crate augments Rust's native error primitives with:
//!
//! - **Error cases**: named, enumerable failure conditions carrying a code and a message
//!   template ([`ErrorCase`])
//! - **Exceptables**: exception values recording an error case, free-form context and a
//!   chain of causing exceptions ([`Exception`])
//! - **A handler registry**: intercepts runtime errors, uncaught exceptions and process
//!   shutdown, and dispatches them to registered handlers in a defined order ([`Handler`])
//!
//! ## Module Organization
//!
//! - [`exception`] - Exception values, kinds and error cases
//! - [`handler`] - Handler registration, dispatch and lifecycle
//! - [`registry`] - Handler storage and resolution order
//! - [`hooks`] - Host hook tables the handler installs itself into
//! - [`logger`] - External logger adapters
//! - [`config`] - Handler options
//! - [`error`] - Library errors
//! - [`logging`] - Structured `tracing` setup
//! - [`outcome`] - Result helper capturing failures as exceptions
//!
//! ## Quick Start
//!
//! ```rust
//! use exceptable::{
//!     ErrorCase, Exception, ExceptionKind, Handler, HandlerOptions, RecordingHooks, SplError,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # fn main() -> exceptable::Result<()> {
//! let handler = Handler::with_hooks(HandlerOptions::default(), Arc::new(RecordingHooks::new()));
//! handler.on_exceptable(|e: &Exception| Ok(e.context().contains_key("index")), &[&SplError::OutOfRange])?;
//!
//! let handled = handler.try_run(|| -> Result<(), Exception> {
//!     Err(SplError::OutOfRange.exceptable(json!({"index": 12}), None))
//! });
//! assert!(matches!(handled, Ok(None)));
//!
//! let uncaught = handler
//!     .try_run(|| -> Result<(), Exception> { Err(Exception::new(ExceptionKind::Logic, "broken")) })
//!     .unwrap_err();
//! assert_eq!(uncaught.root().message(), "broken");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod exception;
pub mod handler;
pub mod hooks;
pub mod logger;
pub mod logging;
pub mod outcome;
pub mod registry;
pub mod types;

pub use config::HandlerOptions;
pub use constants::ANY_CODE;
pub use error::{HandlerError, Result};
pub use exception::{
    CaseId, Context, ErrorCase, ExceptableError, Exception, ExceptionKind, SplError,
};
pub use handler::{EventKind, Handler, LogEntry, LoggedEvent};
pub use hooks::{HookEvent, HookTable, ProcessHooks, RecordingHooks};
pub use logger::{LogLevel, LogRecord, Logger, MemoryLogger, TracingLogger};
pub use outcome::{attempt, unpack, Failure, Outcome};
pub use registry::{
    ErrorHandler, ExceptionHandler, HandlerResult, Matcher, RegistryStats, ShutdownHandler,
};
pub use types::{ErrorTypes, RuntimeError, Severity};
