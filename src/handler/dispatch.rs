//! Dispatch engine: routes runtime errors, exceptions and shutdown to handlers.

use super::{Handler, LogEntry};
use crate::constants::error_types::E_ERROR;
use crate::exception::{ErrorCase, ExceptableError, Exception};
use crate::logger::LogLevel;
use crate::logging;
use crate::types::RuntimeError;
use serde_json::{json, Value};
use std::panic::{self, AssertUnwindSafe};

impl Handler {
    /// Dispatches a runtime error
    ///
    /// Returns `Ok(true)` if a handler claimed it (or the call site silenced it),
    /// `Ok(false)` if none did. Errors matching the `throw` mask come back as an
    /// `ErrorException` in `Err`, as does a `HandlerFailed` exception when an error
    /// handler panics.
    pub fn handle_error(&self, error: &RuntimeError) -> Result<bool, Exception> {
        let options = self.options();

        if options.throw.contains(error.code) {
            tracing::debug!(
                handler_id = self.id(),
                code = error.code,
                "Runtime error converted to ErrorException"
            );
            return Err(Exception::from_runtime_error(error));
        }

        if self.inner.hooks.is_silenced() && !options.scream {
            self.record_error(error, true, true);
            return Ok(true);
        }

        // Snapshot, so handlers may register further handlers
        let handlers = self.inner.registry.read().error_handlers_for(error.code);

        let mut handled = false;
        for handler in handlers {
            match panic::catch_unwind(AssertUnwindSafe(|| handler.run(error))) {
                Ok(true) => {
                    handled = true;
                    break;
                }
                Ok(false) => {}
                Err(payload) => {
                    self.record_error(error, false, false);
                    return Err(handler_failed(
                        "error",
                        handler.describe(),
                        &Exception::from_panic(&*payload),
                        Exception::from_runtime_error(error),
                    ));
                }
            }
        }

        self.record_error(error, handled, false);
        Ok(handled)
    }

    /// Dispatches an uncaught exception
    ///
    /// Handlers are tried in resolution order until one returns `Ok(true)`. If none
    /// does, the exception comes back wrapped in an `UncaughtException`. A handler that
    /// fails stops dispatch with a `HandlerFailed` exception caused by `exception`.
    pub fn handle_exception(&self, exception: Exception) -> Result<(), Exception> {
        let plan = self.inner.registry.read().resolution_plan(&exception);

        for (step, handler) in plan {
            let failure = match panic::catch_unwind(AssertUnwindSafe(|| handler.run(&exception))) {
                Ok(Ok(true)) => {
                    tracing::debug!(
                        handler_id = self.id(),
                        step = %step,
                        handler = %handler.describe(),
                        "Exception handled"
                    );
                    self.record_exception(&exception, true);
                    return Ok(());
                }
                Ok(Ok(false)) => continue,
                Ok(Err(failure)) => failure,
                Err(payload) => Exception::from_panic(&*payload),
            };

            self.record_exception(&exception, false);
            return Err(handler_failed("exception", handler.describe(), &failure, exception));
        }

        self.record_exception(&exception, false);
        Err(ExceptableError::UncaughtException.exceptable(Value::Null, Some(exception)))
    }

    /// Runs shutdown handling; does nothing unless registered
    ///
    /// A fatal last error is dispatched first. Every shutdown handler then runs in
    /// registration order, and a panicking one does not stop the rest.
    pub fn handle_shutdown(&self) {
        if !self.is_registered() {
            tracing::debug!(handler_id = self.id(), "Shutdown ignored: handler not registered");
            return;
        }

        let fatal = self
            .inner
            .hooks
            .last_error()
            .filter(|error| error.code == E_ERROR);
        if let Some(error) = fatal {
            if let Err(exception) = self.handle_error(&error) {
                logging::log_contained_failure("handler", "shutdown_fatal_error", &exception.to_string());
                if let Some(logger) = self.logger() {
                    logger.log(
                        LogLevel::Critical,
                        exception.message(),
                        &LogEntry::exception(exception.clone(), false).to_fields(),
                    );
                }
            }
        }

        let handlers = self.inner.registry.read().shutdown_handlers();
        logging::log_lifecycle_operation(
            "shutdown",
            self.id(),
            true,
            Some(&format!("{} shutdown handler(s)", handlers.len())),
        );

        for handler in handlers {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| handler.run())) {
                let failure = Exception::from_panic(&*payload);
                logging::log_contained_failure(
                    "handler",
                    &format!("shutdown ({})", handler.describe()),
                    failure.message(),
                );
            }
        }
    }

    fn record_error(&self, error: &RuntimeError, handled: bool, controlled: bool) {
        logging::log_dispatch_outcome("error", self.id(), handled, &error.to_string());

        let level = (!handled).then(|| LogLevel::for_error_code(error.code));
        self.record(LogEntry::error(error.clone(), handled, controlled), level);
    }

    fn record_exception(&self, exception: &Exception, handled: bool) {
        logging::log_dispatch_outcome("exception", self.id(), handled, &exception.to_string());

        let level = (!handled).then_some(LogLevel::Critical);
        self.record(LogEntry::exception(exception.clone(), handled), level);
    }

    /// Forwards to the logger and, in debug mode, appends to the debug log
    fn record(&self, entry: LogEntry, unhandled_level: Option<LogLevel>) {
        let debug = self.is_debug();
        let entry = if debug { entry.with_trace() } else { entry };

        if let Some(logger) = self.logger() {
            let fields = entry.to_fields();
            if debug {
                logger.log(LogLevel::Debug, entry.message(), &fields);
            }
            if let Some(level) = unhandled_level {
                logger.log(level, entry.message(), &fields);
            }
        }

        if debug {
            self.inner.debug_log.lock().push(entry);
        }
    }
}

fn handler_failed(
    family: &str,
    description: String,
    failure: &Exception,
    original: Exception,
) -> Exception {
    ExceptableError::HandlerFailed.exceptable(
        json!({
            "handler": family,
            "type": description,
            "failure": failure.message(),
            "failure_type": failure.kind().name(),
        }),
        Some(original),
    )
}
