//! # Structured Logging Module
//!
//! Environment-aware `tracing` subscriber setup plus the structured events the handler
//! emits about its own lifecycle and dispatch decisions.

use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
///
/// `RUST_LOG` takes precedence when set. An already-installed global subscriber is
/// left in place.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);
        let json_output = wants_json_output();
        let filter = || {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
        };

        let console_layer = (!json_output).then(|| {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(true)
                .with_filter(filter())
        });
        let json_layer = json_output.then(|| {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(false)
                .json()
                .with_filter(filter())
        });

        let subscriber = tracing_subscriber::registry()
            .with(console_layer)
            .with(json_layer);

        if subscriber.try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            environment = %environment,
            json_output = json_output,
            "🔧 STRUCTURED LOGGING: Initialized"
        );
    });
}

/// JSON lines instead of human-readable output, selected with `EXCEPTABLE_LOG_FORMAT=json`
fn wants_json_output() -> bool {
    std::env::var("EXCEPTABLE_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("EXCEPTABLE_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

/// Log a handler lifecycle operation (register, unregister, hook installation)
pub fn log_lifecycle_operation(operation: &str, handler_id: u64, active: bool, details: Option<&str>) {
    tracing::info!(
        operation = %operation,
        handler_id = handler_id,
        active = active,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "🪝 HANDLER_LIFECYCLE"
    );
}

/// Log the outcome of a dispatched event
pub fn log_dispatch_outcome(event: &str, handler_id: u64, handled: bool, message: &str) {
    if handled {
        tracing::debug!(
            event = %event,
            handler_id = handler_id,
            handled = handled,
            message = %message,
            "📬 DISPATCH"
        );
    } else {
        tracing::warn!(
            event = %event,
            handler_id = handler_id,
            handled = handled,
            message = %message,
            "📭 DISPATCH_UNHANDLED"
        );
    }
}

/// Log a failure that was contained rather than propagated
pub fn log_contained_failure(component: &str, operation: &str, error: &str) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        timestamp = %Utc::now().to_rfc3339(),
        "❌ CONTAINED_FAILURE"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(get_log_level("test"), "debug");
        assert_eq!(get_log_level("development"), "debug");
        assert_eq!(get_log_level("production"), "info");
    }

    #[test]
    fn test_init_is_idempotent() {
        init_structured_logging();
        init_structured_logging();
        log_lifecycle_operation("register", 1, true, None);
    }
}
