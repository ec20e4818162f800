use thiserror::Error;

/// Errors raised by the library itself, as opposed to the exceptions it dispatches
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HandlerError {
    #[error("Invalid error types mask: {0} (expected non-zero, or -1 for any type)")]
    InvalidErrorTypes(i32),
    #[error("Exceptable handler registered without any error cases")]
    EmptyCaseList,
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<config::ConfigError> for HandlerError {
    fn from(error: config::ConfigError) -> Self {
        HandlerError::Configuration(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HandlerError>;
