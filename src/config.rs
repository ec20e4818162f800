//! # Handler Configuration
//!
//! Runtime options for a [`crate::Handler`]. Options can be built in code, read from
//! `EXCEPTABLE_*` environment variables, or layered from an optional config file plus
//! the environment.
//!
//! ```rust,no_run
//! use exceptable::config::HandlerOptions;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = HandlerOptions::load(Some("config/exceptable.toml".as_ref()))?;
//! println!("debug mode: {}", options.debug);
//! # Ok(())
//! # }
//! ```

use crate::constants::env;
use crate::error::{HandlerError, Result};
use crate::types::ErrorTypes;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerOptions {
    /// Retain every dispatched event in the in-memory debug log
    pub debug: bool,
    /// Dispatch errors even when the call site silenced error reporting
    pub scream: bool,
    /// Error types converted to `ErrorException`s instead of being handled
    pub throw: ErrorTypes,
}

impl HandlerOptions {
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();

        if let Ok(debug) = std::env::var(env::DEBUG) {
            options.debug = parse_flag(env::DEBUG, &debug)?;
        }

        if let Ok(scream) = std::env::var(env::SCREAM) {
            options.scream = parse_flag(env::SCREAM, &scream)?;
        }

        if let Ok(throw) = std::env::var(env::THROW) {
            let bits = throw.trim().parse::<i32>().map_err(|e| {
                HandlerError::Configuration(format!("Invalid {}: {e}", env::THROW))
            })?;
            options.throw = ErrorTypes::new(bits);
        }

        Ok(options)
    }

    /// Loads options from an optional file, overridden by `EXCEPTABLE_*` variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let options = builder
            .add_source(config::Environment::with_prefix(env::PREFIX).try_parsing(true))
            .build()?
            .try_deserialize::<HandlerOptions>()?;

        tracing::debug!(
            debug = options.debug,
            scream = options.scream,
            throw = options.throw.bits(),
            "Handler options loaded"
        );

        Ok(options)
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_scream(mut self, scream: bool) -> Self {
        self.scream = scream;
        self
    }

    pub fn with_throw(mut self, throw: impl Into<ErrorTypes>) -> Self {
        self.throw = throw.into();
        self
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(HandlerError::Configuration(format!(
            "Invalid {name}: expected a boolean, got '{other}'"
        ))),
    }
}
