//! Result helper that captures failures, panics included, as exceptions.
//!
//! ```rust
//! use exceptable::outcome::{attempt, unpack};
//! use exceptable::{ErrorCase, SplError};
//! use serde_json::json;
//!
//! let outcome = attempt(|| Err::<u8, _>(SplError::Length.exceptable(json!({}), None)));
//! let failure = outcome.as_ref().unwrap_err();
//! assert_eq!(failure.case(), Some(SplError::Length.id()));
//! assert!(unpack(outcome).is_err());
//! ```

use crate::exception::{CaseId, Exception};
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// A captured failure: the exception plus its error case, if it has one
#[derive(Debug, Clone, Error)]
#[error("{exception}")]
pub struct Failure {
    case: Option<CaseId>,
    #[source]
    exception: Exception,
}

impl Failure {
    pub fn case(&self) -> Option<CaseId> {
        self.case
    }

    pub fn exception(&self) -> &Exception {
        &self.exception
    }

    pub fn into_exception(self) -> Exception {
        self.exception
    }
}

impl From<Exception> for Failure {
    fn from(exception: Exception) -> Self {
        Self {
            case: exception.case(),
            exception,
        }
    }
}

pub type Outcome<T> = std::result::Result<T, Failure>;

/// Runs `f`, capturing an `Err` or a panic as a [`Failure`]
pub fn attempt<T, F>(f: F) -> Outcome<T>
where
    F: FnOnce() -> Result<T, Exception>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result.map_err(Failure::from),
        Err(payload) => Err(Failure::from(Exception::from_panic(&*payload))),
    }
}

/// The value, or the captured exception
pub fn unpack<T>(outcome: Outcome<T>) -> Result<T, Exception> {
    outcome.map_err(Failure::into_exception)
}
