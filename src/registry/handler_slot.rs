//! Handler callbacks and the predicates that decide which events reach them.

use crate::constants::ANY_CODE;
use crate::exception::{CaseId, Exception, ExceptionKind};
use crate::types::{ErrorTypes, RuntimeError};
use std::fmt;
use std::sync::Arc;

/// Outcome of an exception handler: `Ok(true)` if handled, `Ok(false)` to pass,
/// `Err` if the handler itself failed
pub type HandlerResult = std::result::Result<bool, Exception>;

/// Handles runtime errors
pub trait ErrorHandler: Send + Sync {
    /// Returns `true` if the error was handled
    fn run(&self, error: &RuntimeError) -> bool;

    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

impl<F> ErrorHandler for F
where
    F: Fn(&RuntimeError) -> bool + Send + Sync,
{
    fn run(&self, error: &RuntimeError) -> bool {
        self(error)
    }
}

/// Handles uncaught exceptions
pub trait ExceptionHandler: Send + Sync {
    fn run(&self, exception: &Exception) -> HandlerResult;

    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

impl<F> ExceptionHandler for F
where
    F: Fn(&Exception) -> HandlerResult + Send + Sync,
{
    fn run(&self, exception: &Exception) -> HandlerResult {
        self(exception)
    }
}

/// Runs during process shutdown; arguments are captured by the closure
pub trait ShutdownHandler: Send + Sync {
    fn run(&self);

    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

impl<F> ShutdownHandler for F
where
    F: Fn() + Send + Sync,
{
    fn run(&self) {
        self()
    }
}

/// Which events a slot's handler receives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// Runtime errors whose code is contained in the mask
    ErrorTypes(ErrorTypes),
    /// Exceptions of exactly `kind`, with `code`, or any code when `None`
    Exception {
        kind: ExceptionKind,
        code: Option<i64>,
    },
    /// Exceptions carrying the error case anywhere in their cause chain
    ErrorCase(CaseId),
    /// Every event
    Always,
}

impl Matcher {
    /// Exception matcher; `ANY_CODE` means any code for the kind
    pub fn exception(kind: ExceptionKind, code: i64) -> Self {
        Matcher::Exception {
            kind,
            code: (code != ANY_CODE).then_some(code),
        }
    }

    pub fn matches_error(&self, code: i32) -> bool {
        match self {
            Matcher::ErrorTypes(types) => types.contains(code),
            Matcher::Always => true,
            _ => false,
        }
    }

    /// Exact kind and exact (non-any) code
    pub fn matches_exact(&self, kind: ExceptionKind, code: i64) -> bool {
        matches!(self, Matcher::Exception { kind: k, code: Some(c) } if *k == kind && *c == code)
    }

    /// Exact kind, registered for any code
    pub fn matches_any_code(&self, kind: ExceptionKind) -> bool {
        matches!(self, Matcher::Exception { kind: k, code: None } if *k == kind)
    }

    pub fn matches_case(&self, exception: &Exception) -> bool {
        match self {
            Matcher::ErrorCase(id) => exception.has_case(*id),
            Matcher::Always => true,
            _ => false,
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::ErrorTypes(types) => write!(f, "error_types({})", types.bits()),
            Matcher::Exception { kind, code: None } => write!(f, "exception({kind}, any)"),
            Matcher::Exception {
                kind,
                code: Some(code),
            } => write!(f, "exception({kind}, {code})"),
            Matcher::ErrorCase(id) => write!(f, "error_case({id})"),
            Matcher::Always => write!(f, "always"),
        }
    }
}

/// A registered handler plus its matcher; immutable once created
pub struct HandlerSlot<H: ?Sized> {
    pub matcher: Matcher,
    pub handler: Arc<H>,
}

impl<H: ?Sized> HandlerSlot<H> {
    pub fn new(matcher: Matcher, handler: Arc<H>) -> Self {
        Self { matcher, handler }
    }
}

impl<H: ?Sized> Clone for HandlerSlot<H> {
    fn clone(&self) -> Self {
        Self {
            matcher: self.matcher,
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<H: ?Sized> fmt::Debug for HandlerSlot<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerSlot")
            .field("matcher", &self.matcher)
            .field("handler", &"<Arc<dyn Handler>>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::error_types::{E_NOTICE, E_WARNING};
    use crate::exception::{ErrorCase, SplError};
    use serde_json::json;

    #[test]
    fn test_any_code_sentinel() {
        assert_eq!(
            Matcher::exception(ExceptionKind::Logic, ANY_CODE),
            Matcher::Exception {
                kind: ExceptionKind::Logic,
                code: None
            }
        );
        assert!(Matcher::exception(ExceptionKind::Logic, 0).matches_any_code(ExceptionKind::Logic));
        assert!(!Matcher::exception(ExceptionKind::Logic, 0).matches_exact(ExceptionKind::Logic, 0));
    }

    #[test]
    fn test_exact_match_requires_kind_and_code() {
        let matcher = Matcher::exception(ExceptionKind::Domain, 7);
        assert!(matcher.matches_exact(ExceptionKind::Domain, 7));
        assert!(!matcher.matches_exact(ExceptionKind::Domain, 8));
        assert!(!matcher.matches_exact(ExceptionKind::Logic, 7));
        assert!(!matcher.matches_any_code(ExceptionKind::Domain));
    }

    #[test]
    fn test_error_types_matcher() {
        let matcher = Matcher::ErrorTypes(ErrorTypes::new(E_WARNING));
        assert!(matcher.matches_error(E_WARNING));
        assert!(!matcher.matches_error(E_NOTICE));
        assert!(Matcher::Always.matches_error(E_NOTICE));
    }

    #[test]
    fn test_case_matcher_walks_cause_chain() {
        let inner = SplError::Range.exceptable(json!({}), None);
        let outer = Exception::new(ExceptionKind::Exception, "outer").caused_by(inner);
        assert!(Matcher::ErrorCase(SplError::Range.id()).matches_case(&outer));
        assert!(!Matcher::ErrorCase(SplError::Length.id()).matches_case(&outer));
    }

    #[test]
    fn test_closure_description_names_closure() {
        let handler = |_: &RuntimeError| true;
        assert!(ErrorHandler::describe(&handler).contains("closure"));
    }
}
