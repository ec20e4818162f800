//! # Handler Registry
//!
//! Ordered handler collections for runtime errors, exceptions, error cases and
//! shutdown. Handlers are tried in registration order within a group and are never
//! removed individually.
//!
//! Lookups return owned snapshots (`Vec<Arc<_>>`) so callers can release the registry
//! lock before invoking any handler.

use super::handler_slot::{ErrorHandler, ExceptionHandler, HandlerSlot, Matcher, ShutdownHandler};
use crate::error::{HandlerError, Result};
use crate::exception::{CaseId, Exception, ExceptionKind};
use crate::types::ErrorTypes;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Resolution step that selected an exception handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStep {
    /// Registered against an error case found in the cause chain
    ErrorCase,
    /// Registered for the exact kind and code
    ExactCode,
    /// Registered for any code of the kind or one of its ancestors
    AnyCode(ExceptionKind),
    /// Registered for any code of `Throwable`
    CatchAll,
}

impl fmt::Display for ResolutionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionStep::ErrorCase => f.write_str("error_case"),
            ResolutionStep::ExactCode => f.write_str("exact_code"),
            ResolutionStep::AnyCode(kind) => write!(f, "any_code({kind})"),
            ResolutionStep::CatchAll => f.write_str("catch_all"),
        }
    }
}

/// Exception handlers to try for one event, in precedence order
pub type ResolutionPlan = Vec<(ResolutionStep, Arc<dyn ExceptionHandler>)>;

/// Registry statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RegistryStats {
    pub error_handlers: usize,
    pub exception_handlers: usize,
    pub exceptable_handlers: usize,
    pub error_cases: usize,
    pub shutdown_handlers: usize,
}

#[derive(Debug, Default, Clone)]
pub struct Registry {
    error_handlers: Vec<HandlerSlot<dyn ErrorHandler>>,
    exception_handlers: Vec<HandlerSlot<dyn ExceptionHandler>>,
    exceptable_handlers: IndexMap<CaseId, Vec<HandlerSlot<dyn ExceptionHandler>>>,
    shutdown_handlers: Vec<HandlerSlot<dyn ShutdownHandler>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an error handler for the given types; `-1` means every type
    pub fn add_error_handler(
        &mut self,
        handler: Arc<dyn ErrorHandler>,
        types: ErrorTypes,
    ) -> Result<()> {
        if types.is_empty() {
            return Err(HandlerError::InvalidErrorTypes(types.bits()));
        }

        self.error_handlers
            .push(HandlerSlot::new(Matcher::ErrorTypes(types), handler));
        Ok(())
    }

    /// Adds an exception handler for `kind` and `code` (`ANY_CODE` for any code)
    pub fn add_exception_handler(
        &mut self,
        handler: Arc<dyn ExceptionHandler>,
        kind: ExceptionKind,
        code: i64,
    ) {
        self.exception_handlers
            .push(HandlerSlot::new(Matcher::exception(kind, code), handler));
    }

    /// Adds `handler` once for each case
    pub fn add_exceptable_handler(
        &mut self,
        handler: Arc<dyn ExceptionHandler>,
        cases: &[CaseId],
    ) -> Result<()> {
        if cases.is_empty() {
            return Err(HandlerError::EmptyCaseList);
        }

        for case in cases {
            self.exceptable_handlers
                .entry(*case)
                .or_default()
                .push(HandlerSlot::new(Matcher::ErrorCase(*case), Arc::clone(&handler)));
        }
        Ok(())
    }

    pub fn add_shutdown_handler(&mut self, handler: Arc<dyn ShutdownHandler>) {
        self.shutdown_handlers
            .push(HandlerSlot::new(Matcher::Always, handler));
    }

    /// Error handlers whose mask contains `code`, in registration order
    pub fn error_handlers_for(&self, code: i32) -> Vec<Arc<dyn ErrorHandler>> {
        self.error_handlers
            .iter()
            .filter(|slot| slot.matcher.matches_error(code))
            .map(|slot| Arc::clone(&slot.handler))
            .collect()
    }

    /// Exception handlers to try for `exception`, in precedence order
    ///
    /// 1. error-case handlers for cases found in the cause chain, in case insertion order,
    ///    each handler at most once
    /// 2. handlers for the exact kind and code
    /// 3. any-code handlers for the kind, then each ancestor up to `Throwable`
    /// 4. any-code `Throwable` handlers, unless step 3 already reached `Throwable`
    pub fn resolution_plan(&self, exception: &Exception) -> ResolutionPlan {
        let mut plan = ResolutionPlan::new();

        // A handler registered for several cases in the chain runs once
        let mut seen: Vec<*const ()> = Vec::new();
        for slot in self
            .exceptable_handlers
            .values()
            .flatten()
            .filter(|slot| slot.matcher.matches_case(exception))
        {
            let identity = Arc::as_ptr(&slot.handler).cast::<()>();
            if !seen.contains(&identity) {
                seen.push(identity);
                plan.push((ResolutionStep::ErrorCase, Arc::clone(&slot.handler)));
            }
        }

        let kind = exception.kind();
        plan.extend(
            self.exception_handlers
                .iter()
                .filter(|slot| slot.matcher.matches_exact(kind, exception.code()))
                .map(|slot| (ResolutionStep::ExactCode, Arc::clone(&slot.handler))),
        );

        let mut reached_throwable = false;
        for ancestor in kind.ancestry() {
            reached_throwable |= ancestor == ExceptionKind::Throwable;
            plan.extend(self.any_code_slots(ancestor, ResolutionStep::AnyCode(ancestor)));
        }

        if !reached_throwable {
            plan.extend(self.any_code_slots(ExceptionKind::Throwable, ResolutionStep::CatchAll));
        }

        plan
    }

    pub fn shutdown_handlers(&self) -> Vec<Arc<dyn ShutdownHandler>> {
        self.shutdown_handlers
            .iter()
            .map(|slot| Arc::clone(&slot.handler))
            .collect()
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            error_handlers: self.error_handlers.len(),
            exception_handlers: self.exception_handlers.len(),
            exceptable_handlers: self.exceptable_handlers.values().map(Vec::len).sum(),
            error_cases: self.exceptable_handlers.len(),
            shutdown_handlers: self.shutdown_handlers.len(),
        }
    }

    fn any_code_slots(
        &self,
        kind: ExceptionKind,
        step: ResolutionStep,
    ) -> impl Iterator<Item = (ResolutionStep, Arc<dyn ExceptionHandler>)> + '_ {
        self.exception_handlers
            .iter()
            .filter(move |slot| slot.matcher.matches_any_code(kind))
            .map(move |slot| (step, Arc::clone(&slot.handler)))
    }
}
