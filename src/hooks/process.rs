//! Process-global hook table.
//!
//! Code that wants its failures intercepted reports them through [`ProcessHooks`]:
//! runtime errors with [`ProcessHooks::trigger_error`], escaping exceptions with
//! [`ProcessHooks::raise`], panics with [`ProcessHooks::run_guarded`], and process exit
//! with [`ProcessHooks::run_shutdown`].
//!
//! Fatal `E_ERROR`s never reach the error hook. They are only recorded as the last
//! error, for shutdown hooks to pick up.

use super::{ErrorHook, ExceptionHook, HookTable, InstalledErrorHook, ShutdownHook};
use crate::constants::error_types::E_ERROR;
use crate::exception::Exception;
use crate::logging;
use crate::types::{ErrorTypes, RuntimeError};
use parking_lot::{const_mutex, Mutex};
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};

struct ProcessState {
    error_hooks: Vec<InstalledErrorHook>,
    exception_hooks: Vec<ExceptionHook>,
    shutdown_hooks: Vec<ShutdownHook>,
    last_error: Option<RuntimeError>,
}

impl ProcessState {
    const fn new() -> Self {
        Self {
            error_hooks: Vec::new(),
            exception_hooks: Vec::new(),
            shutdown_hooks: Vec::new(),
            last_error: None,
        }
    }
}

static STATE: Mutex<ProcessState> = const_mutex(ProcessState::new());

thread_local! {
    static SILENCE_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Handle to the process-global hook table
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessHooks;

impl ProcessHooks {
    /// Reports a runtime error to the current error hook
    ///
    /// Returns `Ok(true)` if the hook handled it, `Ok(false)` if the default display was
    /// used instead, and `Err` if the hook converted the error into an exception.
    pub fn trigger_error(error: RuntimeError) -> Result<bool, Exception> {
        STATE.lock().last_error = Some(error.clone());

        if error.code == E_ERROR {
            display_error(&error);
            return Ok(false);
        }

        // Cloned out so the hook can install or restore hooks itself
        let current = STATE.lock().error_hooks.last().cloned();
        let handled = match current {
            Some(installed) if installed.types.contains(error.code) => (installed.hook)(&error)?,
            _ => false,
        };

        if !handled && !Self::silenced() {
            display_error(&error);
        }

        Ok(handled)
    }

    /// Reports an exception nothing caught to the current exception hook
    ///
    /// Without a hook the exception is logged and returned unchanged.
    pub fn raise(exception: Exception) -> Result<(), Exception> {
        let current = STATE.lock().exception_hooks.last().cloned();
        match current {
            Some(hook) => hook(exception),
            None => {
                tracing::error!(
                    kind = %exception.kind(),
                    code = exception.code(),
                    file = %exception.file(),
                    line = exception.line(),
                    "💥 UNCAUGHT: {}",
                    exception.message()
                );
                Err(exception)
            }
        }
    }

    /// Runs `f`, raising a panic that escapes it as an exception
    ///
    /// Returns `Ok(None)` if the raised exception was handled.
    pub fn run_guarded<T>(f: impl FnOnce() -> T) -> Result<Option<T>, Exception> {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => Ok(Some(value)),
            Err(payload) => Self::raise(Exception::from_panic(&*payload)).map(|()| None),
        }
    }

    /// Runs `f` with error reporting silenced on this thread
    pub fn silence<T>(f: impl FnOnce() -> T) -> T {
        let _guard = SilenceGuard::enter();
        f()
    }

    /// Runs and consumes every shutdown hook in registration order
    ///
    /// A panicking hook is logged and the remaining hooks still run.
    pub fn run_shutdown() {
        let hooks = std::mem::take(&mut STATE.lock().shutdown_hooks);
        for hook in hooks {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| hook())) {
                let failure = Exception::from_panic(&*payload);
                logging::log_contained_failure("process_hooks", "shutdown", failure.message());
            }
        }
    }

    /// Clears every installed hook and the last error; intended for tests
    pub fn reset() {
        *STATE.lock() = ProcessState::new();
    }

    pub fn error_hook_count() -> usize {
        STATE.lock().error_hooks.len()
    }

    pub fn exception_hook_count() -> usize {
        STATE.lock().exception_hooks.len()
    }

    pub fn shutdown_hook_count() -> usize {
        STATE.lock().shutdown_hooks.len()
    }

    fn silenced() -> bool {
        SILENCE_DEPTH.with(|depth| depth.get() > 0)
    }
}

impl HookTable for ProcessHooks {
    fn set_error_hook(&self, hook: ErrorHook, types: ErrorTypes) {
        STATE
            .lock()
            .error_hooks
            .push(InstalledErrorHook { hook, types });
    }

    fn restore_error_hook(&self) {
        STATE.lock().error_hooks.pop();
    }

    fn set_exception_hook(&self, hook: ExceptionHook) {
        STATE.lock().exception_hooks.push(hook);
    }

    fn restore_exception_hook(&self) {
        STATE.lock().exception_hooks.pop();
    }

    fn register_shutdown(&self, hook: ShutdownHook) {
        STATE.lock().shutdown_hooks.push(hook);
    }

    fn last_error(&self) -> Option<RuntimeError> {
        STATE.lock().last_error.clone()
    }

    fn is_silenced(&self) -> bool {
        Self::silenced()
    }
}

struct SilenceGuard;

impl SilenceGuard {
    fn enter() -> Self {
        SILENCE_DEPTH.with(|depth| depth.set(depth.get() + 1));
        SilenceGuard
    }
}

impl Drop for SilenceGuard {
    fn drop(&mut self) {
        SILENCE_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

fn display_error(error: &RuntimeError) {
    if error.is_fatal() {
        tracing::error!(
            error_type = error.type_name(),
            code = error.code,
            file = %error.file,
            line = error.line,
            "🔥 RUNTIME_ERROR: {}",
            error.message
        );
    } else {
        tracing::warn!(
            error_type = error.type_name(),
            code = error.code,
            file = %error.file,
            line = error.line,
            "⚠️ RUNTIME_ERROR: {}",
            error.message
        );
    }
}
