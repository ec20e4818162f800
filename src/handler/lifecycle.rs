//! Installing and removing a handler's hooks, permanently or for one call.

use super::Handler;
use crate::exception::Exception;
use crate::hooks::{ErrorHook, ExceptionHook, ShutdownHook};
use crate::logging;
use crate::types::{ErrorTypes, RuntimeError};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::Ordering;
use std::sync::Arc;

impl Handler {
    /// Installs this handler's error, exception and shutdown hooks
    ///
    /// Registering again reinstalls the error and exception hooks in place. The
    /// shutdown hook is installed once per handler.
    pub fn register(&self) -> &Self {
        let hooks = &self.inner.hooks;
        let reinstall = self.is_registered();

        if reinstall {
            hooks.restore_error_hook();
            hooks.restore_exception_hook();
        }

        hooks.set_error_hook(self.error_hook(), ErrorTypes::ALL);
        hooks.set_exception_hook(self.exception_hook());

        if !self.inner.shutdown_installed.swap(true, Ordering::SeqCst) {
            hooks.register_shutdown(self.shutdown_hook());
        }

        self.inner.active.store(true, Ordering::SeqCst);
        logging::log_lifecycle_operation(
            "register",
            self.id(),
            true,
            reinstall.then_some("hooks reinstalled"),
        );
        self
    }

    /// Restores the hooks that were current before [`Handler::register`]
    ///
    /// The shutdown hook stays installed but does nothing while unregistered.
    pub fn unregister(&self) -> &Self {
        if self.inner.active.swap(false, Ordering::SeqCst) {
            self.inner.hooks.restore_error_hook();
            self.inner.hooks.restore_exception_hook();
            logging::log_lifecycle_operation("unregister", self.id(), false, None);
        } else {
            logging::log_lifecycle_operation("unregister", self.id(), false, Some("not registered"));
        }
        self
    }

    /// Runs `callback` with this handler registered
    ///
    /// An `Err` or panic escaping `callback` is dispatched as an exception. Returns
    /// `Ok(Some(value))` on success, `Ok(None)` when the failure was handled, and the
    /// dispatch error otherwise. Registration state is restored on every path.
    pub fn try_run<T, F>(&self, callback: F) -> Result<Option<T>, Exception>
    where
        F: FnOnce() -> Result<T, Exception>,
    {
        let _registration = ScopedRegistration::acquire(self);

        let exception = match panic::catch_unwind(AssertUnwindSafe(callback)) {
            Ok(Ok(value)) => return Ok(Some(value)),
            Ok(Err(exception)) => exception,
            Err(payload) => Exception::from_panic(&*payload),
        };

        self.handle_exception(exception).map(|()| None)
    }

    /// Runs `callback` with runtime errors in `throw` converted to exceptions
    ///
    /// If this handler is not registered, its error hook is installed for the call.
    /// The previous `throw` mask and hook are restored however `callback` exits,
    /// including by panic.
    pub fn run_with_error_policy<T>(
        &self,
        callback: impl FnOnce() -> T,
        throw: impl Into<ErrorTypes>,
    ) -> T {
        let _policy = ErrorPolicyGuard::install(self, throw.into());
        callback()
    }

    fn error_hook(&self) -> ErrorHook {
        let handler = self.clone();
        Arc::new(move |error: &RuntimeError| handler.handle_error(error))
    }

    fn exception_hook(&self) -> ExceptionHook {
        let handler = self.clone();
        Arc::new(move |exception: Exception| handler.handle_exception(exception))
    }

    fn shutdown_hook(&self) -> ShutdownHook {
        let inner = Arc::downgrade(&self.inner);
        Arc::new(move || {
            if let Some(inner) = inner.upgrade() {
                Handler { inner }.handle_shutdown();
            }
        })
    }
}

/// Registers a handler for a scope, unregistering on drop if it was not already registered
struct ScopedRegistration<'a> {
    handler: &'a Handler,
    registered_here: bool,
}

impl<'a> ScopedRegistration<'a> {
    fn acquire(handler: &'a Handler) -> Self {
        let registered_here = !handler.is_registered();
        if registered_here {
            handler.register();
        }
        Self {
            handler,
            registered_here,
        }
    }
}

impl Drop for ScopedRegistration<'_> {
    fn drop(&mut self) {
        if self.registered_here {
            self.handler.unregister();
        }
    }
}

struct ErrorPolicyGuard<'a> {
    handler: &'a Handler,
    previous_throw: ErrorTypes,
    installed_hook: bool,
}

impl<'a> ErrorPolicyGuard<'a> {
    fn install(handler: &'a Handler, throw: ErrorTypes) -> Self {
        let previous_throw = handler.options().throw;
        handler.set_throw(throw);

        let installed_hook = !handler.is_registered();
        if installed_hook {
            handler
                .inner
                .hooks
                .set_error_hook(handler.error_hook(), ErrorTypes::ALL);
        }

        logging::log_lifecycle_operation(
            "error_policy.install",
            handler.id(),
            handler.is_registered(),
            Some(&format!("throw={}", throw.bits())),
        );

        Self {
            handler,
            previous_throw,
            installed_hook,
        }
    }
}

impl Drop for ErrorPolicyGuard<'_> {
    fn drop(&mut self) {
        self.handler.set_throw(self.previous_throw);
        if self.installed_hook {
            self.handler.inner.hooks.restore_error_hook();
        }

        logging::log_lifecycle_operation(
            "error_policy.restore",
            self.handler.id(),
            self.handler.is_registered(),
            Some(&format!("throw={}", self.previous_throw.bits())),
        );
    }
}
