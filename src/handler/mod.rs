//! # Handler
//!
//! Registry of error, exception and shutdown handlers, plus the dispatch engine that
//! routes intercepted events to them.
//!
//! ## Overview
//!
//! A [`Handler`] owns a [`Registry`], its [`HandlerOptions`], an optional [`Logger`] and
//! the in-memory debug log. Once [`Handler::register`]ed it receives every runtime error,
//! uncaught exception and shutdown notification the host reports through its
//! [`HookTable`].
//!
//! `Handler` is a cheap `Clone`; clones share all state. Installed hooks hold a clone,
//! so a registered handler stays alive until it is unregistered.
//!
//! ## Usage
//!
//! ```rust
//! use exceptable::constants::error_types::E_WARNING;
//! use exceptable::{Exception, ExceptionKind, Handler, HandlerOptions, RecordingHooks, RuntimeError};
//! use std::sync::Arc;
//!
//! # fn main() -> exceptable::Result<()> {
//! let hooks = Arc::new(RecordingHooks::new());
//! let handler = Handler::with_hooks(HandlerOptions::default().with_debug(true), hooks.clone());
//!
//! handler
//!     .on_error(|e: &RuntimeError| e.message.contains("disk"), E_WARNING)?
//!     .on_exception(|_: &Exception| Ok(true), ExceptionKind::Logic, 0)
//!     .register();
//!
//! assert!(matches!(
//!     hooks.fire_error(&RuntimeError::new(E_WARNING, "disk almost full")),
//!     Some(Ok(true))
//! ));
//! assert_eq!(handler.debug_log().len(), 1);
//!
//! handler.unregister();
//! # Ok(())
//! # }
//! ```

mod dispatch;
mod lifecycle;
pub mod log_entry;

pub use log_entry::{EventKind, LogEntry, LoggedEvent};

use crate::config::HandlerOptions;
use crate::constants::ANY_CODE;
use crate::error::Result;
use crate::exception::{CaseId, ErrorCase, ExceptionKind};
use crate::hooks::{HookTable, ProcessHooks};
use crate::logger::Logger;
use crate::registry::{
    ErrorHandler, ExceptionHandler, Registry, RegistryStats, ShutdownHandler,
};
use crate::types::ErrorTypes;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_HANDLER_ID: AtomicU64 = AtomicU64::new(1);

/// Error, exception and shutdown handler registry
#[derive(Clone)]
pub struct Handler {
    inner: Arc<HandlerInner>,
}

struct HandlerInner {
    id: u64,
    options: RwLock<HandlerOptions>,
    registry: RwLock<Registry>,
    debug_log: Mutex<Vec<LogEntry>>,
    logger: RwLock<Option<Arc<dyn Logger>>>,
    hooks: Arc<dyn HookTable>,
    active: AtomicBool,
    shutdown_installed: AtomicBool,
}

impl Handler {
    /// Creates a handler bound to the process-global hook table
    pub fn new(options: HandlerOptions) -> Self {
        Self::with_hooks(options, Arc::new(ProcessHooks))
    }

    /// Creates a handler bound to the given hook table
    pub fn with_hooks(options: HandlerOptions, hooks: Arc<dyn HookTable>) -> Self {
        let id = NEXT_HANDLER_ID.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            handler_id = id,
            debug = options.debug,
            scream = options.scream,
            throw = options.throw.bits(),
            "Handler created"
        );

        Self {
            inner: Arc::new(HandlerInner {
                id,
                options: RwLock::new(options),
                registry: RwLock::new(Registry::new()),
                debug_log: Mutex::new(Vec::new()),
                logger: RwLock::new(None),
                hooks,
                active: AtomicBool::new(false),
                shutdown_installed: AtomicBool::new(false),
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// True while this handler's hooks are installed
    pub fn is_registered(&self) -> bool {
        self.inner.active.load(Ordering::SeqCst)
    }

    /// Adds a handler for runtime errors whose code is in `types`
    ///
    /// Use `-1` (or [`ErrorTypes::ALL`]) for every type. A zero mask is rejected.
    pub fn on_error<H>(&self, handler: H, types: impl Into<ErrorTypes>) -> Result<&Self>
    where
        H: ErrorHandler + 'static,
    {
        let types = types.into();
        self.inner
            .registry
            .write()
            .add_error_handler(Arc::new(handler), types)?;

        tracing::debug!(handler_id = self.id(), types = types.bits(), "Error handler added");
        Ok(self)
    }

    /// Adds a handler for exceptions of exactly `kind` with `code`
    ///
    /// `ANY_CODE` matches every code; `ExceptionKind::Throwable` with `ANY_CODE` is a
    /// catch-all.
    pub fn on_exception<H>(&self, handler: H, kind: ExceptionKind, code: i64) -> &Self
    where
        H: ExceptionHandler + 'static,
    {
        self.inner
            .registry
            .write()
            .add_exception_handler(Arc::new(handler), kind, code);

        tracing::debug!(handler_id = self.id(), kind = %kind, code = code, "Exception handler added");
        self
    }

    /// Adds a catch-all exception handler
    pub fn on_any_exception<H>(&self, handler: H) -> &Self
    where
        H: ExceptionHandler + 'static,
    {
        self.on_exception(handler, ExceptionKind::Throwable, ANY_CODE)
    }

    /// Adds a handler for exceptions carrying any of `cases` in their cause chain
    pub fn on_exceptable<H>(&self, handler: H, cases: &[&dyn ErrorCase]) -> Result<&Self>
    where
        H: ExceptionHandler + 'static,
    {
        let ids: Vec<CaseId> = cases.iter().map(|case| case.id()).collect();
        self.inner
            .registry
            .write()
            .add_exceptable_handler(Arc::new(handler), &ids)?;

        tracing::debug!(handler_id = self.id(), cases = ids.len(), "Exceptable handler added");
        Ok(self)
    }

    /// Adds a shutdown handler; shutdown handlers cannot be removed
    pub fn on_shutdown<H>(&self, handler: H) -> &Self
    where
        H: ShutdownHandler + 'static,
    {
        self.inner
            .registry
            .write()
            .add_shutdown_handler(Arc::new(handler));

        tracing::debug!(handler_id = self.id(), "Shutdown handler added");
        self
    }

    pub fn options(&self) -> HandlerOptions {
        *self.inner.options.read()
    }

    pub fn set_options(&self, options: HandlerOptions) -> &Self {
        *self.inner.options.write() = options;
        self
    }

    pub fn set_debug(&self, debug: bool) -> &Self {
        self.inner.options.write().debug = debug;
        self
    }

    pub fn set_scream(&self, scream: bool) -> &Self {
        self.inner.options.write().scream = scream;
        self
    }

    pub fn set_throw(&self, throw: impl Into<ErrorTypes>) -> &Self {
        self.inner.options.write().throw = throw.into();
        self
    }

    pub fn is_debug(&self) -> bool {
        self.inner.options.read().debug
    }

    pub fn set_logger(&self, logger: Arc<dyn Logger>) -> &Self {
        *self.inner.logger.write() = Some(logger);
        self
    }

    pub fn clear_logger(&self) -> &Self {
        *self.inner.logger.write() = None;
        self
    }

    /// Entries recorded while debug mode was on, oldest first
    pub fn debug_log(&self) -> Vec<LogEntry> {
        self.inner.debug_log.lock().clone()
    }

    pub fn clear_debug_log(&self) {
        self.inner.debug_log.lock().clear();
    }

    pub fn stats(&self) -> RegistryStats {
        self.inner.registry.read().stats()
    }

    fn logger(&self) -> Option<Arc<dyn Logger>> {
        self.inner.logger.read().clone()
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new(HandlerOptions::default())
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("id", &self.id())
            .field("options", &self.options())
            .field("registered", &self.is_registered())
            .field("stats", &self.stats())
            .finish()
    }
}
