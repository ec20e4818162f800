//! # Host Hook Table
//!
//! The host side of error interception: a single error hook slot and a single
//! exception hook slot (each a stack, so a previous hook can be restored), an
//! append-only list of shutdown hooks, the last recorded runtime error, and whether
//! error reporting is silenced at the current call site.
//!
//! [`ProcessHooks`] is the process-global table used by default. [`RecordingHooks`] is an
//! in-memory table that records every installation call, for tests.

pub mod process;
pub mod recording;

pub use process::ProcessHooks;
pub use recording::{HookEvent, RecordingHooks};

use crate::exception::Exception;
use crate::types::{ErrorTypes, RuntimeError};
use std::sync::Arc;

/// Receives runtime errors; `Ok(true)` suppresses the host's default error display
pub type ErrorHook = Arc<dyn Fn(&RuntimeError) -> Result<bool, Exception> + Send + Sync>;

/// Receives uncaught exceptions; `Err` is the process's outward failure
pub type ExceptionHook = Arc<dyn Fn(Exception) -> Result<(), Exception> + Send + Sync>;

pub type ShutdownHook = Arc<dyn Fn() + Send + Sync>;

pub trait HookTable: Send + Sync {
    /// Installs `hook` for errors in `types`, shadowing the current one
    fn set_error_hook(&self, hook: ErrorHook, types: ErrorTypes);

    /// Reinstates the error hook that was current before the last `set_error_hook`
    fn restore_error_hook(&self);

    fn set_exception_hook(&self, hook: ExceptionHook);

    fn restore_exception_hook(&self);

    /// Appends a shutdown hook; shutdown hooks cannot be removed
    fn register_shutdown(&self, hook: ShutdownHook);

    /// Most recent runtime error the host recorded
    fn last_error(&self) -> Option<RuntimeError>;

    /// True while error reporting is silenced for the current call site
    fn is_silenced(&self) -> bool;
}

/// An error hook together with the types it was installed for
#[derive(Clone)]
pub(crate) struct InstalledErrorHook {
    pub hook: ErrorHook,
    pub types: ErrorTypes,
}
