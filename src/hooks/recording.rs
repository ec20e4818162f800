//! In-memory hook table that records every installation call.

use super::{ErrorHook, ExceptionHook, HookTable, InstalledErrorHook, ShutdownHook};
use crate::exception::Exception;
use crate::types::{ErrorTypes, RuntimeError};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};

/// One call made against a [`RecordingHooks`] table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HookEvent {
    SetErrorHook { types: ErrorTypes },
    RestoreErrorHook,
    SetExceptionHook,
    RestoreExceptionHook,
    RegisterShutdown,
}

#[derive(Default)]
struct Slots {
    error_hooks: Vec<InstalledErrorHook>,
    exception_hooks: Vec<ExceptionHook>,
    shutdown_hooks: Vec<ShutdownHook>,
    last_error: Option<RuntimeError>,
}

/// Hook table fake: keeps hooks in memory and lets tests fire them directly
#[derive(Default)]
pub struct RecordingHooks {
    slots: Mutex<Slots>,
    events: Mutex<Vec<HookEvent>>,
    silenced: AtomicBool,
}

impl RecordingHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<HookEvent> {
        self.events.lock().clone()
    }

    pub fn clear_events(&self) {
        self.events.lock().clear();
    }

    pub fn error_hook_depth(&self) -> usize {
        self.slots.lock().error_hooks.len()
    }

    pub fn exception_hook_depth(&self) -> usize {
        self.slots.lock().exception_hooks.len()
    }

    pub fn shutdown_hook_count(&self) -> usize {
        self.slots.lock().shutdown_hooks.len()
    }

    pub fn set_silenced(&self, silenced: bool) {
        self.silenced.store(silenced, Ordering::SeqCst);
    }

    pub fn set_last_error(&self, error: Option<RuntimeError>) {
        self.slots.lock().last_error = error;
    }

    /// Fires the current error hook; `None` if no installed hook accepts the code
    pub fn fire_error(&self, error: &RuntimeError) -> Option<Result<bool, Exception>> {
        let current = self.slots.lock().error_hooks.last().cloned()?;
        current
            .types
            .contains(error.code)
            .then(|| (current.hook)(error))
    }

    /// Fires the current exception hook; `None` if none is installed
    pub fn fire_exception(&self, exception: Exception) -> Option<Result<(), Exception>> {
        let current = self.slots.lock().exception_hooks.last().cloned()?;
        Some(current(exception))
    }

    /// Fires every shutdown hook in registration order
    pub fn fire_shutdown(&self) {
        let hooks = self.slots.lock().shutdown_hooks.clone();
        for hook in hooks {
            hook();
        }
    }

    fn record(&self, event: HookEvent) {
        self.events.lock().push(event);
    }
}

impl HookTable for RecordingHooks {
    fn set_error_hook(&self, hook: ErrorHook, types: ErrorTypes) {
        self.slots
            .lock()
            .error_hooks
            .push(InstalledErrorHook { hook, types });
        self.record(HookEvent::SetErrorHook { types });
    }

    fn restore_error_hook(&self) {
        self.slots.lock().error_hooks.pop();
        self.record(HookEvent::RestoreErrorHook);
    }

    fn set_exception_hook(&self, hook: ExceptionHook) {
        self.slots.lock().exception_hooks.push(hook);
        self.record(HookEvent::SetExceptionHook);
    }

    fn restore_exception_hook(&self) {
        self.slots.lock().exception_hooks.pop();
        self.record(HookEvent::RestoreExceptionHook);
    }

    fn register_shutdown(&self, hook: ShutdownHook) {
        self.slots.lock().shutdown_hooks.push(hook);
        self.record(HookEvent::RegisterShutdown);
    }

    fn last_error(&self) -> Option<RuntimeError> {
        self.slots.lock().last_error.clone()
    }

    fn is_silenced(&self) -> bool {
        self.silenced.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for RecordingHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingHooks")
            .field("events", &self.events())
            .field("silenced", &self.is_silenced())
            .finish()
    }
}
