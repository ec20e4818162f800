//! Handler fixtures and call-recording handler factories.

use exceptable::{Exception, Handler, HandlerOptions, HandlerResult, RecordingHooks, RuntimeError};
use parking_lot::Mutex;
use std::sync::Arc;

/// A handler bound to a fresh recording hook table
pub fn recording_handler(options: HandlerOptions) -> (Handler, Arc<RecordingHooks>) {
    let hooks = Arc::new(RecordingHooks::new());
    let handler = Handler::with_hooks(options, hooks.clone());
    (handler, hooks)
}

/// A registered, debug-mode handler bound to a fresh recording hook table
pub fn registered_debug_handler() -> (Handler, Arc<RecordingHooks>) {
    let (handler, hooks) = recording_handler(HandlerOptions::default().with_debug(true));
    handler.register();
    (handler, hooks)
}

/// Shared, ordered record of which handlers ran
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, name: &str) {
        self.calls.lock().push(name.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls.lock().iter().filter(|call| *call == name).count()
    }

    /// Error handler that records `name` and returns `handled`
    pub fn error_handler(
        &self,
        name: &'static str,
        handled: bool,
    ) -> impl Fn(&RuntimeError) -> bool + Send + Sync + 'static {
        let log = self.clone();
        move |_: &RuntimeError| {
            log.push(name);
            handled
        }
    }

    /// Exception handler that records `name` and returns `Ok(handled)`
    pub fn exception_handler(
        &self,
        name: &'static str,
        handled: bool,
    ) -> impl Fn(&Exception) -> HandlerResult + Send + Sync + 'static {
        let log = self.clone();
        move |_: &Exception| {
            log.push(name);
            Ok(handled)
        }
    }

    pub fn shutdown_handler(&self, name: &'static str) -> impl Fn() + Send + Sync + 'static {
        let log = self.clone();
        move || log.push(name)
    }
}
