//! # Registry Infrastructure
//!
//! Storage and lookup for registered handlers.
//!
//! ## Architecture
//!
//! ```text
//! Registry
//! ├── error handlers        (ErrorTypes mask, registration order)
//! ├── exception handlers    (kind + code or any code, registration order)
//! ├── exceptable handlers   (keyed by error case, case insertion order)
//! └── shutdown handlers     (all run, registration order)
//! ```

pub mod handler_registry;
pub mod handler_slot;

// Re-export main types for easy access
pub use handler_registry::{Registry, RegistryStats, ResolutionPlan, ResolutionStep};
pub use handler_slot::{
    ErrorHandler, ExceptionHandler, HandlerResult, HandlerSlot, Matcher, ShutdownHandler,
};
