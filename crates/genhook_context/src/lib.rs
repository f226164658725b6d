//! Shared generation context for genhook (Layer 1).
//!
//! `genhook_context` holds the state a code-generation run shares between the
//! generator and the plugins that customize it.
//!
//! # Core Concepts
//!
//! - [`EventName`] - Closed catalogue of lifecycle events plugins can intercept
//! - [`ModuleArtifact`] - One generated output unit (path + content)
//! - [`PluginRegistry`] - Ordered before/after handlers per event
//! - [`Plugin`] - A bundle of handlers installed into the registry
//! - [`GenerationContext`] - Run-scoped handle owning the registry, output, logger and flags
//!
//! # Architecture
//!
//! - **Layer 1** (`genhook_context`): shared state and registration (this crate)
//! - **Layer 2** (`genhook_wrapper`): the event wrapper that runs plugins around
//!   the generator's default implementations
//!
//! # Example
//!
//! ```
//! use genhook_context::prelude::*;
//!
//! let mut registry = PluginRegistry::new();
//! registry
//!     .register_after_sync(EventName::CreateServerDotEnv, "extra_vars", |_ctx, _params: &(), mut modules| {
//!         modules.push(ModuleArtifact::new(".env.local", "DEBUG=1"));
//!         Ok(modules)
//!     })
//!     .unwrap();
//!
//! let ctx = GenerationContext::new(registry);
//! assert!(ctx.registry().has_hooks(EventName::CreateServerDotEnv));
//! ```

/// Generation context handle and its builder.
pub mod context;

/// Closed catalogue of lifecycle events.
pub mod event;

/// Logger seam and implementations.
pub mod logger;

/// Generated output units.
pub mod module;

/// Plugin trait and identifiers.
pub mod plugin;

/// Plugin registration table.
pub mod registry;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::context::{ContextBuilder, GenerationContext, InvocationScope};
    pub use crate::event::{EventName, UnknownEventName};
    pub use crate::logger::{GenerationLogger, LogEntry, MemoryLogger, TracingLogger};
    pub use crate::module::{ModuleArtifact, Modules};
    pub use crate::plugin::{Plugin, PluginId};
    pub use crate::registry::{
        AfterHandler, BeforeHandler, EventHooks, HandlerError, HandlerResult, HookPhase,
        PluginRegistry, RegistryError,
    };
}

// Re-export key types at crate root for convenience
pub use context::GenerationContext;
pub use event::EventName;
pub use module::{ModuleArtifact, Modules};
pub use plugin::Plugin;
pub use registry::{HandlerError, HandlerResult, PluginRegistry};
