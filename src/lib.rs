//! Plugin interception layer for code-generation pipelines.
//!
//! Plugins register *before* and *after* handlers on named lifecycle events;
//! the generator wraps each event's default implementation so the handlers
//! can rewrite its parameters, skip it, or post-process its output.

pub use genhook_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use genhook_internal::prelude::*;
}
