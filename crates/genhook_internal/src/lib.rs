//! # genhook Internal Library
//!
//! Re-exports the core genhook crates for convenience.

/// Layer 1: shared generation context and plugin registration.
pub use genhook_context;

/// Layer 2: the event wrapper.
pub use genhook_wrapper;

/// Tracing subscriber setup for host binaries.
#[cfg(feature = "subscriber")]
pub use genhook_tracing;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use genhook_context::prelude::*;
    pub use genhook_wrapper::prelude::*;
}
