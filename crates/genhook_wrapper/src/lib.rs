//! Event wrapper for genhook (Layer 2).
//!
//! `genhook_wrapper` runs the plugins registered on a
//! [`GenerationContext`](genhook_context::GenerationContext) around the
//! generator's own implementation of each lifecycle event.
//!
//! # Core Concepts
//!
//! - [`wrap_event`] - Before pipe, default implementation, after pipe; never fails
//! - [`try_wrap_event`] - The same steps, returning a tagged [`WrapError`]
//! - [`DefaultBehavior`](invoker::DefaultBehavior) - The generator's implementation of an event
//! - [`before_events_pipe`](pipe::before_events_pipe) / [`after_events_pipe`](pipe::after_events_pipe) -
//!   Left-to-right handler composition
//!
//! # Concurrency
//!
//! Invocations on one context may run concurrently or nested inside each
//! other's handlers and default implementations. Each invocation carries its
//! own skip flag, so a skip requested for one event never leaks into another,
//! and no invocation waits on another.

/// Tagged failures of a wrapped event.
pub mod error;

/// Default implementations and the skip-aware invoker.
pub mod invoker;

/// Handler pipelines.
pub mod pipe;

/// The event wrapper.
pub mod wrapper;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::error::{WrapError, WrapErrorKind};
    pub use crate::invoker::{DefaultBehavior, default_behavior, from_sync};
    pub use crate::pipe::{AfterPipe, BeforePipe, PipeError, after_events_pipe, before_events_pipe};
    pub use crate::wrapper::{try_wrap_event, wrap_event};
}

pub use error::{WrapError, WrapErrorKind};
pub use wrapper::{try_wrap_event, wrap_event};
