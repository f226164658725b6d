//! The shared state of one generation run.
//!
//! A [`GenerationContext`] is created when a run starts and finished when it
//! ends. It is a cheap, clonable handle: the generator, the event wrapper and
//! every plugin handler hold clones of the same context.
//!
//! # Contents
//!
//! - the read-only [`PluginRegistry`]
//! - the append-only sequence of produced [`ModuleArtifact`]s
//! - the run's [`GenerationLogger`]
//! - the *skip default behavior* flag, scoped to one event invocation
//!
//! Clones share everything, including the flag. An event invocation works on
//! a derived handle from [`GenerationContext::begin_invocation`] that shares
//! the run's state but carries a flag of its own, so invocations never see
//! each other's flag, whether they run side by side or nested.
//!
//! # Lifecycle
//!
//! ```
//! use genhook_context::context::GenerationContext;
//! use genhook_context::module::ModuleArtifact;
//! use genhook_context::registry::PluginRegistry;
//!
//! let ctx = GenerationContext::new(PluginRegistry::new());
//! ctx.append_modules(&[ModuleArtifact::new("src/main.ts", "bootstrap();")]);
//!
//! let output = ctx.finish();
//! assert_eq!(output.len(), 1);
//! ```

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::logger::{GenerationLogger, TracingLogger};
use crate::module::{ModuleArtifact, Modules};
use crate::registry::PluginRegistry;

// ─────────────────────────────────────────────────────────────────────────────
// GenerationContext
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to the shared state of one generation run.
///
/// # Thread Safety
///
/// Clones may be used from several tasks. The artifact sequence is guarded
/// by its own lock; the skip flag belongs to the handle's invocation frame.
#[derive(Clone)]
pub struct GenerationContext {
    inner: Arc<ContextInner>,
    skip_default_behavior: Arc<AtomicBool>,
}

struct ContextInner {
    registry: PluginRegistry,
    logger: Arc<dyn GenerationLogger>,
    modules: Mutex<Modules>,
}

impl fmt::Debug for GenerationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationContext")
            .field("registry", &self.inner.registry)
            .field("modules", &self.module_count())
            .field("skip_default_behavior", &self.skip_default_behavior())
            .finish_non_exhaustive()
    }
}

impl GenerationContext {
    /// Creates a context over the given registry, logging through `tracing`.
    #[must_use]
    pub fn new(registry: PluginRegistry) -> Self {
        Self::builder().with_registry(registry).build()
    }

    /// Returns a builder for configuring a new context.
    #[must_use]
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    /// Returns the plugin registration table.
    #[must_use]
    pub fn registry(&self) -> &PluginRegistry {
        &self.inner.registry
    }

    /// Returns the run's logger.
    #[must_use]
    pub fn logger(&self) -> &dyn GenerationLogger {
        self.inner.logger.as_ref()
    }

    /// Returns the current value of this handle's skip default behavior flag.
    #[must_use]
    pub fn skip_default_behavior(&self) -> bool {
        self.skip_default_behavior.load(Ordering::SeqCst)
    }

    /// Sets this handle's skip default behavior flag.
    ///
    /// Before handlers raise it on the handle they are given to suppress the
    /// default implementation of the event being wrapped.
    pub fn set_skip_default_behavior(&self, skip: bool) {
        self.skip_default_behavior.store(skip, Ordering::SeqCst);
    }

    /// Begins an event invocation.
    ///
    /// The returned scope holds a handle over the same run with a fresh,
    /// cleared skip flag. The flag of `self` is neither read nor written, so
    /// handlers may begin nested invocations at any point.
    #[must_use]
    pub fn begin_invocation(&self) -> InvocationScope {
        InvocationScope {
            ctx: Self {
                inner: Arc::clone(&self.inner),
                skip_default_behavior: Arc::new(AtomicBool::new(false)),
            },
        }
    }

    /// Appends artifacts to the run's output.
    ///
    /// Artifacts are never removed, reordered or deduplicated.
    pub fn append_modules(&self, modules: &[ModuleArtifact]) {
        self.inner.modules.lock().extend_from_slice(modules);
    }

    /// Returns a snapshot of every artifact appended so far.
    #[must_use]
    pub fn modules(&self) -> Modules {
        self.inner.modules.lock().clone()
    }

    /// Returns the number of artifacts appended so far.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.inner.modules.lock().len()
    }

    /// Ends the run and returns its full output.
    ///
    /// If other handles to this context are still alive, their view stays
    /// valid and the output is copied.
    #[must_use]
    pub fn finish(self) -> Modules {
        match Arc::try_unwrap(self.inner) {
            Ok(inner) => inner.modules.into_inner(),
            Err(inner) => inner.modules.lock().clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InvocationScope
// ─────────────────────────────────────────────────────────────────────────────

/// Frame of one event invocation.
///
/// Created by [`GenerationContext::begin_invocation`] with a cleared skip
/// default behavior flag. Handlers of the invocation receive
/// [`context`](Self::context), so a flag they raise is seen by this
/// invocation alone.
#[derive(Debug, Clone)]
pub struct InvocationScope {
    ctx: GenerationContext,
}

impl InvocationScope {
    /// Returns the handle this invocation's handlers run against.
    #[must_use]
    pub fn context(&self) -> &GenerationContext {
        &self.ctx
    }

    /// Returns the flag value as set during this invocation.
    #[must_use]
    pub fn skip_default_behavior(&self) -> bool {
        self.ctx.skip_default_behavior()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ContextBuilder
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for [`GenerationContext`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use genhook_context::context::GenerationContext;
/// use genhook_context::logger::MemoryLogger;
/// use genhook_context::registry::PluginRegistry;
///
/// let logger = Arc::new(MemoryLogger::new());
/// let ctx = GenerationContext::builder()
///     .with_registry(PluginRegistry::new())
///     .with_logger(Arc::clone(&logger))
///     .build();
///
/// ctx.logger().info("run started", &serde_json::Value::Null);
/// assert_eq!(logger.entries().len(), 1);
/// ```
pub struct ContextBuilder {
    registry: PluginRegistry,
    logger: Arc<dyn GenerationLogger>,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self {
            registry: PluginRegistry::new(),
            logger: Arc::new(TracingLogger),
        }
    }
}

impl ContextBuilder {
    /// Sets the plugin registration table.
    #[must_use]
    pub fn with_registry(mut self, registry: PluginRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Sets the logger. Defaults to [`TracingLogger`].
    #[must_use]
    pub fn with_logger<L: GenerationLogger>(mut self, logger: Arc<L>) -> Self {
        self.logger = logger;
        self
    }

    /// Builds the context.
    #[must_use]
    pub fn build(self) -> GenerationContext {
        GenerationContext {
            inner: Arc::new(ContextInner {
                registry: self.registry,
                logger: self.logger,
                modules: Mutex::new(Vec::new()),
            }),
            skip_default_behavior: Arc::new(AtomicBool::new(false)),
        }
    }
}
