//! Plugin registration table.
//!
//! The [`PluginRegistry`] maps each [`EventName`] to two ordered handler
//! lists: *before* handlers, which transform the event's parameters ahead of
//! the default implementation, and *after* handlers, which transform the
//! produced [`Modules`].
//!
//! # Calling Convention
//!
//! Every handler produces a future. Plain functions are registered through the
//! `_sync` variants and lifted into already-resolved futures, so the event
//! wrapper never branches on how a handler was written.
//!
//! | Phase | Signature |
//! |-------|-----------|
//! | before | `(GenerationContext, P) -> Future<Output = HandlerResult<P>>` |
//! | after | `(GenerationContext, Arc<P>, Modules) -> Future<Output = HandlerResult<Modules>>` |
//!
//! After handlers receive the event's *original* parameters, as passed by
//! the generator before any before handler ran.
//!
//! # Parameter Types
//!
//! All handlers of one event share a single parameter type `P`. The first
//! registration fixes it; later registrations or lookups with a different
//! type fail with [`RegistryError::ParamsMismatch`].
//!
//! # Example
//!
//! ```
//! use genhook_context::event::EventName;
//! use genhook_context::module::ModuleArtifact;
//! use genhook_context::registry::PluginRegistry;
//!
//! #[derive(Clone)]
//! struct EntityParams {
//!     entity: String,
//! }
//!
//! let mut registry = PluginRegistry::new();
//! registry
//!     .register_before_sync(EventName::CreateEntityModule, "rename", |_ctx, mut params: EntityParams| {
//!         params.entity = params.entity.to_uppercase();
//!         Ok(params)
//!     })
//!     .unwrap()
//!     .register_after_sync(EventName::CreateEntityModule, "readme", |_ctx, params: &EntityParams, mut modules| {
//!         modules.push(ModuleArtifact::new(format!("{}/README.md", params.entity), "generated"));
//!         Ok(modules)
//!     })
//!     .unwrap();
//!
//! assert_eq!(registry.before_count(EventName::CreateEntityModule), 1);
//! assert_eq!(registry.after_count(EventName::CreateEntityModule), 1);
//! ```

use core::any::{Any, type_name};
use core::fmt;
use core::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use hashbrown::HashMap;
use serde::Serialize;

use crate::context::GenerationContext;
use crate::event::EventName;
use crate::module::Modules;
use crate::plugin::{Plugin, PluginId};

/// Error produced by a handler or a default implementation.
pub type HandlerError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Result of a handler or a default implementation.
pub type HandlerResult<T> = Result<T, HandlerError>;

type BeforeFn<P> =
    dyn Fn(GenerationContext, P) -> BoxFuture<'static, HandlerResult<P>> + Send + Sync;

type AfterFn<P> = dyn Fn(GenerationContext, Arc<P>, Modules) -> BoxFuture<'static, HandlerResult<Modules>>
    + Send
    + Sync;

// ─────────────────────────────────────────────────────────────────────────────
// HookPhase
// ─────────────────────────────────────────────────────────────────────────────

/// The side of the default implementation a handler runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPhase {
    /// Runs before the default implementation and transforms its parameters.
    Before,
    /// Runs after the default implementation and transforms its modules.
    After,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookPhase::Before => f.write_str("before"),
            HookPhase::After => f.write_str("after"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// RegistryError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur while registering or looking up handlers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A handler with this name already exists for the event and phase.
    #[error("{phase} hook '{name}' already registered for event '{event}'")]
    DuplicateName {
        /// The event where the duplicate was found.
        event: EventName,
        /// The phase where the duplicate was found.
        phase: HookPhase,
        /// The duplicate handler name.
        name: String,
    },

    /// The event's handlers were registered with another parameter type.
    #[error("event '{event}' takes parameters of type `{registered}`, not `{requested}`")]
    ParamsMismatch {
        /// The event whose handlers were accessed.
        event: EventName,
        /// Parameter type fixed by the first registration.
        registered: &'static str,
        /// Parameter type of the rejected registration or lookup.
        requested: &'static str,
    },

    /// A unique plugin was added twice.
    #[error("plugin '{id}' is already registered")]
    DuplicatePlugin {
        /// The plugin's identifier.
        id: &'static str,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// A named, type-erased before handler.
///
/// Most users should use [`PluginRegistry::register_before`] or
/// [`PluginRegistry::register_before_sync`] instead of creating one directly.
pub struct BeforeHandler<P> {
    name: String,
    handler: Box<BeforeFn<P>>,
}

impl<P: Send + 'static> BeforeHandler<P> {
    /// Wraps an async handler.
    #[must_use]
    pub fn new<F, Fut>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(GenerationContext, P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult<P>> + Send + 'static,
    {
        Self {
            name: name.into(),
            handler: Box::new(move |ctx, params| handler(ctx, params).boxed()),
        }
    }

    /// Wraps a synchronous handler, lifting its result into a resolved future.
    #[must_use]
    pub fn from_sync<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&GenerationContext, P) -> HandlerResult<P> + Send + Sync + 'static,
    {
        Self::new(name, move |ctx: GenerationContext, params| {
            future::ready(handler(&ctx, params))
        })
    }

    /// Returns the handler's registration name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the handler.
    pub fn invoke(&self, ctx: GenerationContext, params: P) -> BoxFuture<'static, HandlerResult<P>> {
        (self.handler)(ctx, params)
    }
}

/// A named, type-erased after handler.
///
/// Most users should use [`PluginRegistry::register_after`] or
/// [`PluginRegistry::register_after_sync`] instead of creating one directly.
pub struct AfterHandler<P> {
    name: String,
    handler: Box<AfterFn<P>>,
}

impl<P: Send + Sync + 'static> AfterHandler<P> {
    /// Wraps an async handler.
    #[must_use]
    pub fn new<F, Fut>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(GenerationContext, Arc<P>, Modules) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult<Modules>> + Send + 'static,
    {
        Self {
            name: name.into(),
            handler: Box::new(move |ctx, args, modules| handler(ctx, args, modules).boxed()),
        }
    }

    /// Wraps a synchronous handler, lifting its result into a resolved future.
    #[must_use]
    pub fn from_sync<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&GenerationContext, &P, Modules) -> HandlerResult<Modules> + Send + Sync + 'static,
    {
        Self::new(
            name,
            move |ctx: GenerationContext, args: Arc<P>, modules| {
                future::ready(handler(&ctx, &*args, modules))
            },
        )
    }

    /// Returns the handler's registration name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the handler with the event's original parameters.
    pub fn invoke(
        &self,
        ctx: GenerationContext,
        args: Arc<P>,
        modules: Modules,
    ) -> BoxFuture<'static, HandlerResult<Modules>> {
        (self.handler)(ctx, args, modules)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventHooks
// ─────────────────────────────────────────────────────────────────────────────

/// The ordered handlers registered for one event.
pub struct EventHooks<P> {
    before: Vec<BeforeHandler<P>>,
    after: Vec<AfterHandler<P>>,
}

impl<P> Default for EventHooks<P> {
    fn default() -> Self {
        Self {
            before: Vec::new(),
            after: Vec::new(),
        }
    }
}

impl<P> EventHooks<P> {
    /// Before handlers, in registration order.
    #[must_use]
    pub fn before(&self) -> &[BeforeHandler<P>] {
        &self.before
    }

    /// After handlers, in registration order.
    #[must_use]
    pub fn after(&self) -> &[AfterHandler<P>] {
        &self.after
    }
}

/// Registry entry for one event: name metadata plus the typed hooks.
struct RegisteredEvent {
    params_type: &'static str,
    before: Vec<String>,
    after: Vec<String>,
    // Always an `EventHooks<P>` for the `P` named by `params_type`.
    hooks: Box<dyn Any + Send + Sync>,
    truncate_typed: fn(&mut (dyn Any + Send + Sync), usize, usize),
}

impl RegisteredEvent {
    fn new<P: Send + 'static>() -> Self {
        Self {
            params_type: type_name::<P>(),
            before: Vec::new(),
            after: Vec::new(),
            hooks: Box::new(EventHooks::<P>::default()),
            truncate_typed: truncate_hooks::<P>,
        }
    }

    /// Keeps the first `before` and `after` handlers of each phase.
    fn truncate(&mut self, before: usize, after: usize) {
        self.before.truncate(before);
        self.after.truncate(after);
        (self.truncate_typed)(self.hooks.as_mut(), before, after);
    }

    fn names(&self, phase: HookPhase) -> &[String] {
        match phase {
            HookPhase::Before => &self.before,
            HookPhase::After => &self.after,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PluginRegistry
// ─────────────────────────────────────────────────────────────────────────────

/// The plugin registration table of a generation run.
///
/// Populated before the run starts, then moved into the
/// [`GenerationContext`], after which it is read-only.
#[derive(Default)]
pub struct PluginRegistry {
    events: HashMap<EventName, RegisteredEvent>,
    plugins: Vec<PluginId>,
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("events", &self.events())
            .field("plugins", &self.plugins)
            .finish()
    }
}

impl PluginRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plugin, letting it register its handlers.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicatePlugin`] if a unique plugin of the
    /// same type was already added, or the first error returned by the
    /// plugin's [`register`](Plugin::register). On error the registry is left
    /// as it was before the call.
    pub fn add_plugin<T: Plugin>(&mut self, plugin: T) -> Result<&mut Self, RegistryError> {
        let id = PluginId::of::<T>();
        if plugin.is_unique() && self.plugins.contains(&id) {
            return Err(RegistryError::DuplicatePlugin { id: T::ID });
        }

        let checkpoint = self.checkpoint();
        if let Err(err) = plugin.register(self) {
            tracing::debug!(plugin = T::ID, error = %err, "plugin registration rolled back");
            self.rollback(checkpoint);
            return Err(err);
        }
        self.plugins.push(id);
        tracing::debug!(plugin = T::ID, name = plugin.name(), "plugin registered");
        Ok(self)
    }

    /// Registers an async before handler for an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken on this event's before phase or
    /// the event's handlers use another parameter type.
    pub fn register_before<P, F, Fut>(
        &mut self,
        event: EventName,
        name: impl Into<String>,
        handler: F,
    ) -> Result<&mut Self, RegistryError>
    where
        P: Send + 'static,
        F: Fn(GenerationContext, P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult<P>> + Send + 'static,
    {
        self.register_before_boxed(event, BeforeHandler::new(name, handler))
    }

    /// Registers a synchronous before handler for an event.
    ///
    /// # Errors
    ///
    /// See [`register_before`](Self::register_before).
    pub fn register_before_sync<P, F>(
        &mut self,
        event: EventName,
        name: impl Into<String>,
        handler: F,
    ) -> Result<&mut Self, RegistryError>
    where
        P: Send + 'static,
        F: Fn(&GenerationContext, P) -> HandlerResult<P> + Send + Sync + 'static,
    {
        self.register_before_boxed(event, BeforeHandler::from_sync(name, handler))
    }

    /// Registers an async after handler for an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken on this event's after phase or
    /// the event's handlers use another parameter type.
    pub fn register_after<P, F, Fut>(
        &mut self,
        event: EventName,
        name: impl Into<String>,
        handler: F,
    ) -> Result<&mut Self, RegistryError>
    where
        P: Send + Sync + 'static,
        F: Fn(GenerationContext, Arc<P>, Modules) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult<Modules>> + Send + 'static,
    {
        self.register_after_boxed(event, AfterHandler::new(name, handler))
    }

    /// Registers a synchronous after handler for an event.
    ///
    /// # Errors
    ///
    /// See [`register_after`](Self::register_after).
    pub fn register_after_sync<P, F>(
        &mut self,
        event: EventName,
        name: impl Into<String>,
        handler: F,
    ) -> Result<&mut Self, RegistryError>
    where
        P: Send + Sync + 'static,
        F: Fn(&GenerationContext, &P, Modules) -> HandlerResult<Modules> + Send + Sync + 'static,
    {
        self.register_after_boxed(event, AfterHandler::from_sync(name, handler))
    }

    /// Registers a pre-built [`BeforeHandler`].
    ///
    /// This is the lower-level method behind [`register_before`](Self::register_before)
    /// and [`register_before_sync`](Self::register_before_sync).
    ///
    /// # Errors
    ///
    /// See [`register_before`](Self::register_before).
    pub fn register_before_boxed<P: Send + 'static>(
        &mut self,
        event: EventName,
        handler: BeforeHandler<P>,
    ) -> Result<&mut Self, RegistryError> {
        let entry = self.entry::<P>(event, HookPhase::Before, handler.name())?;
        let hooks = downcast_hooks_mut::<P>(event, entry.params_type, &mut entry.hooks)?;
        entry.before.push(handler.name.clone());
        hooks.before.push(handler);
        Ok(self)
    }

    /// Registers a pre-built [`AfterHandler`].
    ///
    /// # Errors
    ///
    /// See [`register_after`](Self::register_after).
    pub fn register_after_boxed<P: Send + Sync + 'static>(
        &mut self,
        event: EventName,
        handler: AfterHandler<P>,
    ) -> Result<&mut Self, RegistryError> {
        let entry = self.entry::<P>(event, HookPhase::After, handler.name())?;
        let hooks = downcast_hooks_mut::<P>(event, entry.params_type, &mut entry.hooks)?;
        entry.after.push(handler.name.clone());
        hooks.after.push(handler);
        Ok(self)
    }

    /// Returns the hooks registered for an event, or `None` if it has none.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ParamsMismatch`] if the event's handlers were
    /// registered with another parameter type.
    pub fn hooks<P: 'static>(&self, event: EventName) -> Result<Option<&EventHooks<P>>, RegistryError> {
        let Some(entry) = self.events.get(&event) else {
            return Ok(None);
        };

        entry
            .hooks
            .downcast_ref::<EventHooks<P>>()
            .map(Some)
            .ok_or(RegistryError::ParamsMismatch {
                event,
                registered: entry.params_type,
                requested: type_name::<P>(),
            })
    }

    /// Returns true if any handler is registered for the event.
    #[must_use]
    pub fn has_hooks(&self, event: EventName) -> bool {
        self.events.contains_key(&event)
    }

    /// Returns the number of before handlers registered for the event.
    #[must_use]
    pub fn before_count(&self, event: EventName) -> usize {
        self.events.get(&event).map_or(0, |entry| entry.before.len())
    }

    /// Returns the number of after handlers registered for the event.
    #[must_use]
    pub fn after_count(&self, event: EventName) -> usize {
        self.events.get(&event).map_or(0, |entry| entry.after.len())
    }

    /// Checks if a handler with the given name exists on the event's phase.
    #[must_use]
    pub fn contains_hook(&self, event: EventName, phase: HookPhase, name: &str) -> bool {
        self.events
            .get(&event)
            .is_some_and(|entry| entry.names(phase).iter().any(|n| n == name))
    }

    /// Returns the events that have handlers, in catalogue order.
    #[must_use]
    pub fn events(&self) -> Vec<EventName> {
        let mut events: Vec<_> = self.events.keys().copied().collect();
        events.sort_unstable();
        events
    }

    /// Returns the plugins added so far, in the order they were added.
    #[must_use]
    pub fn plugins(&self) -> &[PluginId] {
        &self.plugins
    }

    /// Returns true if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            events: self
                .events
                .iter()
                .map(|(event, entry)| (*event, (entry.before.len(), entry.after.len())))
                .collect(),
            plugins: self.plugins.len(),
        }
    }

    fn rollback(&mut self, checkpoint: Checkpoint) {
        self.events.retain(|event, entry| {
            let Some(&(before, after)) = checkpoint.events.get(event) else {
                return false;
            };
            entry.truncate(before, after);
            true
        });
        self.plugins.truncate(checkpoint.plugins);
    }

    fn entry<P: Send + 'static>(
        &mut self,
        event: EventName,
        phase: HookPhase,
        name: &str,
    ) -> Result<&mut RegisteredEvent, RegistryError> {
        let entry = self
            .events
            .entry(event)
            .or_insert_with(RegisteredEvent::new::<P>);

        if !entry.hooks.is::<EventHooks<P>>() {
            return Err(RegistryError::ParamsMismatch {
                event,
                registered: entry.params_type,
                requested: type_name::<P>(),
            });
        }

        if entry.names(phase).iter().any(|n| n == name) {
            return Err(RegistryError::DuplicateName {
                event,
                phase,
                name: name.to_owned(),
            });
        }

        Ok(entry)
    }
}

/// Handler counts per event, taken before a plugin registers.
struct Checkpoint {
    events: HashMap<EventName, (usize, usize)>,
    plugins: usize,
}

fn truncate_hooks<P: 'static>(hooks: &mut (dyn Any + Send + Sync), before: usize, after: usize) {
    if let Some(hooks) = hooks.downcast_mut::<EventHooks<P>>() {
        hooks.before.truncate(before);
        hooks.after.truncate(after);
    }
}

fn downcast_hooks_mut<'a, P: 'static>(
    event: EventName,
    registered: &'static str,
    hooks: &'a mut Box<dyn Any + Send + Sync>,
) -> Result<&'a mut EventHooks<P>, RegistryError> {
    hooks
        .downcast_mut::<EventHooks<P>>()
        .ok_or(RegistryError::ParamsMismatch {
            event,
            registered,
            requested: type_name::<P>(),
        })
}
