//! Plugins: bundles of event handlers.
//!
//! A plugin is the unit a host installs into a generation run. Its only job
//! is to register handlers on the [`PluginRegistry`] before the run starts;
//! how plugins are found and loaded is up to the host.
//!
//! # Example
//!
//! ```
//! use genhook_context::event::EventName;
//! use genhook_context::plugin::Plugin;
//! use genhook_context::registry::{PluginRegistry, RegistryError};
//!
//! struct NoDockerPlugin;
//!
//! impl Plugin for NoDockerPlugin {
//!     const ID: &'static str = "acme::no_docker";
//!
//!     fn register(&self, registry: &mut PluginRegistry) -> Result<(), RegistryError> {
//!         registry.register_before_sync(
//!             EventName::CreateServerDockerCompose,
//!             Self::ID,
//!             |ctx, params: ()| {
//!                 ctx.set_skip_default_behavior(true);
//!                 Ok(params)
//!             },
//!         )?;
//!         Ok(())
//!     }
//! }
//!
//! let mut registry = PluginRegistry::new();
//! registry.add_plugin(NoDockerPlugin).unwrap();
//! assert!(registry.has_hooks(EventName::CreateServerDockerCompose));
//! ```

use core::any::TypeId;

use crate::registry::{PluginRegistry, RegistryError};

// ─────────────────────────────────────────────────────────────────────────────
// PluginId
// ─────────────────────────────────────────────────────────────────────────────

/// Unique identifier for a plugin type.
///
/// Used for duplicate detection. Based on [`TypeId`], so each plugin type
/// has exactly one `PluginId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PluginId {
    type_id: TypeId,
    id: &'static str,
}

impl PluginId {
    /// Creates a `PluginId` for the given plugin type.
    #[must_use]
    pub fn of<P: Plugin>() -> Self {
        Self {
            type_id: TypeId::of::<P>(),
            id: P::ID,
        }
    }

    /// Returns the underlying `TypeId`.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the plugin's declared [`ID`](Plugin::ID).
    #[must_use]
    pub fn id(&self) -> &'static str {
        self.id
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plugin Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A bundle of before and after handlers for one or more events.
pub trait Plugin: Send + Sync + 'static {
    /// Stable identifier, conventionally `vendor::name`.
    const ID: &'static str;

    /// Registers this plugin's handlers. Called once, when the plugin is
    /// added with [`PluginRegistry::add_plugin`].
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistryError`] hit while registering.
    fn register(&self, registry: &mut PluginRegistry) -> Result<(), RegistryError>;

    /// Returns the plugin's name for debugging and error messages.
    ///
    /// Default implementation returns the type name.
    fn name(&self) -> &str {
        core::any::type_name::<Self>()
    }

    /// Returns true if this plugin can only be added once.
    ///
    /// Default is `true`. Set to `false` for plugins that can be added
    /// multiple times with different configurations.
    fn is_unique(&self) -> bool {
        true
    }
}
