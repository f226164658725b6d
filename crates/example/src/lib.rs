//! Example entity generator customized by genhook plugins.
//!
//! A toy generator renders a module, a service and a controller per entity,
//! then the server's docker-compose file. Every file comes out of a wrapped
//! lifecycle event, and two plugins customize the result.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  generate()                                                  │
//! │                                                              │
//! │   per entity:                                                │
//! │   ┌────────────────────┐ ┌─────────────────────┐ ┌─────────┐ │
//! │   │ CreateEntityModule │▶│ CreateEntityService │▶│ …Control│ │
//! │   └─────────┬──────────┘ └──────────┬──────────┘ └────┬────┘ │
//! │             └── LicenseHeaderPlugin (after) ──────────┘      │
//! │                                                              │
//! │   ┌───────────────────────────┐                              │
//! │   │ CreateServerDockerCompose │◀── NoDockerPlugin            │
//! │   └───────────────────────────┘    (skip + DOCKER.md)        │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod generator;
mod plugins;

pub use config::{DOCKER_ENV, DemoConfig, LICENSE_ENV};
pub use generator::{
    EntityParams, ServerParams, create_docker_compose, create_entity_controller,
    create_entity_module, create_entity_service, generate,
};
pub use plugins::{LicenseHeaderPlugin, NoDockerPlugin};

use genhook_context::registry::{PluginRegistry, RegistryError};

/// Installs the plugins selected by `config`.
///
/// # Errors
///
/// Returns the first registration failure.
pub fn build_registry(config: &DemoConfig) -> Result<PluginRegistry, RegistryError> {
    let mut registry = PluginRegistry::new();
    if let Some(header) = &config.license_header {
        registry.add_plugin(LicenseHeaderPlugin::new(header.as_str()))?;
    }
    if !config.docker {
        registry.add_plugin(NoDockerPlugin)?;
    }
    Ok(registry)
}
