//! The demo's plugins.

use genhook_context::prelude::*;

use crate::generator::{EntityParams, ServerParams};

/// Entity events that receive a license header.
const ENTITY_EVENTS: [EventName; 3] = [
    EventName::CreateEntityModule,
    EventName::CreateEntityService,
    EventName::CreateEntityController,
];

// ─────────────────────────────────────────────────────────────────────────────
// LicenseHeaderPlugin
// ─────────────────────────────────────────────────────────────────────────────

/// Prepends a license header to every entity artifact.
///
/// The header is written as a comment in the artifact's language: `#` for
/// YAML files, `//` otherwise.
#[derive(Debug, Clone)]
pub struct LicenseHeaderPlugin {
    header: String,
}

impl LicenseHeaderPlugin {
    /// Creates the plugin with the given header text.
    #[must_use]
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }
}

impl Plugin for LicenseHeaderPlugin {
    const ID: &'static str = "genhook_demo::license_header";

    fn register(&self, registry: &mut PluginRegistry) -> Result<(), RegistryError> {
        for event in ENTITY_EVENTS {
            let header = self.header.clone();
            registry.register_after_sync(
                event,
                Self::ID,
                move |_ctx, _params: &EntityParams, modules| Ok(prepend_header(&header, modules)),
            )?;
        }
        Ok(())
    }
}

fn prepend_header(header: &str, mut modules: Modules) -> Modules {
    for module in &mut modules {
        let marker = if module.path.ends_with(".yml") || module.path.ends_with(".yaml") {
            "#"
        } else {
            "//"
        };
        let comment: String = header
            .lines()
            .map(|line| format!("{marker} {line}\n"))
            .collect();
        module.content.insert_str(0, &comment);
    }
    modules
}

// ─────────────────────────────────────────────────────────────────────────────
// NoDockerPlugin
// ─────────────────────────────────────────────────────────────────────────────

/// Replaces docker-compose generation with a short note.
///
/// Its before handler logs the server parameters through the run's logger
/// and skips the default implementation of
/// [`EventName::CreateServerDockerCompose`]; its after handler emits
/// `DOCKER.md` in place of `docker-compose.yml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDockerPlugin;

impl Plugin for NoDockerPlugin {
    const ID: &'static str = "genhook_demo::no_docker";

    fn register(&self, registry: &mut PluginRegistry) -> Result<(), RegistryError> {
        registry
            .register_before_sync(
                EventName::CreateServerDockerCompose,
                Self::ID,
                |ctx, params: ServerParams| {
                    let payload = serde_json::to_value(&params).unwrap_or_default();
                    ctx.logger().info("docker-compose generation disabled", &payload);
                    ctx.set_skip_default_behavior(true);
                    Ok(params)
                },
            )?
            .register_after_sync(
                EventName::CreateServerDockerCompose,
                Self::ID,
                |_ctx, params: &ServerParams, mut modules| {
                    modules.push(ModuleArtifact::new(
                        "DOCKER.md",
                        format!(
                            "Docker support is disabled for `{}`. Run it with `npm start`.\n",
                            params.name
                        ),
                    ));
                    Ok(modules)
                },
            )?;
        Ok(())
    }
}
