//! A toy entity generator.
//!
//! Each generated file is produced by a default implementation wrapped in its
//! lifecycle event, so installed plugins can rewrite parameters, replace the
//! default or post-process the output.

use genhook_context::prelude::*;
use genhook_wrapper::invoker::from_sync;
use genhook_wrapper::wrap_event;
use serde::Serialize;

use crate::config::DemoConfig;

/// Parameters of the per-entity events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityParams {
    /// Entity name in PascalCase.
    pub entity: String,
}

impl EntityParams {
    /// Creates parameters for one entity.
    #[must_use]
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
        }
    }

    fn dir(&self) -> String {
        to_kebab_case(&self.entity)
    }
}

/// Parameters of the server-level events.
///
/// Serialized as the payload of the demo's log entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerParams {
    /// Server name.
    pub name: String,
    /// Every generated entity.
    pub entities: Vec<String>,
}

/// Generates every entity, then the server files.
///
/// Returns the output of every event in generation order.
pub async fn generate(ctx: &GenerationContext, config: &DemoConfig) -> Modules {
    let mut modules = Vec::new();

    for entity in &config.entities {
        let params = EntityParams::new(entity.as_str());
        modules.extend(
            wrap_event(ctx, EventName::CreateEntityModule, from_sync(create_entity_module), params.clone())
                .await,
        );
        modules.extend(
            wrap_event(ctx, EventName::CreateEntityService, from_sync(create_entity_service), params.clone())
                .await,
        );
        modules.extend(
            wrap_event(ctx, EventName::CreateEntityController, create_entity_controller, params).await,
        );
    }

    let server = ServerParams {
        name: config.server_name.clone(),
        entities: config.entities.clone(),
    };
    modules.extend(
        wrap_event(ctx, EventName::CreateServerDockerCompose, from_sync(create_docker_compose), server)
            .await,
    );

    modules
}

// ─────────────────────────────────────────────────────────────────────────────
// Default implementations
// ─────────────────────────────────────────────────────────────────────────────

fn require_entity(params: &EntityParams) -> HandlerResult<()> {
    if params.entity.trim().is_empty() {
        return Err("entity name is empty".into());
    }
    Ok(())
}

/// Default implementation of [`EventName::CreateEntityModule`].
///
/// # Errors
///
/// Fails if the entity name is empty.
pub fn create_entity_module(params: EntityParams) -> HandlerResult<Modules> {
    require_entity(&params)?;
    let EntityParams { entity } = &params;
    let dir = params.dir();
    Ok(vec![ModuleArtifact::new(
        format!("src/{dir}/{dir}.module.ts"),
        format!(
            "@Module({{\n  controllers: [{entity}Controller],\n  providers: [{entity}Service],\n}})\nexport class {entity}Module {{}}\n"
        ),
    )])
}

/// Default implementation of [`EventName::CreateEntityService`].
///
/// # Errors
///
/// Fails if the entity name is empty.
pub fn create_entity_service(params: EntityParams) -> HandlerResult<Modules> {
    require_entity(&params)?;
    let EntityParams { entity } = &params;
    let dir = params.dir();
    Ok(vec![ModuleArtifact::new(
        format!("src/{dir}/{dir}.service.ts"),
        format!(
            "@Injectable()\nexport class {entity}Service {{\n  findMany() {{\n    return [];\n  }}\n}}\n"
        ),
    )])
}

/// Default implementation of [`EventName::CreateEntityController`].
///
/// # Errors
///
/// Fails if the entity name is empty.
pub async fn create_entity_controller(params: EntityParams) -> HandlerResult<Modules> {
    require_entity(&params)?;
    let EntityParams { entity } = &params;
    let dir = params.dir();
    Ok(vec![ModuleArtifact::new(
        format!("src/{dir}/{dir}.controller.ts"),
        format!(
            "@Controller(\"{dir}\")\nexport class {entity}Controller {{\n  constructor(private readonly service: {entity}Service) {{}}\n}}\n"
        ),
    )])
}

/// Default implementation of [`EventName::CreateServerDockerCompose`].
pub fn create_docker_compose(params: ServerParams) -> HandlerResult<Modules> {
    let content = format!(
        "services:\n  {name}:\n    build: .\n    ports:\n      - \"3000:3000\"\n    environment:\n      ENTITIES: \"{entities}\"\n",
        name = params.name,
        entities = params.entities.join(","),
    );
    Ok(vec![ModuleArtifact::new("docker-compose.yml", content)])
}

fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.trim().chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.extend(ch.to_lowercase());
        } else if ch == ' ' || ch == '_' {
            out.push('-');
        } else {
            out.push(ch);
        }
    }
    out
}
