//! End-to-end runs of the demo generator with its plugins installed.

use std::sync::Arc;

use example::{DemoConfig, build_registry, generate};
use genhook_context::logger::MemoryLogger;
use genhook_context::{EventName, GenerationContext};

fn context(config: &DemoConfig) -> (GenerationContext, Arc<MemoryLogger>) {
    let logger = Arc::new(MemoryLogger::new());
    let ctx = GenerationContext::builder()
        .with_registry(build_registry(config).unwrap())
        .with_logger(Arc::clone(&logger))
        .build();
    (ctx, logger)
}

#[tokio::test]
async fn default_config_adds_headers_and_drops_docker() {
    let config = DemoConfig::default().with_license_header(Some("Acme Corp".to_owned()));
    let (ctx, logger) = context(&config);

    let modules = generate(&ctx, &config).await;

    let paths: Vec<_> = modules.iter().map(|m| m.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "src/user/user.module.ts",
            "src/user/user.service.ts",
            "src/user/user.controller.ts",
            "src/order/order.module.ts",
            "src/order/order.service.ts",
            "src/order/order.controller.ts",
            "DOCKER.md",
        ]
    );
    for module in &modules[..6] {
        assert!(module.content.starts_with("// Acme Corp\n"), "{}", module.path);
    }
    assert!(modules[6].content.contains("demo-server"));

    // Every event is hooked, so the context recorded the same output.
    assert_eq!(ctx.finish(), modules);
    assert!(logger.errors().is_empty());

    let entries = logger.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "docker-compose generation disabled");
    assert_eq!(
        entries[0].payload,
        serde_json::json!({ "name": "demo-server", "entities": ["User", "Order"] })
    );
}

#[tokio::test]
async fn docker_enabled_without_license_runs_defaults() {
    let config = DemoConfig::default()
        .with_entities(vec!["Invoice".to_owned()])
        .with_license_header(None)
        .with_docker(true);
    let (ctx, _logger) = context(&config);

    let modules = generate(&ctx, &config).await;

    assert_eq!(modules.len(), 4);
    assert_eq!(modules[3].path, "docker-compose.yml");
    assert!(modules[0].content.starts_with("@Module"));
    assert_eq!(ctx.module_count(), 0);
}

#[tokio::test]
async fn invalid_entity_is_logged_and_skipped() {
    let config = DemoConfig::default().with_entities(vec!["Valid".to_owned(), " ".to_owned()]);
    let (ctx, logger) = context(&config);

    let modules = generate(&ctx, &config).await;

    // Three files for "Valid", nothing for the blank entity, plus DOCKER.md.
    assert_eq!(modules.len(), 4);

    let errors = logger.errors();
    assert_eq!(errors.len(), 3);
    assert_eq!(
        errors[0].message,
        format!("failed to execute plugin event {}", EventName::CreateEntityModule)
    );
    assert_eq!(errors[0].payload["errorMessage"], "entity name is empty");
}
