//! Example generator CLI.
//!
//! Generates a small server for the given entities, customized by the demo
//! plugins.
//!
//! # Usage
//!
//! ```bash
//! genhook-demo [entity...]
//! ```
//!
//! # Example
//!
//! ```bash
//! GENHOOK_LOG=genhook=debug,info genhook-demo Customer Invoice
//! ```

use example::{DemoConfig, build_registry, generate};
use genhook_context::GenerationContext;
use genhook_tracing::TracingSetup;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    TracingSetup::from_env().init();

    let config = DemoConfig::from_env(std::env::args().skip(1));
    tracing::info!(
        entities = ?config.entities,
        license = config.license_header.is_some(),
        docker = config.docker,
        "starting generation"
    );

    let registry = match build_registry(&config) {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!(error = %e, "failed to install plugins");
            std::process::exit(1);
        }
    };

    let ctx = GenerationContext::new(registry);
    let modules = generate(&ctx, &config).await;

    for module in &modules {
        tracing::info!(path = %module.path, bytes = module.content.len(), "generated");
    }

    let recorded = ctx.finish();
    tracing::info!(
        generated = modules.len(),
        recorded = recorded.len(),
        "generation finished"
    );
}
