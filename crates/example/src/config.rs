//! Demo configuration.

/// Environment variable overriding the license header. Empty disables it.
pub const LICENSE_ENV: &str = "GENHOOK_DEMO_LICENSE";

/// Environment variable enabling docker-compose generation (`1` or `true`).
pub const DOCKER_ENV: &str = "GENHOOK_DEMO_DOCKER";

const DEFAULT_LICENSE: &str = "Copyright (c) genhook demo authors. Licensed under Apache-2.0.";

/// What the demo generates and which plugins it installs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Name of the generated server.
    pub server_name: String,
    /// Entities to generate, in order.
    pub entities: Vec<String>,
    /// License header installed by `LicenseHeaderPlugin`, if any.
    pub license_header: Option<String>,
    /// Whether docker-compose generation runs. When false, `NoDockerPlugin`
    /// is installed.
    pub docker: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            server_name: "demo-server".to_owned(),
            entities: vec!["User".to_owned(), "Order".to_owned()],
            license_header: Some(DEFAULT_LICENSE.to_owned()),
            docker: false,
        }
    }
}

impl DemoConfig {
    /// Builds the configuration from command-line entity names and the
    /// process environment.
    #[must_use]
    pub fn from_env(args: impl IntoIterator<Item = String>) -> Self {
        Self::from_lookup(args, |key| std::env::var(key).ok())
    }

    /// Builds the configuration from entity names and variables read through
    /// `lookup`. No entity names keeps the defaults.
    #[must_use]
    pub fn from_lookup(
        args: impl IntoIterator<Item = String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut config = Self::default();

        let entities: Vec<String> = args
            .into_iter()
            .map(|arg| arg.trim().to_owned())
            .filter(|arg| !arg.is_empty())
            .collect();
        if !entities.is_empty() {
            config = config.with_entities(entities);
        }

        if let Some(license) = lookup(LICENSE_ENV) {
            config.license_header = Some(license).filter(|l| !l.trim().is_empty());
        }

        if let Some(docker) = lookup(DOCKER_ENV) {
            config.docker = matches!(docker.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }

        config
    }

    /// Sets the entities to generate.
    #[must_use]
    pub fn with_entities(mut self, entities: Vec<String>) -> Self {
        self.entities = entities;
        self
    }

    /// Sets the license header. `None` disables `LicenseHeaderPlugin`.
    #[must_use]
    pub fn with_license_header(mut self, header: Option<String>) -> Self {
        self.license_header = header;
        self
    }

    /// Enables or disables docker-compose generation.
    #[must_use]
    pub fn with_docker(mut self, docker: bool) -> Self {
        self.docker = docker;
        self
    }
}
