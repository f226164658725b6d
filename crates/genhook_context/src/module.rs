//! Generated output units.

use serde::{Deserialize, Serialize};

/// One unit of generated output: a logical path and its rendered content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleArtifact {
    /// Logical path of the artifact, relative to the generated project root.
    pub path: String,
    /// Rendered content.
    pub content: String,
}

impl ModuleArtifact {
    /// Creates an artifact from a path and its content.
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// The artifacts produced by one event invocation, in production order.
pub type Modules = Vec<ModuleArtifact>;
