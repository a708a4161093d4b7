// packages/engine/src/proxy/artifact.rs
//! Debug artifacts for built proxy types
//!
//! Supports:
//! - JSON (default)
//! - YAML
//!
//! Artifacts are a debugging aid only; nothing reads them back.

use crate::proxy::builder::Route;
use crate::proxy::descriptor::Parameter;
use crate::proxy::value::TypeTag;
use crate::utils::errors::{ProxyError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Artifact formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    /// JSON format
    #[default]
    Json,

    /// YAML format
    Yaml,
}

impl ArtifactFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactFormat::Json => "json",
            ArtifactFormat::Yaml => "yaml",
        }
    }
}

/// Description of a built proxy type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyTypeDescription {
    /// Build id
    pub id: String,

    /// Generated type name
    pub type_name: String,

    /// Interface name
    pub interface: String,

    /// Implementation type name
    pub implementation: String,

    /// Build timestamp
    pub generated_at: DateTime<Utc>,

    /// Constructor signatures of the wrapped type
    pub constructors: Vec<String>,

    /// Exposed methods in interface order
    pub methods: Vec<MethodDescription>,
}

/// One exposed method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescription {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeTag,
    pub route: Route,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub interceptor: Option<String>,
}

/// Renders and persists proxy type descriptions
pub struct ArtifactExporter {
    format: ArtifactFormat,
}

impl ArtifactExporter {
    pub fn new(format: ArtifactFormat) -> Self {
        Self { format }
    }

    /// Render a description
    pub fn export(&self, description: &ProxyTypeDescription) -> Result<String> {
        debug!("Exporting {} as {:?}", description.type_name, self.format);

        match self.format {
            ArtifactFormat::Json => serde_json::to_string_pretty(description)
                .map_err(|e| ProxyError::ArtifactFailed(format!("JSON serialization error: {}", e))),
            ArtifactFormat::Yaml => serde_yaml::to_string(description)
                .map_err(|e| ProxyError::ArtifactFailed(format!("YAML serialization error: {}", e))),
        }
    }

    /// Write `<type_name>.<ext>` into `dir`, creating it if needed
    pub fn write_to(&self, dir: &Path, description: &ProxyTypeDescription) -> Result<PathBuf> {
        let rendered = self.export(description)?;

        std::fs::create_dir_all(dir).map_err(|e| {
            ProxyError::ArtifactFailed(format!("cannot create {}: {}", dir.display(), e))
        })?;

        let path = dir.join(format!("{}.{}", description.type_name, self.format.extension()));
        std::fs::write(&path, rendered).map_err(|e| {
            ProxyError::ArtifactFailed(format!("cannot write {}: {}", path.display(), e))
        })?;

        Ok(path)
    }
}
