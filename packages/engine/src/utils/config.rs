// packages/engine/src/utils/config.rs
//! Layered configuration for the proxy engine
//!
//! Sources, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. Optional `dynproxy.{toml,yaml,json}` file
//! 3. `DYNPROXY__*` environment variables (e.g. `DYNPROXY__LOGGING__LEVEL=debug`)

use crate::proxy::artifact::ArtifactFormat;
use crate::utils::errors::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default config file stem
const CONFIG_FILE: &str = "dynproxy";

/// Environment variable prefix
const ENV_PREFIX: &str = "DYNPROXY";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Proxy type build settings
    pub build: BuildSettings,

    /// Proxy type cache settings
    pub cache: CacheSettings,

    /// Logging settings
    pub logging: LoggingSettings,
}

/// Settings applied to every proxy type build
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Prefix for generated type names
    pub type_name_prefix: String,

    /// Directory receiving debug artifacts (disabled when unset)
    pub artifact_dir: Option<PathBuf>,

    /// Debug artifact format
    pub artifact_format: ArtifactFormat,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            type_name_prefix: "Dynamic".to_string(),
            artifact_dir: None,
            artifact_format: ArtifactFormat::Json,
        }
    }
}

/// Proxy type cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Reuse built proxy types per (interface, implementation) pair
    pub enabled: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,

    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ProxyConfig {
    /// Load configuration from the working directory and environment
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration using an explicit config file path (extension optional)
    pub fn load_from(path: &str) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
