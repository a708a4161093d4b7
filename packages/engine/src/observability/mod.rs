// packages/engine/src/observability/mod.rs
//! Tracing setup
//!
//! Installs a `tracing-subscriber` fmt subscriber. `RUST_LOG` takes
//! precedence over the configured level. Safe to call more than once; only
//! the first call installs a subscriber.

use crate::utils::config::LoggingSettings;
use crate::utils::errors::{ProxyError, Result};
use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static TRACING: OnceCell<()> = OnceCell::new();

/// Initialize tracing with the given settings
pub fn init_tracing(settings: &LoggingSettings) -> Result<()> {
    TRACING
        .get_or_try_init(|| {
            let filter = EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&settings.level))
                .map_err(|e| ProxyError::ConfigError(format!("invalid log filter: {}", e)))?;

            let builder = tracing_subscriber::fmt().with_env_filter(filter);
            let installed = if settings.json {
                builder.json().try_init()
            } else {
                builder.try_init()
            };

            installed.map_err(|e| ProxyError::ConfigError(format!("failed to install subscriber: {}", e)))
        })
        .map(|_| ())
}
