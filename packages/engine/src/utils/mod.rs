// packages/engine/src/utils/mod.rs
//! Common utilities shared by the proxy engine
//!
//! - **errors**: crate-wide error type and `Result` alias
//! - **config**: layered configuration (file + environment)

pub mod config;
pub mod errors;

pub use config::{BuildSettings, CacheSettings, LoggingSettings, ProxyConfig};
pub use errors::{ProxyError, Result};
