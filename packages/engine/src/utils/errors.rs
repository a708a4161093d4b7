// packages/engine/src/utils/errors.rs
//! Error types for the proxy engine
//!
//! Errors fall into two groups:
//!
//! - **Build-time**: raised while building a proxy type or instantiating it.
//!   No partially built proxy is ever handed out.
//! - **Call-time**: raised by a single proxy call. They never corrupt the
//!   proxy type, its registry or the wrapped instance for later calls.

use crate::proxy::value::TypeTag;
use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, ProxyError>;

/// Proxy engine errors
#[derive(Debug, Error)]
pub enum ProxyError {
    /// No constructor accepts the given arguments
    #[error("no constructor of {type_name} accepts ({signature})")]
    ConstructorNotFound { type_name: String, signature: String },

    /// A method carries more than one interceptor declaration
    #[error("method {type_name}::{method} declares more than one interceptor")]
    DuplicateInterceptorDeclaration { type_name: String, method: String },

    /// Inconsistent interface or implementation metadata
    #[error("malformed descriptor: {0}")]
    MalformedDescriptor(String),

    /// Wrong number of arguments for a method
    #[error("{method} expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        method: String,
        expected: usize,
        actual: usize,
    },

    /// Argument value does not fit the declared parameter type
    #[error("{method}: parameter '{parameter}' expects {expected}, got {actual}")]
    TypeMismatch {
        method: String,
        parameter: String,
        expected: TypeTag,
        actual: TypeTag,
    },

    /// Argument pack lookup by an undeclared parameter name
    #[error("{method} has no parameter named '{parameter}'")]
    UnknownParameter { method: String, parameter: String },

    /// Routed method without a registered interceptor
    #[error("no interceptor registered for {method}")]
    InterceptorNotFound { method: String },

    /// Interceptor left a return value of the wrong shape
    #[error("{method} must return {expected}, interceptor left {}", describe_actual(.actual))]
    ReturnTypeMismatch {
        method: String,
        expected: TypeTag,
        actual: Option<TypeTag>,
    },

    /// Attempt to write the return slot of a void method
    #[error("{method} returns nothing; its return value cannot be written")]
    VoidReturnNotWritable { method: String },

    /// The proxy does not expose the requested method
    #[error("proxy {type_name} does not expose method {method}")]
    MethodNotFound { type_name: String, method: String },

    /// Failure raised by a wrapped method body or an interceptor
    #[error("invocation failed: {0}")]
    InvocationFailed(String),

    /// Debug artifact could not be rendered or written
    #[error("artifact failed: {0}")]
    ArtifactFailed(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl ProxyError {
    /// Shorthand for failures raised from method bodies and interceptors
    pub fn invocation(message: impl Into<String>) -> Self {
        ProxyError::InvocationFailed(message.into())
    }

    /// Whether the error aborts a build (as opposed to a single call)
    pub fn is_build_time(&self) -> bool {
        matches!(
            self,
            ProxyError::ConstructorNotFound { .. }
                | ProxyError::DuplicateInterceptorDeclaration { .. }
                | ProxyError::MalformedDescriptor(_)
                | ProxyError::ArtifactFailed(_)
                | ProxyError::ConfigError(_)
        )
    }
}

fn describe_actual(actual: &Option<TypeTag>) -> String {
    match actual {
        Some(tag) => tag.to_string(),
        None => "no value".to_string(),
    }
}

impl From<config::ConfigError> for ProxyError {
    fn from(err: config::ConfigError) -> Self {
        ProxyError::ConfigError(err.to_string())
    }
}
