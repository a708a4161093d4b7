// packages/engine/src/interception/registry.rs
//! Interceptor registry
//!
//! Maps method names to interceptors for one implementation type. Built
//! once per (interface, implementation) pair, immutable afterwards and
//! shared read-only by every proxy instance of that pair.

use crate::interception::interceptor::Interceptor;
use crate::proxy::implementation::ImplementationType;
use crate::utils::errors::{ProxyError, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Method name to interceptor mapping
#[derive(Clone, Default)]
pub struct InterceptorRegistry {
    interceptors: HashMap<String, Arc<dyn Interceptor>>,
}

impl InterceptorRegistry {
    /// Scan an implementation type's interceptor declarations
    ///
    /// Fails when a method is declared more than once, or when a declaration
    /// names a method that is not declared directly on the type.
    pub fn build<T>(implementation: &ImplementationType<T>) -> Result<Self> {
        let mut interceptors: HashMap<String, Arc<dyn Interceptor>> = HashMap::new();

        for declaration in implementation.declarations() {
            if implementation.declared_method(&declaration.method).is_none() {
                return Err(ProxyError::MalformedDescriptor(format!(
                    "interceptor {} declared on {}::{}, which is not a method declared by {}",
                    declaration.interceptor.name(),
                    implementation.name(),
                    declaration.method,
                    implementation.name()
                )));
            }

            if interceptors.contains_key(&declaration.method) {
                return Err(ProxyError::DuplicateInterceptorDeclaration {
                    type_name: implementation.name().to_string(),
                    method: declaration.method.clone(),
                });
            }

            debug!(
                "Registering interceptor {} for {}::{}",
                declaration.interceptor.name(),
                implementation.name(),
                declaration.method
            );
            interceptors.insert(declaration.method.clone(), Arc::clone(&declaration.interceptor));
        }

        Ok(Self { interceptors })
    }

    /// Interceptor for a method
    pub fn get(&self, method: &str) -> Option<&Arc<dyn Interceptor>> {
        self.interceptors.get(method)
    }

    /// Interceptor for a method, failing when absent
    pub fn require(&self, method: &str) -> Result<&Arc<dyn Interceptor>> {
        self.get(method).ok_or_else(|| ProxyError::InterceptorNotFound {
            method: method.to_string(),
        })
    }

    pub fn contains(&self, method: &str) -> bool {
        self.interceptors.contains_key(method)
    }

    /// Intercepted method names, sorted
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.interceptors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }
}

impl fmt::Debug for InterceptorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for name in self.method_names() {
            if let Some(interceptor) = self.interceptors.get(name) {
                map.entry(&name, &interceptor.name());
            }
        }
        map.finish()
    }
}
