// packages/engine/src/proxy/factory.rs
//! Factory entry point
//!
//! `get_instance(interface, implementation, constructor_arguments)` builds
//! (or reuses) the proxy type for the pair and instantiates it.

use crate::proxy::builder::{BuildContext, ProxyType, ProxyTypeBuilder};
use crate::proxy::cache::ProxyTypeCache;
use crate::proxy::descriptor::InterfaceDescriptor;
use crate::proxy::implementation::ImplementationType;
use crate::proxy::instance::ProxyInstance;
use crate::proxy::value::Value;
use crate::utils::config::ProxyConfig;
use crate::utils::errors::Result;
use std::sync::Arc;
use tracing::debug;

/// Creates proxy instances
pub struct InterceptorFactory {
    context: BuildContext,
    cache: Option<ProxyTypeCache>,
}

impl InterceptorFactory {
    /// Factory building a fresh proxy type on every request
    pub fn new(context: BuildContext) -> Self {
        Self { context, cache: None }
    }

    /// Factory reusing proxy types per (interface, implementation) pair
    pub fn with_cache(context: BuildContext) -> Self {
        Self {
            context,
            cache: Some(ProxyTypeCache::new()),
        }
    }

    pub fn from_config(config: &ProxyConfig) -> Self {
        let context = BuildContext::from_config(&config.build);
        if config.cache.enabled {
            Self::with_cache(context)
        } else {
            Self::new(context)
        }
    }

    /// Build context used for every build
    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    pub fn cache(&self) -> Option<&ProxyTypeCache> {
        self.cache.as_ref()
    }

    /// Proxy type for the pair
    pub fn proxy_type<T: 'static>(
        &self,
        interface: &InterfaceDescriptor,
        implementation: Arc<ImplementationType<T>>,
    ) -> Result<ProxyType<T>> {
        let build = || {
            ProxyTypeBuilder::from_shared(interface.clone(), Arc::clone(&implementation))
                .with_context(self.context.clone())
                .build()
        };

        match &self.cache {
            Some(cache) => cache.get_or_build(interface, &implementation, build),
            None => build(),
        }
    }

    /// Proxy instance wrapping an implementation constructed from `constructor_arguments`
    pub fn get_instance<T: 'static>(
        &self,
        interface: &InterfaceDescriptor,
        implementation: Arc<ImplementationType<T>>,
        constructor_arguments: Vec<Value>,
    ) -> Result<ProxyInstance<T>> {
        debug!(
            "Creating {} proxy over {} with {} constructor argument(s)",
            interface.name,
            implementation.name(),
            constructor_arguments.len()
        );

        self.proxy_type(interface, implementation)?
            .instantiate(constructor_arguments)
    }
}

impl Default for InterceptorFactory {
    fn default() -> Self {
        Self::new(BuildContext::default())
    }
}

/// Build a proxy type with default settings and instantiate it
pub fn get_instance<T: 'static>(
    interface: &InterfaceDescriptor,
    implementation: ImplementationType<T>,
    constructor_arguments: Vec<Value>,
) -> Result<ProxyInstance<T>> {
    InterceptorFactory::default().get_instance(interface, Arc::new(implementation), constructor_arguments)
}
