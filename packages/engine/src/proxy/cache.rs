// packages/engine/src/proxy/cache.rs
//! Cache of built proxy types
//!
//! Building is cheap but not free; a long-lived process creating many
//! instances of the same pair can reuse one [`ProxyType`]. Entries are keyed
//! by the full interface descriptor and by the identity of the shared
//! implementation metadata, so two implementation descriptions with the same
//! name but different declarations never share a proxy type. A cached proxy
//! type holds its implementation `Arc`, which keeps the identity stable for
//! as long as the entry lives.

use crate::proxy::builder::ProxyType;
use crate::proxy::descriptor::InterfaceDescriptor;
use crate::proxy::implementation::ImplementationType;
use crate::utils::errors::{ProxyError, Result};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use metrics::counter;
use std::any::{Any, TypeId};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    interface: InterfaceDescriptor,
    implementation: usize,
    type_id: TypeId,
}

impl CacheKey {
    fn new<T: 'static>(interface: &InterfaceDescriptor, implementation: &Arc<ImplementationType<T>>) -> Self {
        Self {
            interface: interface.clone(),
            implementation: Arc::as_ptr(implementation) as usize,
            type_id: TypeId::of::<T>(),
        }
    }
}

/// Concurrent proxy type cache
#[derive(Default)]
pub struct ProxyTypeCache {
    types: DashMap<CacheKey, Arc<dyn Any + Send + Sync>>,
}

impl ProxyTypeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached proxy type for the pair, building it on first use
    ///
    /// `build` must produce a proxy type over `implementation` itself. A
    /// failed build leaves no entry behind.
    pub fn get_or_build<T, F>(
        &self,
        interface: &InterfaceDescriptor,
        implementation: &Arc<ImplementationType<T>>,
        build: F,
    ) -> Result<ProxyType<T>>
    where
        T: 'static,
        F: FnOnce() -> Result<ProxyType<T>>,
    {
        let key = CacheKey::new(interface, implementation);

        match self.types.entry(key) {
            Entry::Occupied(entry) => {
                counter!("dynproxy_cache_hits_total").increment(1);
                debug!("Proxy type cache hit for {} / {}", interface.name, implementation.name());
                entry
                    .get()
                    .downcast_ref::<ProxyType<T>>()
                    .cloned()
                    .ok_or_else(|| {
                        ProxyError::MalformedDescriptor(format!(
                            "cached proxy type for {} / {} has an unexpected type",
                            interface.name,
                            implementation.name()
                        ))
                    })
            }
            Entry::Vacant(entry) => {
                let proxy_type = build()?;
                entry.insert(Arc::new(proxy_type.clone()));
                Ok(proxy_type)
            }
        }
    }

    /// Whether a pair is cached
    pub fn contains<T: 'static>(
        &self,
        interface: &InterfaceDescriptor,
        implementation: &Arc<ImplementationType<T>>,
    ) -> bool {
        self.types.contains_key(&CacheKey::new(interface, implementation))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Drop every cached proxy type
    pub fn clear(&self) {
        self.types.clear();
    }
}
