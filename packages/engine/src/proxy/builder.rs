// packages/engine/src/proxy/builder.rs
//! Proxy type builder
//!
//! Turns an interface descriptor and an implementation type into a
//! [`ProxyType`]: a dispatch table holding one entry per interface method.
//! Each entry's route (direct or routed through an interceptor) is decided
//! here, once, so the direct path pays no per-call registry lookup.
//!
//! Builds are independent: every build gets its own id, registry and
//! dispatch table, and nothing is shared between builds except the
//! interceptor instances the implementation type declared.

use crate::interception::context::InterceptionContext;
use crate::interception::registry::InterceptorRegistry;
use crate::proxy::arguments::ArgumentPack;
use crate::proxy::artifact::{ArtifactExporter, ArtifactFormat, MethodDescription, ProxyTypeDescription};
use crate::proxy::descriptor::{InterfaceDescriptor, MethodDescriptor};
use crate::proxy::implementation::{ImplementationType, MethodInvoker};
use crate::proxy::instance::ProxyInstance;
use crate::proxy::value::Value;
use crate::utils::config::BuildSettings;
use crate::utils::errors::{ProxyError, Result};
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};
use ulid::Ulid;

/// How a proxy method reaches the wrapped instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Forwarded unchanged
    Direct,

    /// Passed through the method's interceptor
    Routed,
}

/// Per-build settings
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Prefix for generated type names
    pub type_name_prefix: String,

    /// Where to persist the debug artifact, if anywhere
    pub artifact_dir: Option<PathBuf>,

    /// Debug artifact format
    pub artifact_format: ArtifactFormat,
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::from_config(&BuildSettings::default())
    }
}

impl BuildContext {
    pub fn from_config(settings: &BuildSettings) -> Self {
        Self {
            type_name_prefix: settings.type_name_prefix.clone(),
            artifact_dir: settings.artifact_dir.clone(),
            artifact_format: settings.artifact_format,
        }
    }

    /// Persist artifacts into `dir`
    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = Some(dir.into());
        self
    }

    pub fn with_artifact_format(mut self, format: ArtifactFormat) -> Self {
        self.artifact_format = format;
        self
    }
}

/// One interface method's dispatch decision
#[derive(Debug, Clone)]
struct DispatchEntry {
    descriptor: MethodDescriptor,
    invoker: MethodInvoker,
    route: Route,
}

struct ProxyTypeInner<T> {
    id: Ulid,
    type_name: String,
    generated_at: DateTime<Utc>,
    interface: InterfaceDescriptor,
    implementation: Arc<ImplementationType<T>>,
    registry: Arc<InterceptorRegistry>,
    dispatch: HashMap<String, DispatchEntry>,
}

/// A built proxy type
///
/// Cheap to clone; clones share the same dispatch table.
pub struct ProxyType<T> {
    inner: Arc<ProxyTypeInner<T>>,
}

impl<T> Clone for ProxyType<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: 'static> ProxyType<T> {
    /// Build identifier, unique per build
    pub fn id(&self) -> Ulid {
        self.inner.id
    }

    /// Generated type name (e.g. `DynamicPerson`)
    pub fn type_name(&self) -> &str {
        &self.inner.type_name
    }

    pub fn interface(&self) -> &InterfaceDescriptor {
        &self.inner.interface
    }

    pub fn implementation(&self) -> &ImplementationType<T> {
        &self.inner.implementation
    }

    pub fn registry(&self) -> &InterceptorRegistry {
        &self.inner.registry
    }

    /// Route chosen for an exposed method
    pub fn route(&self, method: &str) -> Option<Route> {
        self.inner.dispatch.get(method).map(|entry| entry.route)
    }

    /// Whether the proxy exposes a method
    pub fn exposes(&self, method: &str) -> bool {
        self.inner.dispatch.contains_key(method)
    }

    /// Construct the wrapped instance and wrap it
    pub fn instantiate(&self, args: Vec<Value>) -> Result<ProxyInstance<T>> {
        let implementation = &self.inner.implementation;
        let constructor = implementation.find_constructor(&args)?;
        let target = constructor.construct(implementation.name(), args)?;

        debug!("Instantiated {} wrapping {}", self.inner.type_name, implementation.name());
        Ok(ProxyInstance::new(self.clone(), target))
    }

    /// Debug description of this proxy type
    pub fn describe(&self) -> ProxyTypeDescription {
        let inner = &self.inner;

        let methods = inner
            .interface
            .methods
            .iter()
            .filter_map(|signature| inner.dispatch.get(&signature.name))
            .map(|entry| MethodDescription {
                name: entry.descriptor.name.clone(),
                parameters: entry.descriptor.parameters.clone(),
                return_type: entry.descriptor.return_type,
                route: entry.route,
                interceptor: inner
                    .registry
                    .get(&entry.descriptor.name)
                    .map(|i| i.name().to_string()),
            })
            .collect();

        ProxyTypeDescription {
            id: inner.id.to_string(),
            type_name: inner.type_name.clone(),
            interface: inner.interface.name.clone(),
            implementation: inner.implementation.name().to_string(),
            generated_at: inner.generated_at,
            constructors: inner.implementation.constructor_signatures(),
            methods,
        }
    }

    /// Dispatch one call against a wrapped instance
    pub(crate) fn dispatch(&self, target: &mut T, method: &str, args: Vec<Value>) -> Result<Value> {
        let entry = self
            .inner
            .dispatch
            .get(method)
            .ok_or_else(|| ProxyError::MethodNotFound {
                type_name: self.inner.type_name.clone(),
                method: method.to_string(),
            })?;

        let pack = ArgumentPack::create(&entry.descriptor, args)?;

        match entry.route {
            Route::Direct => entry.invoker.invoke(target, &pack),
            Route::Routed => self.dispatch_routed(entry, target, &pack),
        }
    }

    fn dispatch_routed(&self, entry: &DispatchEntry, target: &mut T, pack: &ArgumentPack) -> Result<Value> {
        let descriptor = &entry.descriptor;
        let interceptor = self.inner.registry.require(&descriptor.name)?;

        counter!("dynproxy_intercepted_calls_total").increment(1);
        trace!(
            "Routing {} through interceptor {}",
            descriptor.qualified_name(),
            interceptor.name()
        );

        let mut context = InterceptionContext::new(descriptor, pack, target, &entry.invoker);
        interceptor.intercept(&mut context)?;
        let slot = context.into_return_value();

        if descriptor.is_void() {
            return Ok(Value::Unit);
        }

        match slot {
            Some(value) if descriptor.return_type.accepts(value.type_tag()) => Ok(value),
            other => Err(ProxyError::ReturnTypeMismatch {
                method: descriptor.qualified_name(),
                expected: descriptor.return_type,
                actual: other.map(|v| v.type_tag()),
            }),
        }
    }
}

impl<T> fmt::Debug for ProxyType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut routes: Vec<_> = self
            .inner
            .dispatch
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.route))
            .collect();
        routes.sort_unstable_by(|a, b| a.0.cmp(b.0));

        f.debug_struct("ProxyType")
            .field("id", &self.inner.id)
            .field("type_name", &self.inner.type_name)
            .field("interface", &self.inner.interface.name)
            .field("routes", &routes)
            .finish()
    }
}

/// Builds [`ProxyType`]s
pub struct ProxyTypeBuilder<T> {
    interface: InterfaceDescriptor,
    implementation: Arc<ImplementationType<T>>,
    context: BuildContext,
}

impl<T: 'static> ProxyTypeBuilder<T> {
    pub fn new(interface: InterfaceDescriptor, implementation: ImplementationType<T>) -> Self {
        Self::from_shared(interface, Arc::new(implementation))
    }

    /// Build from implementation metadata shared with other builds
    pub fn from_shared(interface: InterfaceDescriptor, implementation: Arc<ImplementationType<T>>) -> Self {
        Self {
            interface,
            implementation,
            context: BuildContext::default(),
        }
    }

    pub fn with_context(mut self, context: BuildContext) -> Self {
        self.context = context;
        self
    }

    /// Build the proxy type
    ///
    /// Either every interface method gets a dispatch entry or the build fails.
    pub fn build(self) -> Result<ProxyType<T>> {
        let result = self.build_inner();
        if let Err(e) = &result {
            warn!("Proxy type build failed: {}", e);
        }
        result
    }

    fn build_inner(self) -> Result<ProxyType<T>> {
        let Self {
            interface,
            implementation,
            context,
        } = self;

        interface.validate()?;
        implementation.validate()?;

        let registry = InterceptorRegistry::build(&implementation)?;
        let type_name = format!("{}{}", context.type_name_prefix, implementation.name());

        let mut dispatch = HashMap::with_capacity(interface.methods.len());
        for signature in &interface.methods {
            let method = implementation.declared_method(&signature.name).ok_or_else(|| {
                ProxyError::MalformedDescriptor(format!(
                    "{} does not declare {}.{}",
                    implementation.name(),
                    interface.name,
                    signature.name
                ))
            })?;

            if !method.descriptor.satisfies(signature) {
                return Err(ProxyError::MalformedDescriptor(format!(
                    "{} does not match the signature of {}.{}",
                    method.descriptor.qualified_name(),
                    interface.name,
                    signature.name
                )));
            }

            let route = if registry.contains(&signature.name) {
                Route::Routed
            } else {
                Route::Direct
            };
            debug!("{}::{} -> {:?}", type_name, signature.name, route);

            dispatch.insert(
                signature.name.clone(),
                DispatchEntry {
                    descriptor: method.descriptor.clone(),
                    invoker: method.invoker.clone(),
                    route,
                },
            );
        }

        let proxy_type = ProxyType {
            inner: Arc::new(ProxyTypeInner {
                id: Ulid::new(),
                type_name,
                generated_at: Utc::now(),
                interface,
                implementation,
                registry: Arc::new(registry),
                dispatch,
            }),
        };

        if let Some(dir) = &context.artifact_dir {
            let path = ArtifactExporter::new(context.artifact_format).write_to(dir, &proxy_type.describe())?;
            debug!("Wrote proxy type artifact to {:?}", path);
        }

        counter!("dynproxy_types_built_total").increment(1);
        info!(
            "Built proxy type {} ({}) implementing {} with {} routed method(s)",
            proxy_type.type_name(),
            proxy_type.id(),
            proxy_type.interface().name,
            proxy_type.registry().len()
        );

        Ok(proxy_type)
    }
}
