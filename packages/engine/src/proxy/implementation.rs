// packages/engine/src/proxy/implementation.rs
//! Implementation type metadata
//!
//! Rust has no runtime reflection, so an implementation type describes
//! itself explicitly: its constructors, its methods (each paired with an
//! invoker closure) and the interceptors declared on those methods.
//!
//! ```
//! use dynproxy_engine::interception::PassThrough;
//! use dynproxy_engine::proxy::{ImplementationType, TypeTag, Value};
//!
//! struct Counter(i32);
//!
//! let counter = ImplementationType::<Counter>::new("Counter")
//!     .constructor(&[("start", TypeTag::I32)], |args| Ok(Counter(args.value("start")?)))
//!     .method("bump", &[], TypeTag::I32, |c, _| {
//!         c.0 += 1;
//!         Ok(Value::I32(c.0))
//!     })
//!     .intercept("bump", PassThrough);
//!
//! assert_eq!(counter.declared_methods().count(), 1);
//! ```

use crate::interception::interceptor::Interceptor;
use crate::proxy::arguments::ArgumentPack;
use crate::proxy::descriptor::{format_parameters, parameters, MethodDescriptor, Parameter};
use crate::proxy::value::{TypeTag, Value};
use crate::utils::errors::{ProxyError, Result};
use std::any::{type_name, Any};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

type ErasedBody = dyn Fn(&mut dyn Any, &ArgumentPack) -> Result<Value> + Send + Sync;

/// Type-erased method body
///
/// Wraps a typed `Fn(&mut T, &ArgumentPack)` so that interception contexts
/// can call it without knowing `T`.
#[derive(Clone)]
pub struct MethodInvoker {
    body: Arc<ErasedBody>,
}

impl MethodInvoker {
    fn new<T, F>(body: F) -> Self
    where
        T: 'static,
        F: Fn(&mut T, &ArgumentPack) -> Result<Value> + Send + Sync + 'static,
    {
        let erased = move |target: &mut dyn Any, args: &ArgumentPack| -> Result<Value> {
            let target = target.downcast_mut::<T>().ok_or_else(|| {
                ProxyError::invocation(format!("target is not a {}", type_name::<T>()))
            })?;
            body(target, args)
        };
        Self {
            body: Arc::new(erased),
        }
    }

    /// Run the method body against a target instance
    pub fn invoke(&self, target: &mut dyn Any, args: &ArgumentPack) -> Result<Value> {
        (self.body)(target, args)
    }
}

impl fmt::Debug for MethodInvoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MethodInvoker")
    }
}

/// A method declared on (or inherited by) an implementation type
#[derive(Debug, Clone)]
pub struct ImplementedMethod {
    pub descriptor: MethodDescriptor,
    pub invoker: MethodInvoker,
}

/// A constructor of an implementation type
pub struct Constructor<T> {
    parameters: Vec<Parameter>,
    body: Arc<dyn Fn(&ArgumentPack) -> Result<T> + Send + Sync>,
}

impl<T> Constructor<T> {
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Whether the constructor accepts these positional arguments
    pub fn accepts(&self, args: &[Value]) -> bool {
        self.parameters.len() == args.len()
            && self
                .parameters
                .iter()
                .zip(args)
                .all(|(param, value)| param.type_tag.accepts(value.type_tag()))
    }

    /// Construct an instance
    pub fn construct(&self, type_name: &str, args: Vec<Value>) -> Result<T> {
        let pack = ArgumentPack::pack(type_name, &self.parameters, args)?;
        (self.body)(&pack)
    }
}

impl<T> Clone for Constructor<T> {
    fn clone(&self) -> Self {
        Self {
            parameters: self.parameters.clone(),
            body: Arc::clone(&self.body),
        }
    }
}

impl<T> fmt::Debug for Constructor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// Interceptor declared for a method
#[derive(Clone)]
pub struct InterceptorDeclaration {
    pub method: String,
    pub interceptor: Arc<dyn Interceptor>,
}

impl fmt::Debug for InterceptorDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorDeclaration")
            .field("method", &self.method)
            .field("interceptor", &self.interceptor.name())
            .finish()
    }
}

/// Reflection-equivalent metadata for an implementation type `T`
pub struct ImplementationType<T> {
    name: String,
    constructors: Vec<Constructor<T>>,
    methods: Vec<ImplementedMethod>,
    declarations: Vec<InterceptorDeclaration>,
}

impl<T: 'static> ImplementationType<T> {
    /// Start describing an implementation type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constructors: Vec::new(),
            methods: Vec::new(),
            declarations: Vec::new(),
        }
    }

    /// Register a constructor
    pub fn constructor<F>(mut self, params: &[(&str, TypeTag)], body: F) -> Self
    where
        F: Fn(&ArgumentPack) -> Result<T> + Send + Sync + 'static,
    {
        self.constructors.push(Constructor {
            parameters: parameters(params),
            body: Arc::new(body),
        });
        self
    }

    /// Register a method declared directly on this type
    pub fn method<F>(mut self, name: &str, params: &[(&str, TypeTag)], return_type: TypeTag, body: F) -> Self
    where
        F: Fn(&mut T, &ArgumentPack) -> Result<Value> + Send + Sync + 'static,
    {
        let descriptor = MethodDescriptor::new(self.name.clone(), name, parameters(params), return_type);
        self.methods.push(ImplementedMethod {
            descriptor,
            invoker: MethodInvoker::new(body),
        });
        self
    }

    /// Register a method inherited from a parent type
    ///
    /// Inherited methods are carried for completeness but never proxied and
    /// cannot carry interceptors.
    pub fn inherited_method<F>(
        mut self,
        parent: &str,
        name: &str,
        params: &[(&str, TypeTag)],
        return_type: TypeTag,
        body: F,
    ) -> Self
    where
        F: Fn(&mut T, &ArgumentPack) -> Result<Value> + Send + Sync + 'static,
    {
        let mut descriptor = MethodDescriptor::new(parent, name, parameters(params), return_type);
        descriptor.inherited = true;
        self.methods.push(ImplementedMethod {
            descriptor,
            invoker: MethodInvoker::new(body),
        });
        self
    }

    /// Declare an interceptor for a method
    pub fn intercept<I: Interceptor + 'static>(self, method: &str, interceptor: I) -> Self {
        self.intercept_shared(method, Arc::new(interceptor))
    }

    /// Declare an already shared interceptor for a method
    pub fn intercept_shared(mut self, method: &str, interceptor: Arc<dyn Interceptor>) -> Self {
        self.declarations.push(InterceptorDeclaration {
            method: method.to_string(),
            interceptor,
        });
        self
    }
}

impl<T> ImplementationType<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constructors(&self) -> &[Constructor<T>] {
        &self.constructors
    }

    /// All methods, inherited ones included
    pub fn methods(&self) -> &[ImplementedMethod] {
        &self.methods
    }

    /// Methods declared directly on this type
    pub fn declared_methods(&self) -> impl Iterator<Item = &ImplementedMethod> {
        self.methods.iter().filter(|m| !m.descriptor.inherited)
    }

    /// Directly declared method by name
    pub fn declared_method(&self, name: &str) -> Option<&ImplementedMethod> {
        self.declared_methods().find(|m| m.descriptor.name == name)
    }

    /// Interceptor declarations in registration order
    pub fn declarations(&self) -> &[InterceptorDeclaration] {
        &self.declarations
    }

    /// Check that directly declared method names are unique
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for method in self.declared_methods() {
            if !seen.insert(method.descriptor.name.as_str()) {
                return Err(ProxyError::MalformedDescriptor(format!(
                    "{} declares method {} more than once",
                    self.name, method.descriptor.name
                )));
            }
        }
        Ok(())
    }

    /// First constructor accepting the given arguments
    pub fn find_constructor(&self, args: &[Value]) -> Result<&Constructor<T>> {
        self.constructors
            .iter()
            .find(|ctor| ctor.accepts(args))
            .ok_or_else(|| ProxyError::ConstructorNotFound {
                type_name: self.name.clone(),
                signature: args
                    .iter()
                    .map(|v| v.type_tag().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Human readable constructor signatures
    pub fn constructor_signatures(&self) -> Vec<String> {
        self.constructors
            .iter()
            .map(|ctor| format!("{}({})", self.name, format_parameters(&ctor.parameters)))
            .collect()
    }
}

impl<T> fmt::Debug for ImplementationType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImplementationType")
            .field("name", &self.name)
            .field("constructors", &self.constructor_signatures())
            .field("methods", &self.methods.len())
            .field("declarations", &self.declarations)
            .finish()
    }
}
