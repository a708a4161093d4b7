// packages/engine/src/proxy/instance.rs
//! Proxy instances
//!
//! A [`ProxyInstance`] is a decorator: it owns exactly one wrapped
//! implementation instance and shares its proxy type (dispatch table and
//! interceptor registry) with every other instance of the same build.
//! It adds no locking; `invoke` takes `&mut self`.

use crate::proxy::builder::ProxyType;
use crate::proxy::value::{FromValue, Value};
use crate::utils::errors::{ProxyError, Result};
use std::fmt;

/// A wrapped implementation instance exposing an interface
pub struct ProxyInstance<T> {
    proxy_type: ProxyType<T>,
    target: T,
}

impl<T: 'static> ProxyInstance<T> {
    pub(crate) fn new(proxy_type: ProxyType<T>, target: T) -> Self {
        Self { proxy_type, target }
    }

    /// Call an interface method
    pub fn invoke(&mut self, method: &str, args: Vec<Value>) -> Result<Value> {
        self.proxy_type.dispatch(&mut self.target, method, args)
    }

    /// Call an interface method and convert its result
    pub fn invoke_as<R: FromValue>(&mut self, method: &str, args: Vec<Value>) -> Result<R> {
        let value = self.invoke(method, args)?;
        R::from_value(&value).ok_or_else(|| ProxyError::ReturnTypeMismatch {
            method: method.to_string(),
            expected: R::TAG,
            actual: Some(value.type_tag()),
        })
    }

    /// The proxy type this instance was created from
    pub fn proxy_type(&self) -> &ProxyType<T> {
        &self.proxy_type
    }

    /// Whether the proxy exposes a method
    pub fn exposes(&self, method: &str) -> bool {
        self.proxy_type.exposes(method)
    }

    /// The wrapped instance
    pub fn inner(&self) -> &T {
        &self.target
    }

    /// Unwrap the proxy
    pub fn into_inner(self) -> T {
        self.target
    }
}

impl<T: fmt::Debug> fmt::Debug for ProxyInstance<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyInstance")
            .field("proxy_type", &self.proxy_type)
            .field("target", &self.target)
            .finish()
    }
}
