// packages/engine/src/interception/context.rs
//! Per-call interception context
//!
//! One context exists per routed call. It borrows the wrapped instance and
//! the call's argument pack, and owns the return slot that the proxy reads
//! back once the interceptor returns.
//!
//! Policies:
//! - `proceed()` may be called any number of times; every call re-invokes
//!   the wrapped method with the same arguments and overwrites the slot.
//! - On void methods the slot stays empty and writing it fails with
//!   `VoidReturnNotWritable`.

use crate::proxy::arguments::ArgumentPack;
use crate::proxy::descriptor::MethodDescriptor;
use crate::proxy::implementation::MethodInvoker;
use crate::proxy::value::Value;
use crate::utils::errors::{ProxyError, Result};
use std::any::Any;
use tracing::trace;

/// Handle passed to [`Interceptor::intercept`](crate::interception::Interceptor::intercept)
pub struct InterceptionContext<'a> {
    method: &'a MethodDescriptor,
    arguments: &'a ArgumentPack,
    target: &'a mut dyn Any,
    invoker: &'a MethodInvoker,
    return_value: Option<Value>,
    proceed_count: u32,
}

impl<'a> InterceptionContext<'a> {
    pub(crate) fn new(
        method: &'a MethodDescriptor,
        arguments: &'a ArgumentPack,
        target: &'a mut dyn Any,
        invoker: &'a MethodInvoker,
    ) -> Self {
        Self {
            method,
            arguments,
            target,
            invoker,
            return_value: None,
            proceed_count: 0,
        }
    }

    /// Invoke the wrapped method with the packed arguments
    pub fn proceed(&mut self) -> Result<()> {
        self.proceed_count += 1;
        trace!(
            "Proceeding with {} (attempt {})",
            self.method.qualified_name(),
            self.proceed_count
        );

        let value = self.invoker.invoke(&mut *self.target, self.arguments)?;
        if !self.method.is_void() {
            self.return_value = Some(value);
        }
        Ok(())
    }

    /// Current return value (`None` for void methods or before `proceed()`)
    pub fn return_value(&self) -> Option<&Value> {
        self.return_value.as_ref()
    }

    /// Replace the return value
    pub fn set_return_value(&mut self, value: impl Into<Value>) -> Result<()> {
        if self.method.is_void() {
            return Err(ProxyError::VoidReturnNotWritable {
                method: self.method.qualified_name(),
            });
        }
        self.return_value = Some(value.into());
        Ok(())
    }

    /// Take the return value out of the slot
    pub fn take_return_value(&mut self) -> Option<Value> {
        self.return_value.take()
    }

    /// Descriptor of the intercepted method
    pub fn method(&self) -> &MethodDescriptor {
        self.method
    }

    /// The call's arguments
    pub fn arguments(&self) -> &ArgumentPack {
        self.arguments
    }

    /// The wrapped instance, if it is a `T`
    pub fn target<T: 'static>(&self) -> Option<&T> {
        self.target.downcast_ref::<T>()
    }

    /// How many times `proceed()` has run
    pub fn proceed_count(&self) -> u32 {
        self.proceed_count
    }

    pub fn has_proceeded(&self) -> bool {
        self.proceed_count > 0
    }

    pub(crate) fn into_return_value(self) -> Option<Value> {
        self.return_value
    }
}
