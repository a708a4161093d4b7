// packages/engine/src/interception/interceptor.rs
//! Interceptor capability
//!
//! Any type implementing [`Interceptor`] can be declared on a method. The
//! interceptor decides whether the wrapped method runs (by calling
//! [`InterceptionContext::proceed`]) and may rewrite the return value.
//! Interceptors are shared by every proxy instance built from the same
//! implementation type, so they must be `Send + Sync`.

use crate::interception::context::InterceptionContext;
use crate::utils::errors::Result;
use std::fmt;

/// Wraps a routed method call
pub trait Interceptor: Send + Sync {
    /// Name used in logs and debug artifacts
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Run around the call. Not calling `proceed()` suppresses the wrapped method.
    fn intercept(&self, context: &mut InterceptionContext<'_>) -> Result<()>;
}

/// Interceptor that only proceeds
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl Interceptor for PassThrough {
    fn name(&self) -> &str {
        "pass_through"
    }

    fn intercept(&self, context: &mut InterceptionContext<'_>) -> Result<()> {
        context.proceed()
    }
}

/// Closure-backed interceptor
pub struct FnInterceptor<F> {
    name: String,
    f: F,
}

impl<F> FnInterceptor<F>
where
    F: Fn(&mut InterceptionContext<'_>) -> Result<()> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> Interceptor for FnInterceptor<F>
where
    F: Fn(&mut InterceptionContext<'_>) -> Result<()> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn intercept(&self, context: &mut InterceptionContext<'_>) -> Result<()> {
        (self.f)(context)
    }
}

impl<F> fmt::Debug for FnInterceptor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnInterceptor").field("name", &self.name).finish()
    }
}
