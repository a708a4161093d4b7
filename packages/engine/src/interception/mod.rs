// packages/engine/src/interception/mod.rs
//! Method interception layer
//!
//! This module provides the pieces a routed proxy call passes through:
//!
//! - **Interceptor**: user logic wrapping a call (`intercept(context)`)
//! - **Interception Context**: per-call handle exposing `proceed()` and the
//!   mutable return slot
//! - **Interceptor Registry**: method name to interceptor mapping for one
//!   implementation type
//!
//! # Architecture
//!
//! ```text
//! proxy.invoke("set_age", [10])
//!     │
//!     ├─ Direct  → wrapped instance
//!     │
//!     └─ Routed  → ArgumentPack → Registry lookup → InterceptionContext
//!                       │
//!                       └─ interceptor.intercept(ctx)
//!                              ├─ before logic
//!                              ├─ ctx.proceed() → wrapped instance
//!                              └─ after logic / rewrite return slot
//! ```

pub mod context;
pub mod interceptor;
pub mod registry;

// Re-export commonly used types
pub use context::InterceptionContext;
pub use interceptor::{FnInterceptor, Interceptor, PassThrough};
pub use registry::InterceptorRegistry;
