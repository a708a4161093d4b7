// packages/engine/src/lib.rs
//! Dynproxy Engine Library
//!
//! Builds interception proxies at runtime: given an interface and an
//! implementation type, it produces a proxy that forwards calls to a
//! wrapped instance and routes marked methods through interceptors that
//! can run code around the call and rewrite its result.
//!
//! # Architecture
//!
//! The engine is structured into several key modules:
//!
//! - **proxy**: values, descriptors, proxy type building and instances
//! - **interception**: interceptor capability, interception context, registry
//! - **observability**: tracing setup
//! - **utils**: configuration and errors
//!
//! # Example
//!
//! ```
//! use dynproxy_engine::interception::FnInterceptor;
//! use dynproxy_engine::proxy::{get_instance, ImplementationType, InterfaceDescriptor, TypeTag, Value};
//!
//! struct Person { age: i32 }
//!
//! let interface = InterfaceDescriptor::new("IPerson")
//!     .method("set_age", &[("age", TypeTag::I32)], TypeTag::Void)
//!     .method("get_age", &[], TypeTag::I32);
//!
//! let person = ImplementationType::new("Person")
//!     .constructor(&[("age", TypeTag::I32)], |args| Ok(Person { age: args.value("age")? }))
//!     .method("set_age", &[("age", TypeTag::I32)], TypeTag::Void, |p, args| {
//!         p.age = args.value("age")?;
//!         Ok(Value::Unit)
//!     })
//!     .method("get_age", &[], TypeTag::I32, |p, _| Ok(Value::I32(p.age)))
//!     .intercept("get_age", FnInterceptor::new("plus_one", |ctx| {
//!         ctx.proceed()?;
//!         let age = ctx.return_value().and_then(|v| v.to::<i32>()).unwrap_or_default();
//!         ctx.set_return_value(age + 1)
//!     }));
//!
//! let mut proxy = get_instance(&interface, person, vec![Value::I32(9)]).unwrap();
//! proxy.invoke("set_age", vec![Value::I32(5)]).unwrap();
//! assert_eq!(proxy.invoke_as::<i32>("get_age", vec![]).unwrap(), 6);
//! ```

// Public module exports
pub mod interception;
pub mod observability;
pub mod proxy;
pub mod utils;

// Re-export commonly used types
pub use interception::{InterceptionContext, Interceptor, InterceptorRegistry};
pub use proxy::{get_instance, InterceptorFactory, ProxyInstance, ProxyType, ProxyTypeBuilder};
pub use utils::config::ProxyConfig;
pub use utils::errors::{ProxyError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_HASH: &str = env!("GIT_HASH");

/// Where and how this engine build was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_timestamp: &'static str,
    pub rustc_version: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: VERSION,
            git_hash: GIT_HASH,
            build_timestamp: env!("BUILD_TIMESTAMP"),
            rustc_version: env!("RUSTC_VERSION"),
        }
    }
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "v{} ({}, built {} with {})",
            self.version, self.git_hash, self.build_timestamp, self.rustc_version
        )
    }
}
