// packages/engine/src/proxy/mod.rs
//! Proxy generation
//!
//! This module turns an interface and an implementation type into working
//! proxies:
//!
//! - **Value**: dynamically typed call values and their type tags
//! - **Descriptor**: method, parameter and interface metadata
//! - **Implementation**: explicit per-type metadata (constructors, methods,
//!   interceptor declarations) standing in for reflection
//! - **Arguments**: per-call argument packs
//! - **Builder**: builds the dispatch table and decides each method's route
//! - **Instance**: proxy instances wrapping one implementation instance
//! - **Factory**: `get_instance` entry point, optionally cached
//! - **Artifact**: debug descriptions of built proxy types
//!
//! # Architecture
//!
//! ```text
//! get_instance(IPerson, Person, ["jhon", 9])
//!     │
//!     ├─ ProxyTypeBuilder
//!     │     ├─ InterceptorRegistry::build(Person)
//!     │     ├─ match interface methods to Person's declared methods
//!     │     └─ route per method: Direct | Routed   (decided once)
//!     │
//!     └─ ProxyType::instantiate → constructor lookup → ProxyInstance
//! ```

pub mod arguments;
pub mod artifact;
pub mod builder;
pub mod cache;
pub mod descriptor;
pub mod factory;
pub mod implementation;
pub mod instance;
pub mod value;

// Re-export commonly used types
pub use arguments::ArgumentPack;
pub use artifact::{ArtifactExporter, ArtifactFormat, MethodDescription, ProxyTypeDescription};
pub use builder::{BuildContext, ProxyType, ProxyTypeBuilder, Route};
pub use cache::ProxyTypeCache;
pub use descriptor::{InterfaceDescriptor, MethodDescriptor, MethodSignature, Parameter};
pub use factory::{get_instance, InterceptorFactory};
pub use implementation::{Constructor, ImplementationType, ImplementedMethod, MethodInvoker};
pub use instance::ProxyInstance;
pub use value::{FromValue, TypeTag, Value};
