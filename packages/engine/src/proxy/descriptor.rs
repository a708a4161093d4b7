// packages/engine/src/proxy/descriptor.rs
//! Method and interface descriptors
//!
//! Descriptors are immutable metadata derived once per implementation type
//! and interface. They drive argument marshalling and routing decisions.

use crate::proxy::value::TypeTag;
use crate::utils::errors::{ProxyError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named, typed parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_tag: TypeTag,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            type_tag,
        }
    }
}

/// Build a parameter list from `(name, tag)` pairs
pub fn parameters(pairs: &[(&str, TypeTag)]) -> Vec<Parameter> {
    pairs
        .iter()
        .map(|(name, tag)| Parameter::new(*name, *tag))
        .collect()
}

/// Render a parameter list as `name: tag, ...`
pub fn format_parameters(parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .map(|p| format!("{}: {}", p.name, p.type_tag))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Method metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    /// Method name, unique per implementation type
    pub name: String,

    /// Ordered parameters
    pub parameters: Vec<Parameter>,

    /// Return type (`TypeTag::Void` for none)
    pub return_type: TypeTag,

    /// Name of the type that declares the method
    pub declaring_type: String,

    /// Method comes from a parent type rather than being declared directly
    pub inherited: bool,
}

impl MethodDescriptor {
    pub fn new(
        declaring_type: impl Into<String>,
        name: impl Into<String>,
        parameters: Vec<Parameter>,
        return_type: TypeTag,
    ) -> Self {
        Self {
            name: name.into(),
            parameters,
            return_type,
            declaring_type: declaring_type.into(),
            inherited: false,
        }
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_void(&self) -> bool {
        self.return_type.is_void()
    }

    /// `declaring_type::name`
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.declaring_type, self.name)
    }

    /// Whether this method can serve the given interface signature
    pub fn satisfies(&self, signature: &MethodSignature) -> bool {
        self.name == signature.name
            && self.return_type == signature.return_type
            && self.parameters.len() == signature.parameters.len()
            && self
                .parameters
                .iter()
                .zip(&signature.parameters)
                .all(|(own, wanted)| own.type_tag == wanted.type_tag)
    }
}

/// A method as required by an interface
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSignature {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeTag,
}

impl MethodSignature {
    pub fn new(name: impl Into<String>, parameters: Vec<Parameter>, return_type: TypeTag) -> Self {
        Self {
            name: name.into(),
            parameters,
            return_type,
        }
    }
}

/// The capability set a proxy exposes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    pub name: String,
    pub methods: Vec<MethodSignature>,
}

impl InterfaceDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Add a method signature
    pub fn method(mut self, name: &str, params: &[(&str, TypeTag)], return_type: TypeTag) -> Self {
        self.methods
            .push(MethodSignature::new(name, parameters(params), return_type));
        self
    }

    /// Look up a method signature by name
    pub fn get(&self, name: &str) -> Option<&MethodSignature> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Reject duplicate method names
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for method in &self.methods {
            if !seen.insert(method.name.as_str()) {
                return Err(ProxyError::MalformedDescriptor(format!(
                    "interface {} declares {} more than once",
                    self.name, method.name
                )));
            }
        }
        Ok(())
    }
}
