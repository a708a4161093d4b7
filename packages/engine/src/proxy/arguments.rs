// packages/engine/src/proxy/arguments.rs
//! Per-call argument packs
//!
//! An [`ArgumentPack`] is the ordered, named bundle of one call's actual
//! arguments. It is created for the call, owned by it, and dropped when the
//! call returns.

use crate::proxy::descriptor::{MethodDescriptor, Parameter};
use crate::proxy::value::{FromValue, Value};
use crate::utils::errors::{ProxyError, Result};

/// Ordered `(name, value)` pairs matching a method's parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentPack {
    method: String,
    entries: Vec<(String, Value)>,
}

impl ArgumentPack {
    /// Pack positional values against a method descriptor
    pub fn create(descriptor: &MethodDescriptor, values: Vec<Value>) -> Result<Self> {
        Self::pack(&descriptor.name, &descriptor.parameters, values)
    }

    /// Pack positional values against a parameter list
    pub(crate) fn pack(method: &str, parameters: &[Parameter], values: Vec<Value>) -> Result<Self> {
        if values.len() != parameters.len() {
            return Err(ProxyError::ArityMismatch {
                method: method.to_string(),
                expected: parameters.len(),
                actual: values.len(),
            });
        }

        let mut entries = Vec::with_capacity(values.len());
        for (parameter, value) in parameters.iter().zip(values) {
            let actual = value.type_tag();
            if !parameter.type_tag.accepts(actual) {
                return Err(ProxyError::TypeMismatch {
                    method: method.to_string(),
                    parameter: parameter.name.clone(),
                    expected: parameter.type_tag,
                    actual,
                });
            }
            entries.push((parameter.name.clone(), value));
        }

        Ok(Self {
            method: method.to_string(),
            entries,
        })
    }

    /// Name of the method these arguments belong to
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Look up an argument by parameter name
    pub fn get(&self, name: &str) -> Result<&Value> {
        self.entries
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value)
            .ok_or_else(|| ProxyError::UnknownParameter {
                method: self.method.clone(),
                parameter: name.to_string(),
            })
    }

    /// Look up an argument and convert it to a concrete type
    pub fn value<T: FromValue>(&self, name: &str) -> Result<T> {
        let value = self.get(name)?;
        T::from_value(value).ok_or_else(|| ProxyError::TypeMismatch {
            method: self.method.clone(),
            parameter: name.to_string(),
            expected: T::TAG,
            actual: value.type_tag(),
        })
    }

    /// Argument at a position
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.entries.get(index).map(|(_, value)| value)
    }

    /// Values in declaration order
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// `(name, value)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
