// packages/engine/src/proxy/value.rs
//! Dynamically typed call values
//!
//! Every argument and return value crossing a proxy is carried as a
//! [`Value`]. Declared parameter and return types are [`TypeTag`]s.
//! Assignability is exact: there is no implicit numeric widening.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a parameter or return value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    /// No value (void return)
    Void,
    Bool,
    I32,
    I64,
    F64,
    Str,
    List,
    /// Accepts any value
    Any,
}

impl TypeTag {
    /// Whether a value of type `actual` may be stored where `self` is declared
    pub fn accepts(self, actual: TypeTag) -> bool {
        match self {
            TypeTag::Any => true,
            declared => declared == actual,
        }
    }

    pub fn is_void(self) -> bool {
        self == TypeTag::Void
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeTag::Void => "void",
            TypeTag::Bool => "bool",
            TypeTag::I32 => "i32",
            TypeTag::I64 => "i64",
            TypeTag::F64 => "f64",
            TypeTag::Str => "str",
            TypeTag::List => "list",
            TypeTag::Any => "any",
        };
        f.write_str(name)
    }
}

/// A call value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Unit,
    Bool(bool),
    I32(i32),
    I64(i64),
    F64(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    /// Runtime type of this value
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Unit => TypeTag::Void,
            Value::Bool(_) => TypeTag::Bool,
            Value::I32(_) => TypeTag::I32,
            Value::I64(_) => TypeTag::I64,
            Value::F64(_) => TypeTag::F64,
            Value::Str(_) => TypeTag::Str,
            Value::List(_) => TypeTag::List,
        }
    }

    /// Convert into a concrete Rust type
    pub fn to<T: FromValue>(&self) -> Option<T> {
        T::from_value(self)
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Value::Unit)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => f.write_str("()"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::Str(v) => write!(f, "{:?}", v),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Extraction of a concrete Rust type from a [`Value`]
pub trait FromValue: Sized {
    /// Type tag this Rust type is declared with
    const TAG: TypeTag;

    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_value_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }

            impl FromValue for $ty {
                const TAG: TypeTag = TypeTag::$variant;

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_value_conversions! {
    bool => Bool,
    i32 => I32,
    i64 => I64,
    f64 => F64,
    String => Str,
    Vec<Value> => List,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Unit
    }
}

impl FromValue for () {
    const TAG: TypeTag = TypeTag::Void;

    fn from_value(value: &Value) -> Option<Self> {
        value.is_unit().then_some(())
    }
}

impl FromValue for Value {
    const TAG: TypeTag = TypeTag::Any;

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}
