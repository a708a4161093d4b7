// packages/engine/tests/common/mod.rs
//! Shared `Person` fixture for integration tests

#![allow(dead_code)]

use dynproxy_engine::interception::Interceptor;
use dynproxy_engine::proxy::{ImplementationType, InterfaceDescriptor, TypeTag, Value};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: i32,
}

pub fn person_interface() -> InterfaceDescriptor {
    InterfaceDescriptor::new("IPerson")
        .method("set_age", &[("age", TypeTag::I32)], TypeTag::Void)
        .method("get_age", &[], TypeTag::I32)
}

/// `Person` with no interceptors declared
pub fn person_type() -> ImplementationType<Person> {
    ImplementationType::new("Person")
        .constructor(&[("name", TypeTag::Str), ("age", TypeTag::I32)], |args| {
            Ok(Person {
                name: args.value("name")?,
                age: args.value("age")?,
            })
        })
        .method("set_age", &[("age", TypeTag::I32)], TypeTag::Void, |p, args| {
            p.age = args.value("age")?;
            Ok(Value::Unit)
        })
        .method("get_age", &[], TypeTag::I32, |p, _| Ok(Value::I32(p.age)))
        .method("get_name", &[], TypeTag::Str, |p, _| Ok(Value::Str(p.name.clone())))
}

/// `Person` with the given interceptors on `set_age` / `get_age`
pub fn person_with(
    set_age: Option<Arc<dyn Interceptor>>,
    get_age: Option<Arc<dyn Interceptor>>,
) -> ImplementationType<Person> {
    let mut person = person_type();
    if let Some(interceptor) = set_age {
        person = person.intercept_shared("set_age", interceptor);
    }
    if let Some(interceptor) = get_age {
        person = person.intercept_shared("get_age", interceptor);
    }
    person
}

pub fn ctor_args(name: &str, age: i32) -> Vec<Value> {
    vec![Value::from(name), Value::from(age)]
}
