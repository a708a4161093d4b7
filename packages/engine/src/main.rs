// packages/engine/src/main.rs
//! Dynproxy demo
//!
//! Builds a `Person` proxy whose `set_age` is wrapped by a logging
//! interceptor, sets the age and prints it back.

use anyhow::Result;
use dynproxy_engine::interception::{FnInterceptor, PassThrough};
use dynproxy_engine::observability::init_tracing;
use dynproxy_engine::proxy::{ImplementationType, InterceptorFactory, InterfaceDescriptor, TypeTag, Value};
use dynproxy_engine::{BuildInfo, ProxyConfig};
use std::sync::Arc;
use tracing::info;

struct Person {
    name: String,
    age: i32,
}

fn person_interface() -> InterfaceDescriptor {
    InterfaceDescriptor::new("IPerson")
        .method("set_age", &[("age", TypeTag::I32)], TypeTag::Void)
        .method("get_age", &[], TypeTag::I32)
        .method("get_name", &[], TypeTag::Str)
}

fn person_type() -> ImplementationType<Person> {
    let logging = FnInterceptor::new("logging", |ctx| {
        let age = ctx.arguments().get("age")?.clone();
        let before = ctx.target::<Person>().map(|p| p.age);
        info!("set_age({}) called, age was {:?}", age, before);
        ctx.proceed()?;
        info!("set_age({}) done", age);
        Ok(())
    });

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
        .intercept("set_age", logging)
        .intercept("get_age", PassThrough)
}

fn main() -> Result<()> {
    // Load configuration
    let config = ProxyConfig::load()?;
    init_tracing(&config.logging)?;

    info!("Starting dynproxy demo {}", BuildInfo::current());
    info!("Configuration loaded: {:?}", config);

    let factory = InterceptorFactory::from_config(&config);
    let mut person = factory.get_instance(
        &person_interface(),
        Arc::new(person_type()),
        vec![Value::from("jhon"), Value::from(9)],
    )?;

    person.invoke("set_age", vec![Value::from(10)])?;
    let name: String = person.invoke_as("get_name", vec![])?;
    let age: i32 = person.invoke_as("get_age", vec![])?;

    println!("{} is {}", name, age);
    Ok(())
}
