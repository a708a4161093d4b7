// packages/engine/tests/proxy_behavior.rs
//! End-to-end proxy behavior against the `Person` fixture

mod common;

use common::{ctor_args, person_interface, person_type, person_with, Person};
use dynproxy_engine::interception::{FnInterceptor, InterceptionContext, Interceptor, PassThrough};
use dynproxy_engine::proxy::{
    get_instance, BuildContext, InterceptorFactory, ProxyTypeBuilder, Route, TypeTag, Value,
};
use dynproxy_engine::{ProxyConfig, ProxyError, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Adds one to the wrapped method's result
struct PlusOne;

impl Interceptor for PlusOne {
    fn name(&self) -> &str {
        "plus_one"
    }

    fn intercept(&self, context: &mut InterceptionContext<'_>) -> Result<()> {
        context.proceed()?;
        let value = context
            .return_value()
            .and_then(|v| v.to::<i32>())
            .ok_or_else(|| ProxyError::invocation("expected an i32 result"))?;
        context.set_return_value(value + 1)
    }
}

/// Never proceeds
struct Suppress;

impl Interceptor for Suppress {
    fn intercept(&self, _context: &mut InterceptionContext<'_>) -> Result<()> {
        Ok(())
    }
}

#[test]
fn test_no_interception_get() {
    let mut person = get_instance(&person_interface(), person_type(), ctor_args("", 9)).unwrap();
    assert_eq!(person.invoke_as::<i32>("get_age", vec![]).unwrap(), 9);
}

#[test]
fn test_no_interception_set() {
    let mut person = get_instance(&person_interface(), person_type(), ctor_args("", 9)).unwrap();
    person.invoke("set_age", vec![Value::I32(10)]).unwrap();
    assert_eq!(person.invoke_as::<i32>("get_age", vec![]).unwrap(), 10);
    assert_eq!(person.inner().age, 10);
}

#[test]
fn test_no_interceptors_matches_direct_calls() {
    let mut proxy = get_instance(&person_interface(), person_type(), ctor_args("jhon", 9)).unwrap();
    let mut direct = Person {
        name: "jhon".to_string(),
        age: 9,
    };

    for age in [1, -4, 0, i32::MAX] {
        let returned = proxy.invoke("set_age", vec![Value::I32(age)]).unwrap();
        direct.age = age;
        assert_eq!(returned, Value::Unit);
        assert_eq!(proxy.invoke("get_age", vec![]).unwrap(), Value::I32(direct.age));
    }
    assert_eq!(proxy.into_inner(), direct);
}

#[test]
fn test_empty_interceptors_get() {
    let person_type = person_with(Some(Arc::new(PassThrough)), Some(Arc::new(PassThrough)));
    let mut person = get_instance(&person_interface(), person_type, ctor_args("", 9)).unwrap();

    assert_eq!(person.proxy_type().route("get_age"), Some(Route::Routed));
    assert_eq!(person.invoke_as::<i32>("get_age", vec![]).unwrap(), 9);
}

#[test]
fn test_empty_interceptors_set() {
    let person_type = person_with(Some(Arc::new(PassThrough)), Some(Arc::new(PassThrough)));
    let mut person = get_instance(&person_interface(), person_type, ctor_args("", 9)).unwrap();

    person.invoke("set_age", vec![Value::I32(10)]).unwrap();
    assert_eq!(person.invoke_as::<i32>("get_age", vec![]).unwrap(), 10);
}

#[test]
fn test_before_and_after_flags() {
    let before = Arc::new(AtomicBool::new(false));
    let after = Arc::new(AtomicBool::new(false));

    let interceptor = {
        let before = Arc::clone(&before);
        let after = Arc::clone(&after);
        FnInterceptor::new("flags", move |ctx| {
            before.store(true, Ordering::SeqCst);
            ctx.proceed()?;
            after.store(true, Ordering::SeqCst);
            Ok(())
        })
    };

    let person_type = person_with(Some(Arc::new(interceptor)), None);
    let mut person = get_instance(&person_interface(), person_type, ctor_args("", 9)).unwrap();

    assert!(!before.load(Ordering::SeqCst));
    assert!(!after.load(Ordering::SeqCst));

    person.invoke("set_age", vec![Value::I32(10)]).unwrap();

    assert!(before.load(Ordering::SeqCst));
    assert!(after.load(Ordering::SeqCst));
    assert_eq!(person.inner().age, 10);
}

#[test]
fn test_interceptor_without_proceed_suppresses_call() {
    let person_type = person_with(Some(Arc::new(Suppress)), None);
    let mut person = get_instance(&person_interface(), person_type, ctor_args("", 9)).unwrap();

    person.invoke("set_age", vec![Value::I32(10)]).unwrap();
    assert_eq!(person.invoke_as::<i32>("get_age", vec![]).unwrap(), 9);
}

#[test]
fn test_return_rewrite_applies_only_when_routed() {
    let routed = person_with(Some(Arc::new(PassThrough)), Some(Arc::new(PlusOne)));
    let mut person = get_instance(&person_interface(), routed, ctor_args("", 9)).unwrap();
    person.invoke("set_age", vec![Value::I32(5)]).unwrap();
    assert_eq!(person.invoke_as::<i32>("get_age", vec![]).unwrap(), 6);

    let direct = person_with(Some(Arc::new(PassThrough)), None);
    let mut person = get_instance(&person_interface(), direct, ctor_args("", 9)).unwrap();
    person.invoke("set_age", vec![Value::I32(5)]).unwrap();
    assert_eq!(person.invoke_as::<i32>("get_age", vec![]).unwrap(), 5);
}

#[test]
fn test_constructor_not_found() {
    let cases = vec![
        vec![],
        vec![Value::from("jhon")],
        vec![Value::from(9), Value::from("jhon")],
        vec![Value::from("jhon"), Value::I64(9)],
    ];

    for args in cases {
        let err = get_instance(&person_interface(), person_type(), args).unwrap_err();
        assert!(matches!(err, ProxyError::ConstructorNotFound { .. }), "got {err}");
    }
}

#[test]
fn test_instances_do_not_share_state() {
    let proxy_type = ProxyTypeBuilder::new(person_interface(), person_with(Some(Arc::new(PassThrough)), None))
        .build()
        .unwrap();

    let mut first = proxy_type.instantiate(ctor_args("a", 9)).unwrap();
    let mut second = proxy_type.instantiate(ctor_args("b", 9)).unwrap();

    first.invoke("set_age", vec![Value::I32(30)]).unwrap();
    assert_eq!(first.invoke_as::<i32>("get_age", vec![]).unwrap(), 30);
    assert_eq!(second.invoke_as::<i32>("get_age", vec![]).unwrap(), 9);

    let mut third = get_instance(&person_interface(), person_type(), ctor_args("c", 9)).unwrap();
    let mut fourth = get_instance(&person_interface(), person_type(), ctor_args("d", 9)).unwrap();
    third.invoke("set_age", vec![Value::I32(1)]).unwrap();
    assert_eq!(fourth.invoke_as::<i32>("get_age", vec![]).unwrap(), 9);
}

#[test]
fn test_duplicate_interceptor_declaration_fails_build() {
    let person_type = person_type()
        .intercept("set_age", PassThrough)
        .intercept("set_age", Suppress);

    let err = get_instance(&person_interface(), person_type, ctor_args("", 9)).unwrap_err();
    assert!(matches!(err, ProxyError::DuplicateInterceptorDeclaration { .. }));
}

#[test]
fn test_void_return_slot_not_writable() {
    let writer = FnInterceptor::new("writer", |ctx| {
        ctx.proceed()?;
        ctx.set_return_value(1)
    });
    let person_type = person_with(Some(Arc::new(writer)), None);
    let mut person = get_instance(&person_interface(), person_type, ctor_args("", 9)).unwrap();

    let err = person.invoke("set_age", vec![Value::I32(10)]).unwrap_err();
    assert!(matches!(err, ProxyError::VoidReturnNotWritable { .. }));
    // the wrapped call ran before the failing write
    assert_eq!(person.inner().age, 10);

    // later calls are unaffected
    assert_eq!(person.invoke_as::<i32>("get_age", vec![]).unwrap(), 10);
}

#[test]
fn test_proceed_is_repeatable() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counting = {
        let calls = Arc::clone(&calls);
        FnInterceptor::new("twice", move |ctx| {
            ctx.proceed()?;
            ctx.proceed()?;
            calls.store(ctx.proceed_count() as usize, Ordering::SeqCst);
            Ok(())
        })
    };

    let bump = person_type()
        .method("birthday", &[], TypeTag::I32, |p, _| {
            p.age += 1;
            Ok(Value::I32(p.age))
        })
        .intercept("birthday", counting);
    let interface = person_interface().method("birthday", &[], TypeTag::I32);

    let mut person = get_instance(&interface, bump, ctor_args("", 9)).unwrap();
    assert_eq!(person.invoke_as::<i32>("birthday", vec![]).unwrap(), 11);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(person.inner().age, 11);
}

#[test]
fn test_interceptor_sees_arguments_and_target() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = {
        let seen = Arc::clone(&seen);
        FnInterceptor::new("recorder", move |ctx| {
            let before = ctx.target::<Person>().map(|p| p.age);
            let args: Vec<(String, Value)> = ctx
                .arguments()
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect();
            ctx.proceed()?;
            seen.lock().push((ctx.method().name.clone(), args, before));
            Ok(())
        })
    };

    let person_type = person_with(Some(Arc::new(recorder)), None);
    let mut person = get_instance(&person_interface(), person_type, ctor_args("", 9)).unwrap();
    person.invoke("set_age", vec![Value::I32(12)]).unwrap();

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "set_age");
    assert_eq!(seen[0].1, vec![("age".to_string(), Value::I32(12))]);
    assert_eq!(seen[0].2, Some(9));
}

#[test]
fn test_interceptor_errors_surface_to_caller() {
    let failing = FnInterceptor::new("failing", |_ctx| Err(ProxyError::invocation("denied")));
    let person_type = person_with(None, Some(Arc::new(failing)));
    let mut person = get_instance(&person_interface(), person_type, ctor_args("", 9)).unwrap();

    let err = person.invoke("get_age", vec![]).unwrap_err();
    assert!(matches!(err, ProxyError::InvocationFailed(ref msg) if msg == "denied"));

    person.invoke("set_age", vec![Value::I32(3)]).unwrap();
    assert_eq!(person.inner().age, 3);
}

#[test]
fn test_call_time_argument_errors() {
    let person_type = person_with(Some(Arc::new(PassThrough)), None);
    let mut person = get_instance(&person_interface(), person_type, ctor_args("", 9)).unwrap();

    let err = person.invoke("set_age", vec![]).unwrap_err();
    assert!(matches!(err, ProxyError::ArityMismatch { expected: 1, actual: 0, .. }));

    let err = person.invoke("set_age", vec![Value::from("ten")]).unwrap_err();
    assert!(matches!(err, ProxyError::TypeMismatch { .. }));
    assert!(!err.is_build_time());

    let err = person.invoke("get_name", vec![]).unwrap_err();
    assert!(matches!(err, ProxyError::MethodNotFound { .. }));

    assert_eq!(person.invoke_as::<i32>("get_age", vec![]).unwrap(), 9);
}

#[test]
fn test_shared_interceptor_across_instances() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter: Arc<dyn Interceptor> = {
        let hits = Arc::clone(&hits);
        Arc::new(FnInterceptor::new("counter", move |ctx| {
            hits.fetch_add(1, Ordering::SeqCst);
            ctx.proceed()
        }))
    };

    let factory = InterceptorFactory::with_cache(BuildContext::default());
    let person_type = Arc::new(person_with(None, Some(counter)));

    let mut first = factory
        .get_instance(&person_interface(), Arc::clone(&person_type), ctor_args("a", 1))
        .unwrap();
    let mut second = factory
        .get_instance(&person_interface(), Arc::clone(&person_type), ctor_args("b", 2))
        .unwrap();

    assert_eq!(first.invoke_as::<i32>("get_age", vec![]).unwrap(), 1);
    assert_eq!(second.invoke_as::<i32>("get_age", vec![]).unwrap(), 2);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(first.proxy_type().id(), second.proxy_type().id());
}

#[test]
fn test_cached_factory_keeps_same_named_configurations_apart() {
    let factory = InterceptorFactory::from_config(&ProxyConfig::default());
    assert!(factory.cache().is_some());

    let plain = factory
        .get_instance(&person_interface(), Arc::new(person_type()), ctor_args("jhon", 9))
        .unwrap();
    assert_eq!(plain.proxy_type().route("get_age"), Some(Route::Direct));

    let mut intercepted = factory
        .get_instance(
            &person_interface(),
            Arc::new(person_with(None, Some(Arc::new(PlusOne)))),
            ctor_args("jhon", 9),
        )
        .unwrap();
    assert_eq!(intercepted.proxy_type().route("get_age"), Some(Route::Routed));
    assert_eq!(intercepted.invoke_as::<i32>("get_age", vec![]).unwrap(), 10);

    let wider = person_interface().method("get_name", &[], TypeTag::Str);
    let mut named = factory
        .get_instance(&wider, Arc::new(person_type()), ctor_args("jhon", 9))
        .unwrap();
    assert_eq!(named.invoke_as::<String>("get_name", vec![]).unwrap(), "jhon");

    assert_eq!(factory.cache().map(|c| c.len()), Some(3));
}

#[test]
fn test_instances_usable_across_threads() {
    let proxy_type = ProxyTypeBuilder::new(person_interface(), person_with(None, Some(Arc::new(PlusOne))))
        .build()
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let proxy_type = proxy_type.clone();
            std::thread::spawn(move || {
                let mut person = proxy_type.instantiate(ctor_args("t", i)).unwrap();
                person.invoke("set_age", vec![Value::I32(i * 10)]).unwrap();
                person.invoke_as::<i32>("get_age", vec![]).unwrap()
            })
        })
        .collect();

    let mut results: Vec<i32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    results.sort_unstable();
    assert_eq!(results, vec![1, 11, 21, 31]);
}
