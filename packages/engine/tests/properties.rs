// packages/engine/tests/properties.rs
//! Property tests: a proxy without interceptors behaves like the wrapped type

mod common;

use common::{ctor_args, person_interface, person_type, person_with, Person};
use dynproxy_engine::interception::PassThrough;
use dynproxy_engine::proxy::{get_instance, Value};
use proptest::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Op {
    Set(i32),
    Get,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![any::<i32>().prop_map(Op::Set), Just(Op::Get)]
}

proptest! {
    #[test]
    fn prop_direct_proxy_matches_instance(start in any::<i32>(), ops in prop::collection::vec(op(), 0..32)) {
        let mut proxy = get_instance(&person_interface(), person_type(), ctor_args("p", start)).unwrap();
        let mut direct = Person { name: "p".to_string(), age: start };

        for op in ops {
            match op {
                Op::Set(age) => {
                    let returned = proxy.invoke("set_age", vec![Value::I32(age)]).unwrap();
                    direct.age = age;
                    prop_assert_eq!(returned, Value::Unit);
                }
                Op::Get => {
                    let returned = proxy.invoke("get_age", vec![]).unwrap();
                    prop_assert_eq!(returned, Value::I32(direct.age));
                }
            }
        }

        prop_assert_eq!(proxy.into_inner(), direct);
    }

    #[test]
    fn prop_pass_through_matches_direct(start in any::<i32>(), ages in prop::collection::vec(any::<i32>(), 1..16)) {
        let routed = person_with(Some(Arc::new(PassThrough)), Some(Arc::new(PassThrough)));
        let mut via_interceptor = get_instance(&person_interface(), routed, ctor_args("p", start)).unwrap();
        let mut plain = get_instance(&person_interface(), person_type(), ctor_args("p", start)).unwrap();

        for age in ages {
            via_interceptor.invoke("set_age", vec![Value::I32(age)]).unwrap();
            plain.invoke("set_age", vec![Value::I32(age)]).unwrap();
            prop_assert_eq!(
                via_interceptor.invoke("get_age", vec![]).unwrap(),
                plain.invoke("get_age", vec![]).unwrap()
            );
        }
    }
}
