use std::sync::Arc;

use hostlens_core::VersionRange;
use hostlens_model::{AccessError, Host, HostException, PrimitiveType, TypeEnv, TypeStore, Value};
use hostlens_resolve::{MemberCategory, ResolveError, TypeRegistry};
use hostlens_test_utils::{network_store, V1_12, V1_17, V1_19};
use pretty_assertions::assert_eq;

use super::{fixture_registry, registry_for};

fn new_instance(registry: &TypeRegistry, id: &str) -> Value {
    registry
        .resolve_type(id)
        .unwrap()
        .locate_constructor()
        .with_no_parameters()
        .required()
        .unwrap()
        .new_instance(Vec::new())
        .unwrap()
}

/// A store whose `fixture.Derived` members have behaviour bound.
fn bound_store() -> TypeStore {
    let mut store = network_store(V1_12);
    let base = store.lookup_type("fixture.Base").unwrap();
    let derived = store.lookup_type("fixture.Derived").unwrap();
    let value = store.find_field(derived, "value").unwrap();
    let count = store.find_field(base, "count").unwrap();

    let get_value = store.find_method(derived, "getValue", 0).unwrap();
    store.bind_method(get_value, move |inv| inv.store.read_field(value, inv.this));

    let set_value = store.find_method(derived, "setValue", 1).unwrap();
    store.bind_method(set_value, move |inv| {
        inv.store.write_field(value, inv.this, inv.args[0].clone())?;
        Ok(Value::Null)
    });

    let describe = store.find_method(base, "describe", 0).unwrap();
    store.bind_method(describe, |_| {
        Err(HostException::new("java.lang.IllegalStateException", "not ready").into())
    });

    let with_count = store.find_constructor(derived, 1).unwrap();
    store.bind_constructor(with_count, move |inv| {
        inv.store.write_field(count, inv.this, inv.args[0].clone())
    });
    store
}

#[test]
fn instance_fields_round_trip_through_handles() {
    let registry = fixture_registry(V1_12);
    let triple = registry.resolve_type("triple").unwrap();
    let instance = new_instance(&registry, "triple");
    assert!(triple.is_instance(&instance));

    let a = triple.locate_field().with_name("a").required().unwrap();
    assert_eq!(a.get(&instance).unwrap(), Value::Int(0));
    a.set(&instance, Value::Int(7)).unwrap();
    assert_eq!(a.get(&instance).unwrap(), Value::Int(7));

    let err = a.set(&instance, Value::str("seven")).unwrap_err();
    assert!(matches!(err, AccessError::ArgumentType { .. }), "{err:?}");
}

#[test]
fn field_transforms_wrap_reads_and_writes() {
    let registry = fixture_registry(V1_12);
    let triple = registry.resolve_type("triple").unwrap();
    let instance = new_instance(&registry, "triple");

    let raw = triple.locate_field().with_name("label").required().unwrap();
    let shouting = triple
        .locate_field()
        .with_name("label")
        .with_value_transform(|value| match value.as_str() {
            Some(text) => Ok(Value::str(text.to_uppercase())),
            None => Err(AccessError::Transform("label must be a string".to_owned())),
        })
        .with_result_transform(|value| {
            Ok(Value::str(format!("[{}]", value.as_str().unwrap_or("null"))))
        })
        .required()
        .unwrap();
    assert_eq!(shouting, raw);

    shouting.set(&instance, Value::str("hello")).unwrap();
    assert_eq!(raw.get(&instance).unwrap(), Value::str("HELLO"));
    assert_eq!(shouting.get(&instance).unwrap(), Value::str("[HELLO]"));

    let err = shouting.set(&instance, Value::Int(1)).unwrap_err();
    assert_eq!(
        err,
        AccessError::Transform("label must be a string".to_owned())
    );
}

#[test]
fn instance_access_checks_the_target() {
    let registry = fixture_registry(V1_12);
    let triple = registry.resolve_type("triple").unwrap();
    let a = triple.locate_field().with_name("a").required().unwrap();

    assert!(matches!(
        a.get(&Value::Null),
        Err(AccessError::NullTarget { .. })
    ));

    let derived = new_instance(&registry, "derived");
    assert!(!triple.is_instance(&derived));
    assert!(matches!(
        a.get(&derived),
        Err(AccessError::WrongInstance { .. })
    ));
}

#[test]
fn static_fields_ignore_the_target() {
    let registry = fixture_registry(V1_12);
    let triple = registry.resolve_type("triple").unwrap();
    let base = registry.resolve_type("base").unwrap();

    let instances = triple
        .locate_field()
        .with_name("INSTANCES")
        .with_static(true)
        .required()
        .unwrap();
    instances.set(&Value::Null, Value::Int(3)).unwrap();
    assert_eq!(instances.get(&Value::Null).unwrap(), Value::Int(3));

    let limit = base
        .locate_field()
        .with_name("LIMIT")
        .with_static(true)
        .required()
        .unwrap();
    assert_eq!(limit.get(&Value::Null).unwrap(), Value::Int(0));
    assert!(matches!(
        limit.set(&Value::Null, Value::Int(1)),
        Err(AccessError::IllegalAccess { .. })
    ));
}

#[test]
fn methods_dispatch_through_bound_bodies() {
    let registry = registry_for(Arc::new(bound_store()), V1_12);
    let derived = registry.resolve_type("derived").unwrap();
    let instance = new_instance(&registry, "derived");

    let set_value = derived
        .locate_method()
        .with_name("setValue")
        .with_call_transform(|mut args| {
            if let Some(Value::Int(value)) = args.first_mut() {
                *value += 1;
            }
            Ok(args)
        })
        .with_param(PrimitiveType::Int)
        .required()
        .unwrap();
    let get_value = derived
        .locate_method()
        .with_name("getValue")
        .with_response_transform(|value| Ok(Value::Long(i64::from(value.as_int().unwrap_or(-1)))))
        .required()
        .unwrap();

    assert_eq!(
        set_value.invoke(&instance, vec![Value::Int(41)]).unwrap(),
        Value::Null
    );
    assert_eq!(get_value.invoke(&instance, Vec::new()).unwrap(), Value::Long(42));

    assert!(matches!(
        set_value.invoke(&instance, Vec::new()),
        Err(AccessError::ArgumentCount {
            expected: 1,
            actual: 0,
            ..
        })
    ));
    assert!(matches!(
        set_value.invoke(&instance, vec![Value::str("x")]),
        Err(AccessError::ArgumentType { index: 0, .. })
    ));
}

#[test]
fn host_exceptions_are_preserved() {
    let registry = registry_for(Arc::new(bound_store()), V1_12);
    let derived = registry.resolve_type("derived").unwrap();
    let instance = new_instance(&registry, "derived");

    let describe = derived
        .locate_method()
        .with_name("describe")
        .with_inherited(true)
        .required()
        .unwrap();
    assert_eq!(
        describe.invoke(&instance, Vec::new()).unwrap_err(),
        AccessError::Thrown(HostException::new(
            "java.lang.IllegalStateException",
            "not ready"
        ))
    );
}

#[test]
fn unbound_methods_report_missing_bodies() {
    let registry = fixture_registry(V1_12);
    let derived = registry.resolve_type("derived").unwrap();
    let instance = new_instance(&registry, "derived");

    let accept = derived.locate_method().with_name("accept").required().unwrap();
    assert!(matches!(
        accept.invoke(&instance, vec![Value::Int(1)]),
        Err(AccessError::NoBody { .. })
    ));
}

#[test]
fn constructors_run_bound_bodies_after_argument_transforms() {
    let registry = registry_for(Arc::new(bound_store()), V1_12);
    let derived = registry.resolve_type("derived").unwrap();

    let with_count = derived
        .locate_constructor()
        .with_param(PrimitiveType::Int)
        .with_call_transform(|mut args| {
            if args.is_empty() {
                args.push(Value::Int(5));
            }
            Ok(args)
        })
        .required()
        .unwrap();
    let instance = with_count.new_instance(Vec::new()).unwrap();
    assert!(derived.is_instance(&instance));

    let count = derived
        .locate_field()
        .with_name("count")
        .with_inherited(true)
        .required()
        .unwrap();
    assert_eq!(count.get(&instance).unwrap(), Value::Int(5));
}

#[test]
fn abstract_types_cannot_be_constructed() {
    let mut store = network_store(V1_12);
    let shape = store.lookup_type("fixture.Shape").unwrap();
    let mut def = store.type_def(shape).unwrap().clone();
    def.constructors.push(hostlens_model::ConstructorDef {
        params: Vec::new(),
        modifiers: hostlens_model::Modifiers::from_bits(hostlens_model::Modifiers::PROTECTED),
    });
    store.define_type(shape, def);

    let registry = registry_for(Arc::new(store), V1_12);
    let ctor = registry
        .resolve_type("shape")
        .unwrap()
        .locate_constructor()
        .with_no_parameters()
        .required()
        .unwrap();
    assert!(matches!(
        ctor.new_instance(Vec::new()),
        Err(AccessError::Instantiation { .. })
    ));
}

#[test]
fn unresolved_dependencies_fail_in_range_queries() {
    let registry = fixture_registry(V1_17);
    let triple = registry.resolve_type("triple").unwrap();
    let listener = registry
        .resolve_type_optional("packet_send_listener")
        .unwrap();
    assert!(listener.is_none());

    let query = || {
        triple
            .locate_field()
            .with_name("a")
            .depends_on(listener.as_ref())
    };
    let expected = ResolveError::DependencyMissing {
        category: MemberCategory::Field,
        target: "fixture.Triple".to_owned(),
    };
    assert_eq!(query().required().unwrap_err(), expected);
    // Not an absence, so the optional form still fails.
    assert_eq!(query().optional().unwrap_err(), expected);

    let gated = query().with_version_range(VersionRange::since(V1_19));
    assert!(matches!(
        gated.clone().required(),
        Err(ResolveError::VersionMismatch { .. })
    ));
    assert_eq!(gated.optional().unwrap(), None);
}

#[test]
fn resolved_dependencies_allow_the_query() {
    let registry = fixture_registry(V1_19);
    let triple = registry.resolve_type("triple").unwrap();
    let listener = registry
        .resolve_type_optional("packet_send_listener")
        .unwrap();

    let a = triple
        .locate_field()
        .with_name("a")
        .depends_on(listener.as_ref())
        .required()
        .unwrap();
    assert_eq!(a.def().unwrap().name, "a");

    let protocol = registry.resolve_enum("protocol").unwrap();
    let method = triple
        .locate_method()
        .with_name("missing")
        .depends_on(Some(&protocol))
        .optional()
        .unwrap();
    assert!(method.is_none());
}
