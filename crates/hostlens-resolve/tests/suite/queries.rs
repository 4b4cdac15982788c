use hostlens_model::PrimitiveType;
use hostlens_resolve::{Assignability, Boxing, MemberCategory, ResolveError};
use hostlens_test_utils::V1_12;
use pretty_assertions::assert_eq;

use super::{field_name, fixture_registry, method_shape};

#[test]
fn skip_counts_matches_in_declaration_order() {
    let registry = fixture_registry(V1_12);
    let triple = registry.resolve_type("triple").unwrap();
    let ints = |skip| {
        triple
            .locate_field()
            .with_type(PrimitiveType::Int)
            .with_skip(skip)
            .required()
    };

    assert_eq!(field_name(&ints(0).unwrap()), "a");
    assert_eq!(field_name(&ints(1).unwrap()), "b");
    assert_eq!(field_name(&ints(2).unwrap()), "c");
    assert!(matches!(ints(3), Err(ResolveError::NotFound { .. })));
}

#[test]
fn static_fields_are_excluded_unless_requested() {
    let registry = fixture_registry(V1_12);
    let triple = registry.resolve_type("triple").unwrap();

    let instances = triple
        .locate_field()
        .with_type(PrimitiveType::Int)
        .with_static(true)
        .required()
        .unwrap();
    assert_eq!(field_name(&instances), "INSTANCES");
    assert!(instances.is_static());

    let any = triple
        .locate_field()
        .with_name("instances")
        .with_static(None)
        .required()
        .unwrap();
    assert_eq!(any, instances);
}

#[test]
fn not_found_lists_the_available_members() {
    let registry = fixture_registry(V1_12);
    let triple = registry.resolve_type("triple").unwrap();
    let err = triple
        .locate_field()
        .with_name("d")
        .required()
        .unwrap_err();

    let ResolveError::NotFound {
        category,
        target,
        constraints,
        candidates,
        ..
    } = &err
    else {
        panic!("expected NotFound, got {err:?}");
    };
    assert_eq!(*category, MemberCategory::Field);
    assert_eq!(target, "fixture.Triple");
    assert!(constraints.contains("name=d"), "{constraints}");
    assert_eq!(
        candidates,
        &vec![
            "public int fixture.Triple.a".to_owned(),
            "public int fixture.Triple.b".to_owned(),
            "public int fixture.Triple.c".to_owned(),
            "public java.lang.String fixture.Triple.label".to_owned(),
            "public static int fixture.Triple.INSTANCES".to_owned(),
        ]
    );
    assert!(err
        .to_string()
        .contains("available members:\n- public int fixture.Triple.a"));
}

#[test]
fn redeclared_fields_resolve_to_the_most_derived_declaration() {
    let registry = fixture_registry(V1_12);
    let derived = registry.resolve_type("derived").unwrap();
    let base = registry.resolve_type("base").unwrap();

    let own = derived.locate_field().with_name("value").required().unwrap();
    assert_eq!(own.id().owner, derived.id());

    let inherited = derived
        .locate_field()
        .with_name("value")
        .with_inherited(true)
        .required()
        .unwrap();
    assert_eq!(inherited, own);

    let number_typed = derived
        .locate_field()
        .with_type("java.lang.Number")
        .with_inherited(true)
        .required()
        .unwrap();
    assert_eq!(number_typed.id().owner, base.id());
}

#[test]
fn superclass_members_need_the_inherited_flag() {
    let registry = fixture_registry(V1_12);
    let derived = registry.resolve_type("derived").unwrap();
    let base = registry.resolve_type("base").unwrap();

    let err = derived
        .locate_field()
        .with_name("count")
        .required()
        .unwrap_err();
    assert!(err.is_absence(), "{err:?}");

    let count = derived
        .locate_field()
        .with_name("count")
        .with_inherited(true)
        .required()
        .unwrap();
    assert_eq!(count.id().owner, base.id());
    assert_eq!(count.owner(), &derived);

    let describe = derived
        .locate_method()
        .with_name("describe")
        .with_inherited(true)
        .required()
        .unwrap();
    assert_eq!(describe.id().owner, base.id());
}

#[test]
fn names_match_case_insensitively() {
    let registry = fixture_registry(V1_12);
    let derived = registry.resolve_type("derived").unwrap();

    let method = derived
        .locate_method()
        .with_name("GETVALUE")
        .required()
        .unwrap();
    assert_eq!(method_shape(&method), ("getValue".to_owned(), 0));
    assert_eq!(
        method.to_string(),
        "public java.lang.Integer fixture.Derived.getValue()"
    );
}

#[test]
fn parameter_assignability_is_directional() {
    let registry = fixture_registry(V1_12);
    let derived = registry.resolve_type("derived").unwrap();

    // An Integer argument can be passed to accept(Number).
    let accept = derived
        .locate_method()
        .with_param_matching(
            "java.lang.Integer",
            Boxing::Exact,
            Assignability::CandidateAcceptsTarget,
        )
        .required()
        .unwrap();
    assert_eq!(method_shape(&accept), ("accept".to_owned(), 1));

    let err = derived
        .locate_method()
        .with_param_matching(
            "java.lang.Integer",
            Boxing::Exact,
            Assignability::TargetAcceptsCandidate,
        )
        .required()
        .unwrap_err();
    assert!(matches!(err, ResolveError::NotFound { .. }), "{err:?}");

    // Exact comparison needs the declared type.
    let exact = derived
        .locate_method()
        .with_param("java.lang.Number")
        .required()
        .unwrap();
    assert_eq!(exact, accept);
}

#[test]
fn return_type_assignability_is_directional() {
    let registry = fixture_registry(V1_12);
    let derived = registry.resolve_type("derived").unwrap();
    let number = registry.resolve_type("number").unwrap();

    let get_value = derived
        .locate_method()
        .with_name("getValue")
        .with_return_type_matching(&number, Boxing::Exact, Assignability::TargetAcceptsCandidate)
        .required()
        .unwrap();
    assert_eq!(get_value.id().owner, derived.id());

    let err = derived
        .locate_method()
        .with_name("getValue")
        .with_return_type_matching(&number, Boxing::Exact, Assignability::CandidateAcceptsTarget)
        .required()
        .unwrap_err();
    assert!(matches!(err, ResolveError::NotFound { .. }), "{err:?}");
}

#[test]
fn boxing_can_be_ignored() {
    let registry = fixture_registry(V1_12);
    let derived = registry.resolve_type("derived").unwrap();

    let err = derived
        .locate_method()
        .with_name("setValue")
        .with_param("java.lang.Integer")
        .required()
        .unwrap_err();
    assert!(err.is_absence(), "{err:?}");

    let set_value = derived
        .locate_method()
        .with_name("setValue")
        .with_param_matching("java.lang.Integer", Boxing::IgnoreBoxing, Assignability::None)
        .required()
        .unwrap();
    assert_eq!(method_shape(&set_value), ("setValue".to_owned(), 1));

    let value = derived
        .locate_field()
        .with_type_matching(PrimitiveType::Int, Boxing::IgnoreBoxing, Assignability::None)
        .required()
        .unwrap();
    assert_eq!(field_name(&value), "value");
}

#[test]
fn generic_arguments_must_match_in_full() {
    let registry = fixture_registry(V1_12);
    let derived = registry.resolve_type("derived").unwrap();

    let names = derived
        .locate_field()
        .with_type("java.util.List")
        .with_generic("java.lang.String")
        .required()
        .unwrap();
    assert_eq!(field_name(&names), "names");

    // A prefix of the argument list is not enough.
    let err = derived
        .locate_field()
        .with_type("java.util.Map")
        .with_generic("java.lang.String")
        .required()
        .unwrap_err();
    assert!(matches!(err, ResolveError::NotFound { .. }), "{err:?}");

    let scores = derived
        .locate_field()
        .with_type("java.util.Map")
        .with_generic("java.lang.String")
        .with_generic_matching(PrimitiveType::Int, Boxing::IgnoreBoxing, Assignability::None)
        .required()
        .unwrap();
    assert_eq!(field_name(&scores), "scores");
}

#[test]
fn bounded_type_variables_match_their_erasure() {
    let registry = fixture_registry(V1_12);
    let holder = registry.resolve_type("holder").unwrap();

    let value = holder
        .locate_field()
        .with_type("java.lang.Number")
        .required()
        .unwrap();
    assert_eq!(field_name(&value), "value");
    assert!(holder
        .locate_field()
        .with_type("java.lang.Object")
        .optional()
        .unwrap()
        .is_none());

    let accept = holder
        .locate_method()
        .with_param("java.lang.Number")
        .required()
        .unwrap();
    assert_eq!(method_shape(&accept), ("accept".to_owned(), 1));
    assert_eq!(accept.to_string(), "public void fixture.Holder.accept(java.lang.Number)");

    // The return type compares erased; its type argument stays a type variable.
    let values = holder
        .locate_method()
        .with_return_type("java.util.List")
        .required()
        .unwrap();
    assert_eq!(method_shape(&values), ("values".to_owned(), 0));
    assert!(holder
        .locate_method()
        .with_return_type("java.util.List")
        .with_return_generic("java.lang.Number")
        .optional()
        .unwrap()
        .is_none());
}

#[test]
fn members_of_the_root_type_are_never_found() {
    let registry = fixture_registry(V1_12);
    let object = registry.wrap_named("java.lang.Object").unwrap();

    let err = object
        .locate_constructor()
        .with_no_parameters()
        .required()
        .unwrap_err();
    let ResolveError::NotFound { candidates, .. } = &err else {
        panic!("expected NotFound, got {err:?}");
    };
    assert!(candidates.is_empty(), "{candidates:?}");
    assert!(object
        .locate_constructor()
        .with_no_parameters()
        .optional()
        .unwrap()
        .is_none());
}

#[test]
fn abstract_and_static_methods_are_filtered() {
    let registry = fixture_registry(V1_12);
    let shape = registry.resolve_type("shape").unwrap();
    let derived = registry.resolve_type("derived").unwrap();

    let area = shape
        .locate_method()
        .with_abstract(true)
        .with_return_type(PrimitiveType::Double)
        .required()
        .unwrap();
    assert_eq!(method_shape(&area), ("area".to_owned(), 0));

    let err = shape
        .locate_method()
        .with_abstract(false)
        .with_no_parameters()
        .required()
        .unwrap_err();
    assert!(err.is_absence(), "{err:?}");

    let create = derived
        .locate_method()
        .with_static(true)
        .with_param(PrimitiveType::Int)
        .with_return_type(&derived)
        .required()
        .unwrap();
    assert_eq!(method_shape(&create), ("create".to_owned(), 1));
    assert!(create.is_static());
}

#[test]
fn queries_without_a_discriminator_are_rejected() {
    let registry = fixture_registry(V1_12);
    let derived = registry.resolve_type("derived").unwrap();

    let incomplete = |err: ResolveError| matches!(err, ResolveError::IncompleteQuery { .. });

    assert!(incomplete(derived.locate_field().required().unwrap_err()));
    assert!(incomplete(
        derived.locate_field().with_public(true).optional().unwrap_err()
    ));
    assert!(incomplete(
        derived.locate_method().with_static(true).required().unwrap_err()
    ));
    assert!(incomplete(
        derived.locate_constructor().with_public(true).optional().unwrap_err()
    ));
    assert!(incomplete(
        derived.locate_nested_type().with_inherited(false).required().unwrap_err()
    ));
}

#[test]
fn constructors_match_on_the_parameter_list() {
    let registry = fixture_registry(V1_12);
    let derived = registry.resolve_type("derived").unwrap();

    let default = derived
        .locate_constructor()
        .with_no_parameters()
        .required()
        .unwrap();
    assert_eq!(default.parameter_count(), 0);

    let with_int = derived
        .locate_constructor()
        .with_param(PrimitiveType::Int)
        .required()
        .unwrap();
    assert_eq!(with_int.parameter_count(), 1);
    assert_eq!(with_int.to_string(), "public fixture.Derived(int)");

    let private = derived
        .locate_constructor()
        .with_param("java.lang.String")
        .with_param(PrimitiveType::Int)
        .with_public(true)
        .optional()
        .unwrap();
    assert!(private.is_none());

    let private = derived
        .locate_constructor()
        .with_param("java.lang.String")
        .with_param(PrimitiveType::Int)
        .with_public(false)
        .required()
        .unwrap();
    assert_eq!(private.parameter_count(), 2);
}

#[test]
fn constructors_are_not_inherited() {
    let registry = fixture_registry(V1_12);
    let base = registry.resolve_type("base").unwrap();
    let derived = registry.resolve_type("derived").unwrap();

    let base_default = base
        .locate_constructor()
        .with_no_parameters()
        .required()
        .unwrap();
    let derived_default = derived
        .locate_constructor()
        .with_no_parameters()
        .required()
        .unwrap();
    assert_eq!(base_default.id().owner, base.id());
    assert_eq!(derived_default.id().owner, derived.id());
    assert!(base_default != derived_default);
}

#[test]
fn nested_types_match_simple_names_exactly() {
    let registry = fixture_registry(V1_12);
    let derived = registry.resolve_type("derived").unwrap();

    let entry = derived
        .locate_nested_type()
        .with_name("Entry")
        .required()
        .unwrap();
    assert_eq!(entry.name(), "fixture.Derived$Entry");

    let err = derived
        .locate_nested_type()
        .with_name("entry")
        .required()
        .unwrap_err();
    assert!(err.is_absence(), "{err:?}");

    // Members of the nested type resolve through the returned handle.
    let key = entry.locate_field().with_name("key").required().unwrap();
    let string = registry.wrap_named("java.lang.String").unwrap();
    assert_eq!(key.def().unwrap().ty, string.as_type());
}

#[test]
fn nested_types_filter_by_supertype_and_skipped_names() {
    let registry = fixture_registry(V1_12);
    let derived = registry.resolve_type("derived").unwrap();

    let runnable = derived
        .locate_nested_type()
        .with_supertype("java.lang.Runnable")
        .required()
        .unwrap();
    assert_eq!(runnable.name(), "fixture.Derived$Listener");

    let not_entry = derived
        .locate_nested_type()
        .with_static(true)
        .skip_names(["Entry"])
        .required()
        .unwrap();
    assert_eq!(not_entry, runnable);

    let second = derived
        .locate_nested_type()
        .with_public(true)
        .with_skip(1)
        .required()
        .unwrap();
    assert_eq!(second, runnable);
}
