use hostlens_core::{HostVersion, VersionOutOfRange, VersionRange};
use hostlens_model::Type;
use hostlens_resolve::{MethodHandle, ResolveError, Result, TypeRegistry};
use hostlens_test_utils::{network_type, MODERN, RELEASES, V1_12, V1_16, V1_17, V1_19, V1_7, V1_8};
use pretty_assertions::assert_eq;

use super::{field_name, fixture_registry, method_shape};

#[test]
fn out_of_range_queries_fail_without_searching() {
    let registry = fixture_registry(V1_19);
    let triple = registry.resolve_type("triple").unwrap();
    let legacy = VersionRange::new(Some(V1_8), Some(V1_16)).unwrap();

    let err = triple
        .locate_field()
        .with_name("does_not_exist")
        .with_version_range(legacy)
        .required()
        .unwrap_err();
    assert_eq!(
        err,
        ResolveError::VersionMismatch {
            category: hostlens_resolve::MemberCategory::Field,
            target: "fixture.Triple".to_owned(),
            range: legacy,
            version: V1_19,
            bound: VersionOutOfRange::Above { max: V1_16 },
        }
    );
    assert!(err.to_string().contains("higher than the maximum"), "{err}");

    let err = fixture_registry(V1_7)
        .resolve_type("triple")
        .unwrap()
        .locate_field()
        .with_name("a")
        .with_version_range(legacy)
        .required()
        .unwrap_err();
    assert!(
        matches!(
            err,
            ResolveError::VersionMismatch {
                bound: VersionOutOfRange::Below { min: V1_8 },
                ..
            }
        ),
        "{err:?}"
    );

    let in_range = fixture_registry(V1_12)
        .resolve_type("triple")
        .unwrap()
        .locate_field()
        .with_name("a")
        .with_version_range(legacy)
        .required()
        .unwrap();
    assert_eq!(field_name(&in_range), "a");
}

#[test]
fn fallbacks_are_tried_in_order() {
    let registry = fixture_registry(V1_12);
    let triple = registry.resolve_type("triple").unwrap();

    let resolved = triple
        .locate_field()
        .with_name("a")
        .with_version_range(VersionRange::until(V1_7))
        .or_else(triple.locate_field().with_name("missing"))
        .or_else(triple.locate_field().with_name("c"))
        .or_else(triple.locate_field().with_name("b"))
        .required()
        .unwrap();
    assert_eq!(field_name(&resolved), "c");
}

#[test]
fn the_last_failure_is_reported() {
    let registry = fixture_registry(V1_12);
    let triple = registry.resolve_type("triple").unwrap();
    let chain = || {
        triple
            .locate_field()
            .with_name("a")
            .with_version_range(VersionRange::since(V1_19))
            .or_else(triple.locate_field().with_name("missing"))
            .or_else(triple.locate_field().with_name("absent_too"))
    };

    let err = chain().required().unwrap_err();
    match &err {
        ResolveError::NotFound { constraints, .. } => {
            assert!(constraints.contains("name=absent_too"), "{constraints}")
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert_eq!(chain().optional().unwrap(), None);
}

#[test]
fn incomplete_fallbacks_stop_the_chain() {
    let registry = fixture_registry(V1_12);
    let triple = registry.resolve_type("triple").unwrap();

    let err = triple
        .locate_field()
        .with_name("missing")
        .or_else(triple.locate_field().with_public(true))
        .or_else(triple.locate_field().with_name("a"))
        .optional()
        .unwrap_err();
    assert!(matches!(err, ResolveError::IncompleteQuery { .. }), "{err:?}");
}

/// The send method with a completion listener, as it is named on every release.
fn send_with_listener(registry: &TypeRegistry) -> Result<MethodHandle> {
    let manager = registry.resolve_type("network_manager")?;
    let packet = registry.resolve_type("packet")?;
    let listener = registry.resolve_type("future_listener")?;
    let listeners = Type::array(listener.as_type());

    manager
        .locate_method()
        .with_name("send")
        .with_param(&packet)
        .with_param("net.minecraft.network.PacketSendListener")
        .with_version_range(VersionRange::since(V1_19))
        .or_else(
            manager
                .locate_method()
                .with_name("send")
                .with_param(&packet)
                .with_param(&listener),
        )
        .or_else(
            manager
                .locate_method()
                .with_name("sendPacket")
                .with_param(&packet)
                .with_param(&listener)
                .with_param(&listeners)
                .with_version_range(VersionRange::until(V1_12)),
        )
        .or_else(
            manager
                .locate_method()
                .with_name("sendPacket")
                .with_param(&packet)
                .with_param(&listener),
        )
        .or_else(
            manager
                .locate_method()
                .with_name("handle")
                .with_param(&packet)
                .with_param(&listeners),
        )
        .required()
}

#[test]
fn one_declaration_resolves_on_every_release() {
    let expected = |version: HostVersion| match version {
        v if v == V1_7 => ("handle", 2),
        v if v == V1_8 || v == V1_12 => ("sendPacket", 3),
        v if v == V1_16 => ("sendPacket", 2),
        _ => ("send", 2),
    };

    for version in RELEASES {
        let registry = fixture_registry(version);
        let send = send_with_listener(&registry)
            .unwrap_or_else(|err| panic!("no send method on {version}: {err}"));
        let (name, arity) = expected(version);
        assert_eq!(method_shape(&send), (name.to_owned(), arity), "{version}");
        assert_eq!(send.host_version(), version);
        assert_eq!(send.owner().name(), network_type(version, "NetworkManager"));
    }
}

#[test]
fn the_listener_parameter_follows_the_release() {
    for (version, listener) in [
        (V1_17, "io.netty.util.concurrent.GenericFutureListener"),
        (V1_19, "net.minecraft.network.PacketSendListener"),
    ] {
        let registry = fixture_registry(version);
        let send = send_with_listener(&registry).unwrap();
        assert!(
            send.to_string().ends_with(&format!(",{listener})")),
            "{version}: {send}"
        );
    }
}

#[test]
fn nested_types_fall_back_across_layouts() {
    for version in RELEASES {
        let registry = fixture_registry(version);
        let manager = registry.resolve_type("network_manager").unwrap();
        let queued = manager
            .locate_nested_type()
            .with_name("PacketHolder")
            .with_version_range(VersionRange::since(MODERN))
            .or_else(manager.locate_nested_type().with_name("QueuedPacket"))
            .required()
            .unwrap();

        let expected = if version >= MODERN {
            "PacketHolder"
        } else {
            "QueuedPacket"
        };
        assert_eq!(queued.def().unwrap().simple_name(), expected, "{version}");

        let packet = registry.resolve_type("packet").unwrap();
        let field = queued
            .locate_field()
            .with_type(&packet)
            .required()
            .unwrap();
        assert_eq!(field_name(&field), "packet");
    }
}

#[test]
fn release_specific_types_are_absent_elsewhere() {
    let legacy = fixture_registry(V1_17);
    assert!(legacy
        .resolve_type_optional("packet_send_listener")
        .unwrap()
        .is_none());
    assert!(matches!(
        legacy.resolve_type("packet_send_listener"),
        Err(ResolveError::TypeAbsent { .. })
    ));

    let modern = fixture_registry(V1_19);
    let listener = modern.resolve_type("packet_send_listener").unwrap();
    assert_eq!(listener.name(), "net.minecraft.network.PacketSendListener");
}
