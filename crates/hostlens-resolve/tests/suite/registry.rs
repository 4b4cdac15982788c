use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::time::Duration;

use hostlens_config::{HostlensConfig, NameRule};
use hostlens_core::SymbolicId;
use hostlens_model::TypeId;
use hostlens_resolve::{ResolveError, TypeCatalog, TypeRegistry};
use hostlens_test_utils::{fixture_config, network_host, V1_12, V1_19, V1_8};
use pretty_assertions::assert_eq;

use super::fixture_registry;

fn counting_catalog(calls: &Arc<AtomicUsize>, name: Option<&'static str>) -> TypeCatalog {
    let calls = Arc::clone(calls);
    TypeCatalog::new().with("counted", move |_, env| {
        calls.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(5));
        env.lookup_type(name?)
    })
}

#[test]
fn repeated_lookups_return_the_cached_handle() {
    let registry = fixture_registry(V1_12);
    let first = registry.resolve_type("derived").unwrap();
    let second = registry.resolve_type("derived").unwrap();
    assert_eq!(first, second);
    assert_eq!(registry.cached_len(), 1);
    assert_eq!(
        registry.cached(&SymbolicId::new("derived")),
        Some(Ok(first))
    );
    assert_eq!(registry.cached(&SymbolicId::new("base")), None);
}

#[test]
fn concurrent_first_lookups_run_the_resolver_once() {
    const THREADS: usize = 8;

    let calls = Arc::new(AtomicUsize::new(0));
    let registry = TypeRegistry::new(
        network_host(V1_12),
        V1_12,
        counting_catalog(&calls, Some("fixture.Triple")),
    );
    let barrier = Barrier::new(THREADS);
    let (barrier, registry) = (&barrier, &registry);

    let handles: Vec<_> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(move || {
                    barrier.wait();
                    registry.resolve_type("counted").unwrap()
                })
            })
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join().unwrap())
            .collect()
    });

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(handles.iter().all(|handle| handle == &handles[0]));
    assert_eq!(handles[0].name(), "fixture.Triple");
}

#[test]
fn absence_is_cached_like_success() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = TypeRegistry::new(network_host(V1_12), V1_12, counting_catalog(&calls, None));

    for _ in 0..3 {
        let err = registry.resolve_type("counted").unwrap_err();
        assert_eq!(
            err,
            ResolveError::TypeAbsent {
                id: SymbolicId::new("counted"),
                version: V1_12,
            }
        );
    }
    assert_eq!(registry.resolve_type_optional("counted").unwrap(), None);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn unknown_identifiers_fail_every_form() {
    let registry = fixture_registry(V1_12);
    let unknown = ResolveError::UnknownIdentifier(SymbolicId::new("nope"));

    assert_eq!(registry.resolve_type("nope").unwrap_err(), unknown);
    assert_eq!(registry.resolve_type_optional("nope").unwrap_err(), unknown);
    assert_eq!(registry.resolve_enum_optional("nope").unwrap_err(), unknown);
    assert_eq!(registry.cached_len(), 0);
}

#[test]
fn known_types_can_be_wrapped_directly() {
    let registry = fixture_registry(V1_12);
    let base = registry.resolve_type("base").unwrap();

    let wrapped = registry.wrap_named("fixture.Base").unwrap();
    assert_eq!(wrapped, base);
    assert_eq!(registry.wrap(base.id()), Some(wrapped));
    assert_eq!(registry.wrap(TypeId::new(u32::MAX)), None);
    assert_eq!(registry.wrap_named("fixture.Missing"), None);
}

#[test]
fn handles_expose_the_host_type() {
    let registry = fixture_registry(V1_12);
    let derived = registry.resolve_type("derived").unwrap();
    let base = registry.resolve_type("base").unwrap();

    assert_eq!(derived.name(), "fixture.Derived");
    assert_eq!(
        derived.def().unwrap().super_class.as_ref(),
        Some(&base.as_type())
    );
    assert_eq!(derived.to_string(), "public class fixture.Derived");
    assert_eq!(derived.host_version(), V1_12);
}

#[test]
fn detected_versions_override_the_configuration() {
    let config = fixture_config(V1_8);
    let registry = TypeRegistry::from_config(network_host(V1_19), &config, Some(V1_19)).unwrap();
    assert_eq!(registry.host_version(), V1_19);
    assert!(registry.options().list_candidates);
    assert_eq!(registry.options().max_listed_candidates, 32);

    let manager = registry.resolve_type("network_manager").unwrap();
    assert_eq!(manager.name(), "net.minecraft.network.NetworkManager");
}

#[test]
fn a_version_is_required() {
    let mut config = fixture_config(V1_12);
    config.host_version = None;
    let err = TypeRegistry::from_config(network_host(V1_12), &config, None).unwrap_err();
    assert!(matches!(err, ResolveError::Configuration(_)), "{err:?}");
}

#[test]
fn inverted_catalog_rules_are_rejected() {
    let mut catalog = BTreeMap::new();
    catalog.insert(
        "manager".to_owned(),
        vec![NameRule {
            name: "a.Manager".to_owned(),
            min: Some(V1_19),
            max: Some(V1_8),
        }],
    );
    let config = HostlensConfig {
        host_version: Some(V1_12),
        catalog,
        ..HostlensConfig::default()
    };

    let err = TypeRegistry::from_config(network_host(V1_12), &config, None).unwrap_err();
    let ResolveError::Configuration(message) = err else {
        panic!("expected a configuration error, got {err:?}");
    };
    assert!(message.starts_with("catalog.manager:"), "{message}");
}
