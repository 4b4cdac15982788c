mod access;
mod fallbacks;
mod queries;
mod registry;

use std::sync::Arc;

use hostlens_core::HostVersion;
use hostlens_model::TypeStore;
use hostlens_resolve::{FieldHandle, MethodHandle, TypeRegistry};

/// Registry over the fixture layout of `version`, using the fixture catalog.
pub(crate) fn fixture_registry(version: HostVersion) -> TypeRegistry {
    registry_for(hostlens_test_utils::network_host(version), version)
}

pub(crate) fn registry_for(host: Arc<TypeStore>, version: HostVersion) -> TypeRegistry {
    let config = hostlens_test_utils::fixture_config(version);
    TypeRegistry::from_config(host, &config, None).expect("fixture registry")
}

pub(crate) fn field_name(handle: &FieldHandle) -> String {
    handle.def().expect("field def").name.clone()
}

pub(crate) fn method_shape(handle: &MethodHandle) -> (String, usize) {
    let def = handle.def().expect("method def");
    (def.name.clone(), def.params.len())
}
