//! Fixture host layouts shared by hostlens tests.
//!
//! Every release in [`RELEASES`] gets the same set of release-independent shapes
//! (`fixtures/shapes.toml`) plus a networking layout that differs between releases the way real
//! hosts do: the package moves, methods get renamed and their parameter lists change.
//!
//! | release | package | send method |
//! |---|---|---|
//! | 1.7 | `net.minecraft.server.v1_7_R4` | `handle(Packet, GenericFutureListener[])` |
//! | 1.8, 1.12 | versioned | `sendPacket(Packet, GenericFutureListener, GenericFutureListener[])` |
//! | 1.16 | versioned | `sendPacket(Packet, GenericFutureListener)` |
//! | 1.17 | `net.minecraft.network` | `send(Packet, GenericFutureListener)` |
//! | 1.19 | `net.minecraft.network` | `send(Packet, PacketSendListener)` |

use std::sync::Arc;

use hostlens_config::{HostlensConfig, VERSION_TOKEN};
use hostlens_core::HostVersion;
use hostlens_model::{MethodStub, Modifiers, StubSet, TypeDefStub, TypeStore};

pub const V1_7: HostVersion = HostVersion::new(1, 7, 4);
pub const V1_8: HostVersion = HostVersion::new(1, 8, 3);
pub const V1_12: HostVersion = HostVersion::new(1, 12, 1);
pub const V1_16: HostVersion = HostVersion::new(1, 16, 3);
pub const V1_17: HostVersion = HostVersion::new(1, 17, 1);
pub const V1_19: HostVersion = HostVersion::new(1, 19, 3);

/// Every release with a fixture layout, oldest first.
pub const RELEASES: [HostVersion; 6] = [V1_7, V1_8, V1_12, V1_16, V1_17, V1_19];

/// First release with the unversioned package layout.
pub const MODERN: HostVersion = V1_17;

const NETTY: &str = include_str!("../fixtures/netty.toml");
const SHAPES: &str = include_str!("../fixtures/shapes.toml");
const NETWORK_LEGACY: &str = include_str!("../fixtures/network_legacy.toml");
const NETWORK_MODERN: &str = include_str!("../fixtures/network_modern.toml");
const CATALOG: &str = include_str!("../fixtures/catalog.toml");

const LISTENER: &str = "io.netty.util.concurrent.GenericFutureListener";
const SEND_LISTENER: &str = "net.minecraft.network.PacketSendListener";

fn parse(text: &str) -> StubSet {
    match toml::from_str(text) {
        Ok(stubs) => stubs,
        Err(err) => panic!("fixture layout does not parse: {err}"),
    }
}

fn internal(binary_name: &str) -> String {
    binary_name.replace('.', "/")
}

/// Binary name of a networking type on `version`, e.g. `network_type(V1_8, "Packet")`.
pub fn network_type(version: HostVersion, simple_name: &str) -> String {
    if version >= MODERN {
        match simple_name {
            "Packet" => "net.minecraft.network.protocol.Packet".to_owned(),
            "PacketPlayOutChat" => "net.minecraft.network.protocol.game.PacketPlayOutChat".to_owned(),
            other => format!("net.minecraft.network.{other}"),
        }
    } else {
        format!("net.minecraft.server.{}.{simple_name}", version.package_token())
    }
}

fn method(name: &str, params: &[String], return_descriptor: &str) -> MethodStub {
    let params: String = params.iter().map(|param| param.as_str()).collect();
    MethodStub {
        name: name.to_owned(),
        descriptor: format!("({params}){return_descriptor}"),
        signature: None,
        access_flags: Modifiers::PUBLIC,
    }
}

/// Release-specific send methods of `NetworkManager`.
fn send_methods(version: HostVersion) -> Vec<MethodStub> {
    let packet = format!("L{};", internal(&network_type(version, "Packet")));
    let listener = format!("L{};", internal(LISTENER));
    let listeners = format!("[{listener}");

    if version < V1_8 {
        vec![method("handle", &[packet, listeners], "V")]
    } else if version <= V1_12 {
        vec![
            method("sendPacket", &[packet.clone()], "V"),
            method("sendPacket", &[packet, listener, listeners], "V"),
        ]
    } else if version < MODERN {
        vec![
            method("sendPacket", &[packet.clone()], "V"),
            method("sendPacket", &[packet, listener], "V"),
        ]
    } else if version < V1_19 {
        vec![
            method("send", &[packet.clone()], "V"),
            method("send", &[packet, listener], "V"),
        ]
    } else {
        let send_listener = format!("L{};", internal(SEND_LISTENER));
        vec![
            method("send", &[packet.clone()], "V"),
            method("send", &[packet, send_listener], "V"),
        ]
    }
}

/// All fixture stubs for `version`.
pub fn network_stubs(version: HostVersion) -> StubSet {
    let mut stubs = parse(NETTY);
    stubs.types.extend(parse(SHAPES).types);

    let mut network = if version >= MODERN {
        parse(NETWORK_MODERN)
    } else {
        parse(&NETWORK_LEGACY.replace(VERSION_TOKEN, &version.package_token()))
    };
    let manager = network_type(version, "NetworkManager");
    if let Some(stub) = network.types.iter_mut().find(|stub| stub.binary_name == manager) {
        stub.methods.extend(send_methods(version));
    }
    stubs.types.extend(network.types);

    if version >= V1_19 {
        stubs.types.push(TypeDefStub {
            binary_name: SEND_LISTENER.to_owned(),
            access_flags: Modifiers::PUBLIC | Modifiers::INTERFACE | Modifiers::ABSTRACT,
            ..TypeDefStub::default()
        });
    }
    stubs
}

/// A mutable store with the layout of `version`, for tests that bind behaviour.
pub fn network_store(version: HostVersion) -> TypeStore {
    let mut store = TypeStore::with_minimal_runtime();
    let loaded = network_stubs(version).load_into(&mut store);
    tracing::debug!(%version, types = loaded.len(), "loaded fixture layout");
    store
}

/// A shared store with the layout of `version`.
pub fn network_host(version: HostVersion) -> Arc<TypeStore> {
    Arc::new(network_store(version))
}

/// Configuration whose catalog covers every fixture type.
pub fn fixture_config(version: HostVersion) -> HostlensConfig {
    let mut config = match HostlensConfig::load_from_str(CATALOG) {
        Ok(config) => config,
        Err(err) => panic!("fixture catalog does not load: {err}"),
    };
    config.host_version = Some(version);
    config
}
