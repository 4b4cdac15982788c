//! Version-adaptive member resolution.
//!
//! Callers describe the host members they need declaratively and resolve them once per process:
//!
//! 1. A [`TypeRegistry`] maps symbolic identifiers to host types through a [`TypeCatalog`] and
//!    caches every outcome.
//! 2. A [`TypeHandle`] hands out member queries ([`FieldQuery`], [`MethodQuery`],
//!    [`ConstructorQuery`], [`NestedTypeQuery`]).
//! 3. A query compiles its constraints into a matcher, walks the type hierarchy and yields an
//!    immutable handle, trying its version-gated fallbacks in order when the primary query does
//!    not apply.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use hostlens_core::{HostVersion, VersionRange};
//! # use hostlens_model::TypeStore;
//! # use hostlens_resolve::{TypeCatalog, TypeRegistry};
//! # fn main() -> hostlens_resolve::Result<()> {
//! let catalog = TypeCatalog::new().with("network_manager", |_, env| {
//!     env.lookup_type("net.minecraft.network.NetworkManager")
//! });
//! let registry = TypeRegistry::new(
//!     Arc::new(TypeStore::with_minimal_runtime()),
//!     HostVersion::new(1, 19, 3),
//!     catalog,
//! );
//!
//! let manager = registry.resolve_type("network_manager")?;
//! let send = manager
//!     .locate_method()
//!     .with_name("send")
//!     .with_param("net.minecraft.network.protocol.Packet")
//!     .with_version_range(VersionRange::since(HostVersion::new(1, 17, 0)))
//!     .or_else(manager.locate_method().with_name("sendPacket"))
//!     .required()?;
//! # let _ = send;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod catalog;
mod comparable;
mod context;
mod error;
mod handle;
mod member;
mod memo;
mod query;
mod registry;
mod walker;

pub use catalog::TypeCatalog;
pub use comparable::{Assignability, Boxing, ComparableType};
pub use context::ResolveOptions;
pub use error::{MemberCategory, ResolveError, Result};
pub use handle::{
    ArgsTransform, ConstructorHandle, EnumCopy, EnumHandle, FieldHandle, Handle, MethodHandle,
    Resolved, TypeHandle, ValueTransform,
};
pub use member::NestedType;
pub use query::{ConstructorQuery, FieldQuery, IntoType, MethodQuery, NestedTypeQuery};
pub use registry::TypeRegistry;
pub use walker::{hierarchy, render_candidates, walk_hierarchy, Member, WalkDecision};
