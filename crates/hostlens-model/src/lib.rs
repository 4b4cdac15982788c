//! Host type model for hostlens.
//!
//! The resolution engine never talks to a concrete runtime directly. It sees host types through
//! two capability traits:
//!
//! - [`TypeEnv`]: read-only introspection (type definitions, members, well-known types).
//! - [`Host`]: access primitives (read/write fields, invoke methods, construct instances).
//!
//! [`TypeStore`] is the in-memory backend used by the workspace. Layouts are described with
//! [`TypeDefStub`]s (JVM descriptors and generic signatures) and loaded with [`StubLoader`];
//! behaviour is bound separately as native closures.

#![forbid(unsafe_code)]

mod assign;
mod def;
mod descriptor;
mod env;
mod error;
mod ids;
mod store;
mod stub;
mod ty;
mod value;

pub use assign::{box_type, format_type, is_assignable, is_subclass, unbox_type, unboxed};
pub use def::{ConstructorDef, FieldDef, MethodDef, Modifiers, TypeDef, TypeKind};
pub use descriptor::{
    parse_method_signature, parse_type_signature, DescriptorError, MethodSignature,
    TypeArgument, TypeSignature,
};
pub use env::{Host, TypeEnv, WellKnownTypes};
pub use error::{AccessError, HostException};
pub use ids::{ConstructorId, FieldId, MethodId, TypeId};
pub use store::{Invocation, TypeStore};
pub use stub::{FieldStub, MethodStub, StubLoader, StubSet, TypeDefStub, TypeProvider};
pub use ty::{ClassType, PrimitiveType, Type, WildcardBound};
pub use value::{
    default_value, runtime_type, value_conforms, ArrayValue, EnumConstant, Instance, ObjectRef,
    Value,
};
