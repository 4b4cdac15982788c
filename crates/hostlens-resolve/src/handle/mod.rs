//! Resolved members.
//!
//! Every handle wraps exactly one host member together with the [`TypeHandle`] it was located
//! through. Handles are immutable, cheap to clone and compare equal when they wrap the same
//! member, regardless of which query produced them.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use hostlens_core::HostVersion;
use hostlens_model::{AccessError, Value};

use crate::walker::Member;

mod constructor;
mod enumeration;
mod field;
mod method;
mod ty;

pub use constructor::ConstructorHandle;
pub use enumeration::{EnumCopy, EnumHandle};
pub use field::FieldHandle;
pub use method::MethodHandle;
pub use ty::TypeHandle;

/// Maps one value to another around a raw field access or a method result.
pub type ValueTransform = Arc<dyn Fn(Value) -> Result<Value, AccessError> + Send + Sync>;

/// Rewrites an argument list before a raw invocation.
pub type ArgsTransform = Arc<dyn Fn(Vec<Value>) -> Result<Vec<Value>, AccessError> + Send + Sync>;

/// Marker for anything a query can declare as a dependency of its transforms.
pub trait Resolved: fmt::Display {}

/// One resolved member plus the type it was located through.
#[derive(Clone)]
pub struct Handle<M: Member> {
    member: M,
    owner: TypeHandle,
}

impl<M: Member> Handle<M> {
    pub(crate) fn new(member: M, owner: TypeHandle) -> Self {
        Self { member, owner }
    }

    pub fn member(&self) -> M {
        self.member
    }

    /// The queried type. For inherited members this is a subtype of the declaring type.
    pub fn owner(&self) -> &TypeHandle {
        &self.owner
    }

    pub fn host_version(&self) -> HostVersion {
        self.owner.ctx().version
    }
}

impl<M: Member> PartialEq for Handle<M> {
    fn eq(&self, other: &Self) -> bool {
        self.member == other.member
    }
}

impl<M: Member> Eq for Handle<M> {}

impl<M: Member> Hash for Handle<M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.member.hash(state);
    }
}

impl<M: Member> fmt::Display for Handle<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.member.render(self.owner.ctx().env()))
    }
}

impl<M: Member> fmt::Debug for Handle<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("member", &self.member)
            .field("owner", &self.owner.id())
            .finish()
    }
}
