use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use hostlens_core::HostVersion;
use hostlens_model::{value_conforms, Type, TypeDef, TypeId, Value};

use super::{EnumHandle, Resolved};
use crate::context::ResolveContext;
use crate::member::render_type;
use crate::query::{ConstructorQuery, FieldQuery, MethodQuery, NestedTypeQuery};
use crate::Result;

/// A resolved host type; the entry point for member queries.
#[derive(Clone)]
pub struct TypeHandle {
    id: TypeId,
    ctx: Arc<ResolveContext>,
}

impl TypeHandle {
    pub(crate) fn new(id: TypeId, ctx: Arc<ResolveContext>) -> Self {
        Self { id, ctx }
    }

    pub(crate) fn ctx(&self) -> &ResolveContext {
        &self.ctx
    }

    pub(crate) fn sibling(&self, id: TypeId) -> TypeHandle {
        TypeHandle::new(id, Arc::clone(&self.ctx))
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Binary name, e.g. `net.example.Outer$Inner`.
    pub fn name(&self) -> String {
        self.ctx.type_name(self.id)
    }

    pub fn def(&self) -> Option<&TypeDef> {
        self.ctx.env().type_def(self.id)
    }

    pub fn host_version(&self) -> HostVersion {
        self.ctx.version
    }

    /// The raw (unparameterized) type, usable as a query constraint.
    pub fn as_type(&self) -> Type {
        Type::class(self.id, vec![])
    }

    pub fn is_instance(&self, value: &Value) -> bool {
        !value.is_null() && value_conforms(self.ctx.env(), value, &self.as_type())
    }

    /// Interpret this type as an enumeration. Constants are read once per type.
    pub fn as_enum(&self) -> Result<EnumHandle> {
        let constants = self.ctx.enum_constants(self.id)?;
        Ok(EnumHandle::new(self.clone(), constants))
    }

    pub fn locate_field(&self) -> FieldQuery {
        FieldQuery::new(self.clone())
    }

    pub fn locate_method(&self) -> MethodQuery {
        MethodQuery::new(self.clone())
    }

    pub fn locate_constructor(&self) -> ConstructorQuery {
        ConstructorQuery::new(self.clone())
    }

    pub fn locate_nested_type(&self) -> NestedTypeQuery {
        NestedTypeQuery::new(self.clone())
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeHandle {}

impl Hash for TypeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_type(self.ctx.env(), self.id))
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeHandle")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}

impl Resolved for TypeHandle {}
