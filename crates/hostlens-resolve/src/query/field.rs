use std::sync::Arc;

use hostlens_core::VersionRange;
use hostlens_model::{AccessError, FieldId, Modifiers, TypeEnv, Value};

use super::{
    find_member, flag_matches, render_sequence, resolve_chain, resolve_optional, sequence_matches,
    IntoType, Query, QueryCommon,
};
use crate::comparable::{Assignability, Boxing, ComparableType};
use crate::handle::{FieldHandle, Handle, Resolved, TypeHandle, ValueTransform};
use crate::{MemberCategory, ResolveError, Result};

/// Query for a field of a type (and, with [`with_inherited`](Self::with_inherited), its
/// superclasses).
///
/// Defaults: instance fields only, declared directly on the queried type.
#[derive(Clone)]
pub struct FieldQuery {
    common: QueryCommon<FieldQuery>,
    is_static: Option<bool>,
    name: Option<String>,
    ty: Option<ComparableType>,
    generics: Option<Vec<ComparableType>>,
    inherited: bool,
    value_transform: Option<ValueTransform>,
    result_transform: Option<ValueTransform>,
}

impl FieldQuery {
    pub(crate) fn new(owner: TypeHandle) -> Self {
        Self {
            common: QueryCommon::new(owner),
            is_static: Some(false),
            name: None,
            ty: None,
            generics: None,
            inherited: false,
            value_transform: None,
            result_transform: None,
        }
    }

    pub fn with_public(mut self, public: impl Into<Option<bool>>) -> Self {
        self.common.public = public.into();
        self
    }

    /// `None` accepts both static and instance fields.
    pub fn with_static(mut self, is_static: impl Into<Option<bool>>) -> Self {
        self.is_static = is_static.into();
        self
    }

    /// ASCII case-insensitive.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declared type, compared exactly (by erasure).
    pub fn with_type(self, ty: impl IntoType) -> Self {
        self.with_type_matching(ty, Boxing::Exact, Assignability::None)
    }

    pub fn with_type_matching(
        mut self,
        ty: impl IntoType,
        boxing: Boxing,
        assignability: Assignability,
    ) -> Self {
        let env = self.common.env();
        let ty = ty.into_type(env);
        self.ty = Some(ComparableType::new(env, ty, boxing, assignability));
        self
    }

    /// Append an expected type argument of the declared type.
    pub fn with_generic(self, ty: impl IntoType) -> Self {
        self.with_generic_matching(ty, Boxing::Exact, Assignability::None)
    }

    pub fn with_generic_matching(
        mut self,
        ty: impl IntoType,
        boxing: Boxing,
        assignability: Assignability,
    ) -> Self {
        let env = self.common.env();
        let ty = ComparableType::new(env, ty.into_type(env), boxing, assignability);
        self.generics.get_or_insert_with(Vec::new).push(ty);
        self
    }

    /// Also search superclasses, and accept members declared there.
    pub fn with_inherited(mut self, inherited: bool) -> Self {
        self.inherited = inherited;
        self
    }

    /// Select the match after `skip` otherwise-matching fields.
    pub fn with_skip(mut self, skip: usize) -> Self {
        self.common.skip = skip;
        self
    }

    pub fn with_version_range(mut self, range: VersionRange) -> Self {
        self.common.range = range;
        self
    }

    /// Alternative tried when this query (and the alternatives registered before) finds
    /// nothing or is out of range.
    pub fn or_else(mut self, fallback: FieldQuery) -> Self {
        self.common.fallbacks.push(fallback);
        self
    }

    /// Declare a handle the transforms rely on; a missing one fails resolution.
    pub fn depends_on<D: Resolved>(mut self, dependency: Option<&D>) -> Self {
        self.common.depends_on(dependency);
        self
    }

    /// Applied to every value before it is written.
    pub fn with_value_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> Result<Value, AccessError> + Send + Sync + 'static,
    {
        self.value_transform = Some(Arc::new(transform));
        self
    }

    /// Applied to every value after it is read.
    pub fn with_result_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> Result<Value, AccessError> + Send + Sync + 'static,
    {
        self.result_transform = Some(Arc::new(transform));
        self
    }

    pub fn required(self) -> Result<FieldHandle> {
        resolve_chain(&self)
    }

    pub fn optional(self) -> Result<Option<FieldHandle>> {
        resolve_optional(&self)
    }

    fn accepts(&self, env: &dyn TypeEnv, field: FieldId) -> bool {
        let Some(def) = env.field(field) else {
            return false;
        };
        if !self.common.in_scope(env, field, self.inherited) {
            return false;
        }
        if !flag_matches(self.is_static, def.modifiers, Modifiers::STATIC)
            || !flag_matches(self.common.public, def.modifiers, Modifiers::PUBLIC)
        {
            return false;
        }
        if let Some(name) = &self.name {
            if !def.name.eq_ignore_ascii_case(name) {
                return false;
            }
        }
        if let Some(ty) = &self.ty {
            if !ty.matches(env, &def.ty) {
                return false;
            }
        }
        if let Some(generics) = &self.generics {
            if !sequence_matches(env, generics, def.generic_type().type_args()) {
                return false;
            }
        }
        true
    }

    fn describe(&self) -> Vec<String> {
        let env = self.common.env();
        let mut parts = Vec::new();
        if let Some(is_static) = self.is_static {
            parts.push(format!("static={is_static}"));
        }
        if let Some(name) = &self.name {
            parts.push(format!("name={name}"));
        }
        if let Some(ty) = &self.ty {
            parts.push(format!("type={}", ty.render(env)));
        }
        if let Some(generics) = &self.generics {
            parts.push(format!("generics=<{}>", render_sequence(env, generics)));
        }
        parts.push(format!("inherited={}", self.inherited));
        parts
    }
}

impl Query for FieldQuery {
    type Output = FieldHandle;

    const CATEGORY: MemberCategory = MemberCategory::Field;

    fn common(&self) -> &QueryCommon<Self> {
        &self.common
    }

    fn check_shape(&self) -> Result<()> {
        if self.name.is_none() && self.ty.is_none() {
            return Err(ResolveError::IncompleteQuery {
                category: Self::CATEGORY,
                target: self.common.owner.name(),
                reason: "a field query needs a name or a type",
            });
        }
        Ok(())
    }

    fn search(&self) -> Result<FieldHandle> {
        let field = find_member(
            &self.common,
            |env, field: FieldId| self.accepts(env, field),
            || self.describe(),
        )?;
        let handle = FieldHandle::new(
            Handle::new(field, self.common.owner.clone()),
            self.value_transform.clone(),
            self.result_transform.clone(),
        );
        tracing::trace!(
            target_type = %self.common.owner.name(),
            field = %handle,
            "resolved field"
        );
        Ok(handle)
    }
}
