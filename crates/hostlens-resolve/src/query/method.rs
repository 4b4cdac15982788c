use std::sync::Arc;

use hostlens_core::VersionRange;
use hostlens_model::{AccessError, MethodId, Modifiers, TypeEnv, Value};

use super::{
    find_member, flag_matches, render_sequence, resolve_chain, resolve_optional, sequence_matches,
    IntoType, Query, QueryCommon,
};
use crate::comparable::{Assignability, Boxing, ComparableType};
use crate::handle::{ArgsTransform, Handle, MethodHandle, Resolved, TypeHandle, ValueTransform};
use crate::{MemberCategory, ResolveError, Result};

/// Query for a method.
///
/// Defaults: instance methods only, declared directly on the queried type, any parameter list.
#[derive(Clone)]
pub struct MethodQuery {
    common: QueryCommon<MethodQuery>,
    is_static: Option<bool>,
    is_abstract: Option<bool>,
    name: Option<String>,
    return_type: Option<ComparableType>,
    return_generics: Option<Vec<ComparableType>>,
    params: Option<Vec<ComparableType>>,
    inherited: bool,
    call_transform: Option<ArgsTransform>,
    response_transform: Option<ValueTransform>,
}

impl MethodQuery {
    pub(crate) fn new(owner: TypeHandle) -> Self {
        Self {
            common: QueryCommon::new(owner),
            is_static: Some(false),
            is_abstract: None,
            name: None,
            return_type: None,
            return_generics: None,
            params: None,
            inherited: false,
            call_transform: None,
            response_transform: None,
        }
    }

    pub fn with_public(mut self, public: impl Into<Option<bool>>) -> Self {
        self.common.public = public.into();
        self
    }

    pub fn with_static(mut self, is_static: impl Into<Option<bool>>) -> Self {
        self.is_static = is_static.into();
        self
    }

    pub fn with_abstract(mut self, is_abstract: impl Into<Option<bool>>) -> Self {
        self.is_abstract = is_abstract.into();
        self
    }

    /// ASCII case-insensitive.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_return_type(self, ty: impl IntoType) -> Self {
        self.with_return_type_matching(ty, Boxing::Exact, Assignability::None)
    }

    pub fn with_return_type_matching(
        mut self,
        ty: impl IntoType,
        boxing: Boxing,
        assignability: Assignability,
    ) -> Self {
        let env = self.common.env();
        let ty = ty.into_type(env);
        self.return_type = Some(ComparableType::new(env, ty, boxing, assignability));
        self
    }

    /// Append an expected type argument of the return type.
    pub fn with_return_generic(self, ty: impl IntoType) -> Self {
        self.with_return_generic_matching(ty, Boxing::Exact, Assignability::None)
    }

    pub fn with_return_generic_matching(
        mut self,
        ty: impl IntoType,
        boxing: Boxing,
        assignability: Assignability,
    ) -> Self {
        let env = self.common.env();
        let ty = ComparableType::new(env, ty.into_type(env), boxing, assignability);
        self.return_generics.get_or_insert_with(Vec::new).push(ty);
        self
    }

    /// Append the next parameter, compared exactly.
    pub fn with_param(self, ty: impl IntoType) -> Self {
        self.with_param_matching(ty, Boxing::Exact, Assignability::None)
    }

    pub fn with_param_matching(
        mut self,
        ty: impl IntoType,
        boxing: Boxing,
        assignability: Assignability,
    ) -> Self {
        let env = self.common.env();
        let ty = ComparableType::new(env, ty.into_type(env), boxing, assignability);
        self.params.get_or_insert_with(Vec::new).push(ty);
        self
    }

    /// Replace the parameter list with pre-built comparisons.
    pub fn with_param_types(mut self, params: impl IntoIterator<Item = ComparableType>) -> Self {
        self.params = Some(params.into_iter().collect());
        self
    }

    /// Only methods without parameters.
    pub fn with_no_parameters(mut self) -> Self {
        self.params = Some(Vec::new());
        self
    }

    pub fn with_inherited(mut self, inherited: bool) -> Self {
        self.inherited = inherited;
        self
    }

    pub fn with_skip(mut self, skip: usize) -> Self {
        self.common.skip = skip;
        self
    }

    pub fn with_version_range(mut self, range: VersionRange) -> Self {
        self.common.range = range;
        self
    }

    pub fn or_else(mut self, fallback: MethodQuery) -> Self {
        self.common.fallbacks.push(fallback);
        self
    }

    pub fn depends_on<D: Resolved>(mut self, dependency: Option<&D>) -> Self {
        self.common.depends_on(dependency);
        self
    }

    /// Rewrites the argument list before every invocation.
    pub fn with_call_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Vec<Value>, AccessError> + Send + Sync + 'static,
    {
        self.call_transform = Some(Arc::new(transform));
        self
    }

    /// Applied to every result.
    pub fn with_response_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> Result<Value, AccessError> + Send + Sync + 'static,
    {
        self.response_transform = Some(Arc::new(transform));
        self
    }

    pub fn required(self) -> Result<MethodHandle> {
        resolve_chain(&self)
    }

    pub fn optional(self) -> Result<Option<MethodHandle>> {
        resolve_optional(&self)
    }

    fn accepts(&self, env: &dyn TypeEnv, method: MethodId) -> bool {
        let Some(def) = env.method(method) else {
            return false;
        };
        if !self.common.in_scope(env, method, self.inherited) {
            return false;
        }
        if !flag_matches(self.is_static, def.modifiers, Modifiers::STATIC)
            || !flag_matches(self.common.public, def.modifiers, Modifiers::PUBLIC)
            || !flag_matches(self.is_abstract, def.modifiers, Modifiers::ABSTRACT)
        {
            return false;
        }
        if let Some(name) = &self.name {
            if !def.name.eq_ignore_ascii_case(name) {
                return false;
            }
        }
        if let Some(return_type) = &self.return_type {
            if !return_type.matches(env, &def.return_type) {
                return false;
            }
        }
        if let Some(params) = &self.params {
            if !sequence_matches(env, params, &def.params) {
                return false;
            }
        }
        if let Some(generics) = &self.return_generics {
            if !sequence_matches(env, generics, def.generic_return_type().type_args()) {
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
        if let Some(is_abstract) = self.is_abstract {
            parts.push(format!("abstract={is_abstract}"));
        }
        if let Some(name) = &self.name {
            parts.push(format!("name={name}"));
        }
        if let Some(return_type) = &self.return_type {
            parts.push(format!("returns={}", return_type.render(env)));
        }
        if let Some(params) = &self.params {
            parts.push(format!("params=({})", render_sequence(env, params)));
        }
        if let Some(generics) = &self.return_generics {
            parts.push(format!("generics=<{}>", render_sequence(env, generics)));
        }
        parts.push(format!("inherited={}", self.inherited));
        parts
    }
}

impl Query for MethodQuery {
    type Output = MethodHandle;

    const CATEGORY: MemberCategory = MemberCategory::Method;

    fn common(&self) -> &QueryCommon<Self> {
        &self.common
    }

    fn check_shape(&self) -> Result<()> {
        if self.name.is_none() && self.return_type.is_none() && self.params.is_none() {
            return Err(ResolveError::IncompleteQuery {
                category: Self::CATEGORY,
                target: self.common.owner.name(),
                reason: "a method query needs a name, a return type or a parameter list",
            });
        }
        Ok(())
    }

    fn search(&self) -> Result<MethodHandle> {
        let method = find_member(
            &self.common,
            |env, method: MethodId| self.accepts(env, method),
            || self.describe(),
        )?;
        let handle = MethodHandle::new(
            Handle::new(method, self.common.owner.clone()),
            self.call_transform.clone(),
            self.response_transform.clone(),
        );
        tracing::trace!(
            target_type = %self.common.owner.name(),
            method = %handle,
            "resolved method"
        );
        Ok(handle)
    }
}
