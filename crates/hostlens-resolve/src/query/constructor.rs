use std::sync::Arc;

use hostlens_core::VersionRange;
use hostlens_model::{AccessError, ConstructorId, Modifiers, TypeEnv, Value};

use super::{
    find_member, flag_matches, render_sequence, resolve_chain, resolve_optional, sequence_matches,
    IntoType, Query, QueryCommon,
};
use crate::comparable::{Assignability, Boxing, ComparableType};
use crate::handle::{ArgsTransform, ConstructorHandle, Handle, Resolved, TypeHandle, ValueTransform};
use crate::{MemberCategory, ResolveError, Result};

/// Query for a constructor declared on the queried type. Constructors are never inherited.
#[derive(Clone)]
pub struct ConstructorQuery {
    common: QueryCommon<ConstructorQuery>,
    params: Option<Vec<ComparableType>>,
    call_transform: Option<ArgsTransform>,
    response_transform: Option<ValueTransform>,
}

impl ConstructorQuery {
    pub(crate) fn new(owner: TypeHandle) -> Self {
        Self {
            common: QueryCommon::new(owner),
            params: None,
            call_transform: None,
            response_transform: None,
        }
    }

    pub fn with_public(mut self, public: impl Into<Option<bool>>) -> Self {
        self.common.public = public.into();
        self
    }

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

    pub fn with_param_types(mut self, params: impl IntoIterator<Item = ComparableType>) -> Self {
        self.params = Some(params.into_iter().collect());
        self
    }

    pub fn with_no_parameters(mut self) -> Self {
        self.params = Some(Vec::new());
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

    pub fn or_else(mut self, fallback: ConstructorQuery) -> Self {
        self.common.fallbacks.push(fallback);
        self
    }

    pub fn depends_on<D: Resolved>(mut self, dependency: Option<&D>) -> Self {
        self.common.depends_on(dependency);
        self
    }

    pub fn with_call_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Vec<Value>, AccessError> + Send + Sync + 'static,
    {
        self.call_transform = Some(Arc::new(transform));
        self
    }

    /// Applied to every freshly constructed instance.
    pub fn with_response_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> Result<Value, AccessError> + Send + Sync + 'static,
    {
        self.response_transform = Some(Arc::new(transform));
        self
    }

    pub fn required(self) -> Result<ConstructorHandle> {
        resolve_chain(&self)
    }

    pub fn optional(self) -> Result<Option<ConstructorHandle>> {
        resolve_optional(&self)
    }

    fn accepts(&self, env: &dyn TypeEnv, ctor: ConstructorId) -> bool {
        let Some(def) = env.constructor(ctor) else {
            return false;
        };
        if !self.common.in_scope(env, ctor, false)
            || !flag_matches(self.common.public, def.modifiers, Modifiers::PUBLIC)
        {
            return false;
        }
        self.params
            .as_ref()
            .map_or(true, |params| sequence_matches(env, params, &def.params))
    }

    fn describe(&self) -> Vec<String> {
        let env = self.common.env();
        self.params
            .iter()
            .map(|params| format!("params=({})", render_sequence(env, params)))
            .collect()
    }
}

impl Query for ConstructorQuery {
    type Output = ConstructorHandle;

    const CATEGORY: MemberCategory = MemberCategory::Constructor;

    fn common(&self) -> &QueryCommon<Self> {
        &self.common
    }

    fn check_shape(&self) -> Result<()> {
        if self.params.is_none() {
            return Err(ResolveError::IncompleteQuery {
                category: Self::CATEGORY,
                target: self.common.owner.name(),
                reason: "a constructor query needs a parameter list",
            });
        }
        Ok(())
    }

    fn search(&self) -> Result<ConstructorHandle> {
        let ctor = find_member(
            &self.common,
            |env, ctor: ConstructorId| self.accepts(env, ctor),
            || self.describe(),
        )?;
        Ok(ConstructorHandle::new(
            Handle::new(ctor, self.common.owner.clone()),
            self.call_transform.clone(),
            self.response_transform.clone(),
        ))
    }
}
