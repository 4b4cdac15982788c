use hostlens_core::VersionRange;
use hostlens_model::{format_type, is_assignable, Modifiers, Type, TypeEnv};

use super::{find_member, flag_matches, resolve_chain, resolve_optional, IntoType, Query, QueryCommon};
use crate::handle::TypeHandle;
use crate::member::NestedType;
use crate::{MemberCategory, ResolveError, Result};

/// Query for a type declared inside the queried type or one of its superclasses.
///
/// Names compare against the simple name (the part after the last `$`), case-sensitively.
#[derive(Clone)]
pub struct NestedTypeQuery {
    common: QueryCommon<NestedTypeQuery>,
    is_static: Option<bool>,
    name: Option<String>,
    supertype: Option<Type>,
    skip_names: Vec<String>,
    inherited: bool,
}

impl NestedTypeQuery {
    pub(crate) fn new(owner: TypeHandle) -> Self {
        Self {
            common: QueryCommon::new(owner),
            is_static: None,
            name: None,
            supertype: None,
            skip_names: Vec::new(),
            inherited: true,
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

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Only nested types assignable to `ty`.
    pub fn with_supertype(mut self, ty: impl IntoType) -> Self {
        self.supertype = Some(ty.into_type(self.common.env()));
        self
    }

    /// Never match nested types with these simple names.
    pub fn skip_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_names.extend(names.into_iter().map(Into::into));
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

    pub fn or_else(mut self, fallback: NestedTypeQuery) -> Self {
        self.common.fallbacks.push(fallback);
        self
    }

    pub fn required(self) -> Result<TypeHandle> {
        resolve_chain(&self)
    }

    pub fn optional(self) -> Result<Option<TypeHandle>> {
        resolve_optional(&self)
    }

    fn accepts(&self, env: &dyn TypeEnv, nested: NestedType) -> bool {
        let Some(def) = env.type_def(nested.0) else {
            return false;
        };
        if !self.common.in_scope(env, nested, self.inherited) {
            return false;
        }
        if !flag_matches(self.is_static, def.modifiers, Modifiers::STATIC)
            || !flag_matches(self.common.public, def.modifiers, Modifiers::PUBLIC)
        {
            return false;
        }
        let simple_name = def.simple_name();
        if let Some(name) = &self.name {
            if simple_name != name {
                return false;
            }
        }
        if self.skip_names.iter().any(|skip| skip == simple_name) {
            return false;
        }
        if let Some(supertype) = &self.supertype {
            if !is_assignable(env, &Type::class(nested.0, vec![]), supertype) {
                return false;
            }
        }
        true
    }

    fn describe(&self) -> Vec<String> {
        let mut parts = Vec::new();
        if let Some(is_static) = self.is_static {
            parts.push(format!("static={is_static}"));
        }
        if let Some(name) = &self.name {
            parts.push(format!("name={name}"));
        }
        if !self.skip_names.is_empty() {
            parts.push(format!("skip_names=[{}]", self.skip_names.join(", ")));
        }
        if let Some(supertype) = &self.supertype {
            parts.push(format!(
                "supertype={}",
                format_type(self.common.env(), supertype)
            ));
        }
        parts.push(format!("inherited={}", self.inherited));
        parts
    }
}

impl Query for NestedTypeQuery {
    type Output = TypeHandle;

    const CATEGORY: MemberCategory = MemberCategory::NestedType;

    fn common(&self) -> &QueryCommon<Self> {
        &self.common
    }

    fn check_shape(&self) -> Result<()> {
        let discriminated = self.name.is_some()
            || self.supertype.is_some()
            || self.is_static.is_some()
            || self.common.public.is_some();
        if !discriminated {
            return Err(ResolveError::IncompleteQuery {
                category: Self::CATEGORY,
                target: self.common.owner.name(),
                reason: "a nested type query needs a name, a supertype or a modifier",
            });
        }
        Ok(())
    }

    fn search(&self) -> Result<TypeHandle> {
        let nested = find_member(
            &self.common,
            |env, nested: NestedType| self.accepts(env, nested),
            || self.describe(),
        )?;
        Ok(self.common.owner.sibling(nested.0))
    }
}
