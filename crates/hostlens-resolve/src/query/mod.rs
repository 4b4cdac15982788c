//! Declarative member queries.
//!
//! A query accumulates constraints by value and is compiled into a single matcher only when
//! [`required`](FieldQuery::required) or [`optional`](FieldQuery::optional) runs. Resolution of a
//! query proceeds in a fixed order: shape check, version gate, dependency check, hierarchy walk.
//! Absence (out of range or no match) advances to the registered fallbacks in order; any other
//! failure propagates immediately.

use hostlens_core::VersionRange;
use hostlens_model::{Modifiers, PrimitiveType, Type, TypeEnv};

use crate::comparable::ComparableType;
use crate::handle::{Resolved, TypeHandle};
use crate::walker::{render_candidates, walk_hierarchy, Member, WalkDecision};
use crate::{MemberCategory, ResolveError, Result};

mod constructor;
mod field;
mod method;
mod nested;

pub use constructor::ConstructorQuery;
pub use field::FieldQuery;
pub use method::MethodQuery;
pub use nested::NestedTypeQuery;

/// Anything usable as a type constraint.
pub trait IntoType {
    fn into_type(self, env: &dyn TypeEnv) -> Type;
}

impl IntoType for Type {
    fn into_type(self, _env: &dyn TypeEnv) -> Type {
        self
    }
}

impl IntoType for &Type {
    fn into_type(self, _env: &dyn TypeEnv) -> Type {
        self.clone()
    }
}

impl IntoType for PrimitiveType {
    fn into_type(self, _env: &dyn TypeEnv) -> Type {
        Type::Primitive(self)
    }
}

impl IntoType for &TypeHandle {
    fn into_type(self, _env: &dyn TypeEnv) -> Type {
        self.as_type()
    }
}

impl IntoType for TypeHandle {
    fn into_type(self, _env: &dyn TypeEnv) -> Type {
        self.as_type()
    }
}

/// A type name: a binary name, a primitive keyword, `void`, a source-style array such as
/// `int[]`, or a `Class.getName()` array such as `[B` or `[Ljava.lang.String;`.
///
/// Unknown class names compare as opaque named types.
impl IntoType for &str {
    fn into_type(self, env: &dyn TypeEnv) -> Type {
        let name = self.trim();
        if let Some(component) = name.strip_suffix("[]") {
            return Type::array(component.into_type(env));
        }
        if let Some(component) = name.strip_prefix('[') {
            return array_name_component(env, component)
                .map(Type::array)
                .unwrap_or_else(|| Type::Named(name.to_owned()));
        }
        if name == "void" {
            return Type::Void;
        }
        if let Some(prim) = PrimitiveType::ALL.into_iter().find(|prim| prim.keyword() == name) {
            return Type::Primitive(prim);
        }
        match env.lookup_type(name) {
            Some(id) => Type::class(id, vec![]),
            None => Type::Named(name.to_owned()),
        }
    }
}

// Component of a `Class.getName()` array name, after its first `[`.
fn array_name_component(env: &dyn TypeEnv, component: &str) -> Option<Type> {
    if let Some(inner) = component.strip_prefix('[') {
        return array_name_component(env, inner).map(Type::array);
    }
    if let Some(class) = component.strip_prefix('L') {
        let class = class.strip_suffix(';')?;
        return (!class.is_empty()).then(|| class.replace('/', ".").as_str().into_type(env));
    }
    let mut chars = component.chars();
    match (chars.next(), chars.next()) {
        (Some(code), None) => PrimitiveType::from_descriptor(code).map(Type::Primitive),
        _ => None,
    }
}

/// State every query kind shares.
#[derive(Clone)]
pub(crate) struct QueryCommon<Q> {
    pub(crate) owner: TypeHandle,
    pub(crate) range: VersionRange,
    pub(crate) fallbacks: Vec<Q>,
    pub(crate) missing_dependency: bool,
    pub(crate) skip: usize,
    pub(crate) public: Option<bool>,
}

impl<Q> QueryCommon<Q> {
    pub(crate) fn new(owner: TypeHandle) -> Self {
        Self {
            owner,
            range: VersionRange::unbounded(),
            fallbacks: Vec::new(),
            missing_dependency: false,
            skip: 0,
            public: None,
        }
    }

    pub(crate) fn env(&self) -> &dyn TypeEnv {
        self.owner.ctx().env()
    }

    /// Whether `member` is declared on the queried type itself, or `inherited` allows ancestors.
    pub(crate) fn in_scope<M: Member>(&self, env: &dyn TypeEnv, member: M, inherited: bool) -> bool {
        inherited || member.declaring_type(env) == Some(self.owner.id())
    }

    pub(crate) fn depends_on<D: Resolved>(&mut self, dependency: Option<&D>) {
        match dependency {
            Some(dependency) => tracing::trace!(%dependency, "query dependency present"),
            None => self.missing_dependency = true,
        }
    }

    /// Constraints shared by every category.
    pub(crate) fn describe_into(&self, parts: &mut Vec<String>) {
        if let Some(public) = self.public {
            parts.push(format!("public={public}"));
        }
        if self.skip > 0 {
            parts.push(format!("skip={}", self.skip));
        }
    }
}

pub(crate) trait Query: Sized {
    type Output;

    const CATEGORY: MemberCategory;

    fn common(&self) -> &QueryCommon<Self>;

    /// Reject queries without a discriminating constraint.
    fn check_shape(&self) -> Result<()>;

    fn search(&self) -> Result<Self::Output>;
}

pub(crate) fn resolve_chain<Q: Query>(query: &Q) -> Result<Q::Output> {
    let mut last = match attempt(query) {
        Ok(output) => return Ok(output),
        Err(err) if err.is_absence() => err,
        Err(err) => return Err(err),
    };

    for (idx, fallback) in query.common().fallbacks.iter().enumerate() {
        tracing::trace!(
            category = %Q::CATEGORY,
            target = %query.common().owner.name(),
            fallback = idx,
            error = %last,
            "advancing to fallback query"
        );
        match resolve_chain(fallback) {
            Ok(output) => return Ok(output),
            Err(err) if err.is_absence() => last = err,
            Err(err) => return Err(err),
        }
    }
    Err(last)
}

pub(crate) fn resolve_optional<Q: Query>(query: &Q) -> Result<Option<Q::Output>> {
    match resolve_chain(query) {
        Ok(output) => Ok(Some(output)),
        Err(err) if err.is_absence() => Ok(None),
        Err(err) => Err(err),
    }
}

fn attempt<Q: Query>(query: &Q) -> Result<Q::Output> {
    query.check_shape()?;

    let common = query.common();
    let ctx = common.owner.ctx();
    if let Err(bound) = common.range.check(&ctx.version) {
        return Err(ResolveError::VersionMismatch {
            category: Q::CATEGORY,
            target: common.owner.name(),
            range: common.range,
            version: ctx.version,
            bound,
        });
    }
    if common.missing_dependency {
        return Err(ResolveError::DependencyMissing {
            category: Q::CATEGORY,
            target: common.owner.name(),
        });
    }
    query.search()
}

/// Walk the owner's hierarchy for the first member accepted by `accepts`, honouring the skip
/// count. `describe` renders the constraints for the not-found error.
pub(crate) fn find_member<M, Q>(
    common: &QueryCommon<Q>,
    accepts: impl Fn(&dyn TypeEnv, M) -> bool,
    describe: impl FnOnce() -> Vec<String>,
) -> Result<M>
where
    M: Member,
{
    let ctx = common.owner.ctx();
    let env = ctx.env();
    let start = common.owner.id();

    let found = walk_hierarchy::<M, _>(env, start, |member, skipped| {
        if !accepts(env, member) {
            WalkDecision::Reject
        } else if skipped < common.skip {
            WalkDecision::Skip
        } else {
            WalkDecision::Match
        }
    });
    if let Some(member) = found {
        return Ok(member);
    }

    let mut parts = describe();
    common.describe_into(&mut parts);
    let constraints = parts.join(", ");
    tracing::debug!(
        category = %M::CATEGORY,
        target = %common.owner.name(),
        %constraints,
        "no member satisfies the query"
    );

    let candidates = if ctx.options.list_candidates {
        render_candidates::<M>(env, start, ctx.options.max_listed_candidates)
    } else {
        Vec::new()
    };
    Err(ResolveError::NotFound {
        category: M::CATEGORY,
        target: common.owner.name(),
        constraints,
        version: ctx.version,
        candidates,
    })
}

pub(crate) fn flag_matches(expected: Option<bool>, modifiers: Modifiers, flag: u16) -> bool {
    expected.map_or(true, |expected| modifiers.contains(flag) == expected)
}

/// Positional comparison; lengths must agree exactly.
pub(crate) fn sequence_matches(
    env: &dyn TypeEnv,
    expected: &[ComparableType],
    actual: &[Type],
) -> bool {
    expected.len() == actual.len()
        && expected
            .iter()
            .zip(actual)
            .all(|(expected, actual)| expected.matches(env, actual))
}

pub(crate) fn render_sequence(env: &dyn TypeEnv, types: &[ComparableType]) -> String {
    types
        .iter()
        .map(|ty| ty.render(env))
        .collect::<Vec<_>>()
        .join(", ")
}
