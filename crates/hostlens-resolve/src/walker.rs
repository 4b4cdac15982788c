use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use hostlens_model::{TypeEnv, TypeId};

use crate::MemberCategory;

/// Verdict of a matcher on one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkDecision {
    Match,
    Reject,
    /// The candidate satisfies every constraint but is skipped; the skip counter advances.
    Skip,
}

/// A member category the hierarchy walker can enumerate.
pub trait Member: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    const CATEGORY: MemberCategory;

    /// Whether ancestors of the queried type are searched at all.
    const INHERITED: bool;

    /// Members declared directly on `ty`, in declaration order.
    fn own_members(env: &dyn TypeEnv, ty: TypeId) -> Vec<Self>;

    fn declaring_type(self, env: &dyn TypeEnv) -> Option<TypeId>;

    fn render(self, env: &dyn TypeEnv) -> String;
}

/// `start` followed by its superclass chain.
///
/// The universal root type is never visited, not even as `start`. Non-inheriting categories only
/// see `start`.
pub fn hierarchy(env: &dyn TypeEnv, start: TypeId, inherited: bool) -> Vec<TypeId> {
    let root = env.well_known().object;
    if start == root {
        return Vec::new();
    }
    let mut levels = vec![start];
    if !inherited {
        return levels;
    }

    let mut seen = HashSet::from([start]);
    let mut current = start;
    while let Some(parent) = env.super_class_of(current) {
        if parent == root || !seen.insert(parent) {
            break;
        }
        levels.push(parent);
        current = parent;
    }
    levels
}

/// Walk `start` and its ancestors level by level, feeding every member to `matcher` together
/// with the number of skipped matches so far.
pub fn walk_hierarchy<M, F>(env: &dyn TypeEnv, start: TypeId, mut matcher: F) -> Option<M>
where
    M: Member,
    F: FnMut(M, usize) -> WalkDecision,
{
    let mut skipped = 0usize;
    for level in hierarchy(env, start, M::INHERITED) {
        for member in M::own_members(env, level) {
            match matcher(member, skipped) {
                WalkDecision::Match => return Some(member),
                WalkDecision::Reject => {}
                WalkDecision::Skip => skipped += 1,
            }
        }
    }
    None
}

/// Every member the walk from `start` visits, rendered, at most `limit` entries.
pub fn render_candidates<M: Member>(env: &dyn TypeEnv, start: TypeId, limit: usize) -> Vec<String> {
    hierarchy(env, start, M::INHERITED)
        .into_iter()
        .flat_map(|level| M::own_members(env, level))
        .take(limit)
        .map(|member| member.render(env))
        .collect()
}
