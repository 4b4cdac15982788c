use std::fmt;

use hostlens_core::{HostVersion, SymbolicId, VersionOutOfRange, VersionRange};
use thiserror::Error;

pub type Result<T, E = ResolveError> = std::result::Result<T, E>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberCategory {
    Field,
    Method,
    Constructor,
    NestedType,
}

impl fmt::Display for MemberCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MemberCategory::Field => "field",
            MemberCategory::Method => "method",
            MemberCategory::Constructor => "constructor",
            MemberCategory::NestedType => "nested type",
        })
    }
}

/// Failure to resolve a type or member.
///
/// Errors are `Clone` so cached failures can be served to every later caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The query carries no discriminating constraint.
    #[error("incomplete {category} query on `{target}`: {reason}")]
    IncompleteQuery {
        category: MemberCategory,
        target: String,
        reason: &'static str,
    },

    #[error("{category} query on `{target}` is limited to {range}, but host {version} is {bound}")]
    VersionMismatch {
        category: MemberCategory,
        target: String,
        range: VersionRange,
        version: HostVersion,
        bound: VersionOutOfRange,
    },

    #[error(
        "no {category} of `{target}` matches [{constraints}] on host {version}{}",
        render_candidates(.candidates)
    )]
    NotFound {
        category: MemberCategory,
        target: String,
        constraints: String,
        version: HostVersion,
        candidates: Vec<String>,
    },

    #[error("{category} query on `{target}` declares a dependency that could not be resolved")]
    DependencyMissing {
        category: MemberCategory,
        target: String,
    },

    #[error("type `{id}` is not present on host {version}")]
    TypeAbsent { id: SymbolicId, version: HostVersion },

    #[error("no resolver is registered for type `{0}`")]
    UnknownIdentifier(SymbolicId),

    #[error("`{0}` is not an enumerated type")]
    NotAnEnum(String),

    #[error("enum `{type_name}` has no constant {constant}")]
    EnumConstantMissing { type_name: String, constant: String },

    #[error("enum `{type_name}` has {actual} constants, but its mirror declares {expected}")]
    EnumShapeMismatch {
        type_name: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl ResolveError {
    /// Whether the error means "the thing is not there" rather than "the request is wrong".
    ///
    /// Absence advances fallback chains and maps to `None` in optional lookups.
    pub fn is_absence(&self) -> bool {
        matches!(
            self,
            ResolveError::NotFound { .. } | ResolveError::VersionMismatch { .. }
        )
    }
}

fn render_candidates(candidates: &[String]) -> String {
    if candidates.is_empty() {
        return String::new();
    }
    let mut out = String::from("\navailable members:");
    for candidate in candidates {
        out.push_str("\n- ");
        out.push_str(candidate);
    }
    out
}
