use hostlens_model::{format_type, is_assignable, unboxed, Type, TypeEnv, WildcardBound};

/// How primitive and box types relate when comparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Boxing {
    /// `int` and `java.lang.Integer` are different types.
    #[default]
    Exact,
    /// `int` and `java.lang.Integer` are interchangeable.
    IgnoreBoxing,
}

/// Direction of an assignability comparison between a query's target type and a candidate's
/// declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Assignability {
    /// The erased types must be equal.
    #[default]
    None,
    /// A value of the target type could be supplied where the candidate type is expected.
    CandidateAcceptsTarget,
    /// A value of the candidate type could be supplied where the target type is expected.
    TargetAcceptsCandidate,
}

/// "Is this candidate type acceptable?"
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComparableType {
    target: Type,
    boxing: Boxing,
    assignability: Assignability,
}

impl ComparableType {
    /// With [`Boxing::IgnoreBoxing`] the stored target is normalised to its unboxed form.
    pub fn new(
        env: &dyn TypeEnv,
        target: Type,
        boxing: Boxing,
        assignability: Assignability,
    ) -> Self {
        let target = match boxing {
            Boxing::Exact => target,
            Boxing::IgnoreBoxing => unboxed(env, &target),
        };
        Self {
            target,
            boxing,
            assignability,
        }
    }

    pub fn exact(target: Type) -> Self {
        Self {
            target,
            boxing: Boxing::Exact,
            assignability: Assignability::None,
        }
    }

    pub fn target(&self) -> &Type {
        &self.target
    }

    pub fn matches(&self, env: &dyn TypeEnv, candidate: &Type) -> bool {
        let candidate = match candidate {
            Type::Wildcard(WildcardBound::Extends(bound) | WildcardBound::Super(bound)) => {
                (**bound).clone()
            }
            Type::Wildcard(WildcardBound::Unbounded) => {
                Type::class(env.well_known().object, vec![])
            }
            other => other.clone(),
        };
        let candidate = match self.boxing {
            Boxing::Exact => candidate,
            Boxing::IgnoreBoxing => unboxed(env, &candidate),
        };

        match self.assignability {
            Assignability::None => {
                let wk = env.well_known();
                candidate.erasure(wk) == self.target.erasure(wk)
            }
            Assignability::CandidateAcceptsTarget => is_assignable(env, &self.target, &candidate),
            Assignability::TargetAcceptsCandidate => is_assignable(env, &candidate, &self.target),
        }
    }

    pub(crate) fn render(&self, env: &dyn TypeEnv) -> String {
        let mut out = format_type(env, &self.target);
        match self.assignability {
            Assignability::None => {}
            Assignability::CandidateAcceptsTarget => out.insert_str(0, "accepts "),
            Assignability::TargetAcceptsCandidate => out.insert_str(0, "assignable to "),
        }
        if self.boxing == Boxing::IgnoreBoxing {
            out.push_str(" (boxing ignored)");
        }
        out
    }
}
