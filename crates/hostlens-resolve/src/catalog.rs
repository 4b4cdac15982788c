use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use hostlens_config::NameRule;
use hostlens_core::{HostVersion, SymbolicId};
use hostlens_model::{TypeEnv, TypeId};

use crate::{ResolveError, Result};

type Resolver = Arc<dyn Fn(&HostVersion, &dyn TypeEnv) -> Option<TypeId> + Send + Sync>;

/// Symbolic identifier -> per-version resolver.
///
/// Resolvers are pure: they map a host version to the concrete host type, or to `None` when the
/// type does not exist on that release.
#[derive(Clone, Default)]
pub struct TypeCatalog {
    resolvers: HashMap<SymbolicId, Resolver>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an arbitrary resolver, replacing any previous one for `id`.
    pub fn register<F>(&mut self, id: impl Into<SymbolicId>, resolver: F)
    where
        F: Fn(&HostVersion, &dyn TypeEnv) -> Option<TypeId> + Send + Sync + 'static,
    {
        self.resolvers.insert(id.into(), Arc::new(resolver));
    }

    pub fn with<F>(mut self, id: impl Into<SymbolicId>, resolver: F) -> Self
    where
        F: Fn(&HostVersion, &dyn TypeEnv) -> Option<TypeId> + Send + Sync + 'static,
    {
        self.register(id, resolver);
        self
    }

    /// Register a resolver that computes a binary name and looks it up in the host.
    pub fn register_name<F>(&mut self, id: impl Into<SymbolicId>, name: F)
    where
        F: Fn(&HostVersion) -> Option<String> + Send + Sync + 'static,
    {
        self.register(id, move |version, env| env.lookup_type(&name(version)?));
    }

    /// Register ordered name rules. The first rule whose range contains the host version and
    /// whose expanded name is loaded wins.
    pub fn register_rules(&mut self, id: impl Into<SymbolicId>, rules: Vec<NameRule>) -> Result<()> {
        let id = id.into();
        let mut compiled = Vec::with_capacity(rules.len());
        for rule in rules {
            let range = rule
                .range()
                .map_err(|err| ResolveError::Configuration(format!("catalog.{id}: {err}")))?;
            compiled.push((range, rule));
        }

        self.register(id, move |version, env| {
            compiled
                .iter()
                .filter(|(range, _)| range.contains(version))
                .find_map(|(_, rule)| env.lookup_type(&rule.expand(version)))
        });
        Ok(())
    }

    /// A catalog built from the `[catalog]` configuration table.
    pub fn from_rules(table: &BTreeMap<String, Vec<NameRule>>) -> Result<Self> {
        let mut catalog = Self::new();
        for (id, rules) in table {
            catalog.register_rules(id.as_str(), rules.clone())?;
        }
        Ok(catalog)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.resolvers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &SymbolicId> {
        self.resolvers.keys()
    }

    pub(crate) fn evaluate(
        &self,
        id: &str,
        version: &HostVersion,
        env: &dyn TypeEnv,
    ) -> Option<Option<TypeId>> {
        let resolver = self.resolvers.get(id)?;
        Some(resolver(version, env))
    }
}

impl fmt::Debug for TypeCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.resolvers.keys().map(SymbolicId::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("TypeCatalog").field("ids", &ids).finish()
    }
}
