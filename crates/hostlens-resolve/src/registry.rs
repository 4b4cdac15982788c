use std::fmt;
use std::sync::Arc;

use hostlens_config::HostlensConfig;
use hostlens_core::{HostVersion, SymbolicId};
use hostlens_model::{Host, TypeId};

use crate::context::{ResolveContext, ResolveOptions};
use crate::handle::{EnumHandle, TypeHandle};
use crate::memo::OnceMap;
use crate::{ResolveError, Result, TypeCatalog};

/// Resolves symbolic type identifiers against one host at one version.
///
/// Outcomes (including absence) are computed at most once per identifier and served from the
/// cache afterwards; concurrent first lookups of the same identifier block on a single resolver
/// invocation.
pub struct TypeRegistry {
    ctx: Arc<ResolveContext>,
    catalog: TypeCatalog,
    resolved: OnceMap<SymbolicId, Result<TypeHandle>>,
    wrapped: OnceMap<TypeId, TypeHandle>,
}

impl TypeRegistry {
    pub fn new(host: Arc<dyn Host>, version: HostVersion, catalog: TypeCatalog) -> Self {
        Self::with_options(host, version, catalog, ResolveOptions::default())
    }

    pub fn with_options(
        host: Arc<dyn Host>,
        version: HostVersion,
        catalog: TypeCatalog,
        options: ResolveOptions,
    ) -> Self {
        tracing::debug!(%version, types = catalog.len(), "created type registry");
        Self {
            ctx: Arc::new(ResolveContext::new(host, version, options)),
            catalog,
            resolved: OnceMap::default(),
            wrapped: OnceMap::default(),
        }
    }

    /// A registry for `host` using the configured catalog and resolution options.
    ///
    /// `detected` (the version the host reports about itself) takes precedence over the
    /// configured `host_version`.
    pub fn from_config(
        host: Arc<dyn Host>,
        config: &HostlensConfig,
        detected: Option<HostVersion>,
    ) -> Result<Self> {
        let version = detected.or(config.host_version).ok_or_else(|| {
            ResolveError::Configuration(
                "host version was neither detected nor configured".to_owned(),
            )
        })?;
        let catalog = TypeCatalog::from_rules(&config.catalog)?;
        Ok(Self::with_options(
            host,
            version,
            catalog,
            ResolveOptions::from(&config.resolution),
        ))
    }

    pub fn host_version(&self) -> HostVersion {
        self.ctx.version
    }

    pub fn options(&self) -> ResolveOptions {
        self.ctx.options
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Resolve `id` to a host type. Absence is cached like success.
    pub fn resolve_type(&self, id: impl Into<SymbolicId>) -> Result<TypeHandle> {
        let id = id.into();
        if !self.catalog.contains(id.as_str()) {
            return Err(ResolveError::UnknownIdentifier(id));
        }
        self.resolved
            .get_or_init(id.clone(), || self.resolve_uncached(&id))
    }

    /// Like [`resolve_type`](Self::resolve_type), but an absent type is `Ok(None)`.
    /// Unregistered identifiers still fail.
    pub fn resolve_type_optional(&self, id: impl Into<SymbolicId>) -> Result<Option<TypeHandle>> {
        match self.resolve_type(id) {
            Ok(handle) => Ok(Some(handle)),
            Err(ResolveError::TypeAbsent { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn resolve_enum(&self, id: impl Into<SymbolicId>) -> Result<EnumHandle> {
        self.resolve_type(id)?.as_enum()
    }

    pub fn resolve_enum_optional(&self, id: impl Into<SymbolicId>) -> Result<Option<EnumHandle>> {
        self.resolve_type_optional(id)?
            .map(|ty| ty.as_enum())
            .transpose()
    }

    /// Handle for a type already known by id, bypassing the catalog.
    pub fn wrap(&self, id: TypeId) -> Option<TypeHandle> {
        self.ctx.env().type_def(id)?;
        Some(
            self.wrapped
                .get_or_init(id, || TypeHandle::new(id, Arc::clone(&self.ctx))),
        )
    }

    /// Handle for a type already known by binary name, bypassing the catalog.
    pub fn wrap_named(&self, binary_name: &str) -> Option<TypeHandle> {
        let id = self.ctx.env().lookup_type(binary_name)?;
        self.wrap(id)
    }

    /// The cached outcome for `id`, without resolving it.
    pub fn cached(&self, id: &SymbolicId) -> Option<Result<TypeHandle>> {
        self.resolved.get(id)
    }

    /// Number of identifiers with a cached outcome.
    pub fn cached_len(&self) -> usize {
        self.resolved.len()
    }

    fn resolve_uncached(&self, id: &SymbolicId) -> Result<TypeHandle> {
        let version = self.ctx.version;
        let found = self
            .catalog
            .evaluate(id.as_str(), &version, self.ctx.env())
            .flatten();
        match found {
            Some(ty) => {
                tracing::debug!(
                    %id,
                    %version,
                    ty = %self.ctx.type_name(ty),
                    "resolved type"
                );
                Ok(TypeHandle::new(ty, Arc::clone(&self.ctx)))
            }
            None => {
                tracing::debug!(%id, %version, "type is absent on this host");
                Err(ResolveError::TypeAbsent {
                    id: id.clone(),
                    version,
                })
            }
        }
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("version", &self.ctx.version)
            .field("catalog", &self.catalog)
            .field("cached", &self.resolved.len())
            .finish()
    }
}
