use std::fmt;
use std::sync::Arc;

use hostlens_config::ResolutionConfig;
use hostlens_core::HostVersion;
use hostlens_model::{EnumConstant, Host, TypeEnv, TypeId};

use crate::memo::OnceMap;
use crate::ResolveError;

/// Knobs that shape resolution errors and enum lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    pub list_candidates: bool,
    pub max_listed_candidates: usize,
    pub verify_enum_copies: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self::from(&ResolutionConfig::default())
    }
}

impl From<&ResolutionConfig> for ResolveOptions {
    fn from(config: &ResolutionConfig) -> Self {
        Self {
            list_candidates: config.list_candidates,
            max_listed_candidates: config.max_listed_candidates,
            verify_enum_copies: config.verify_enum_copies,
        }
    }
}

pub(crate) type EnumConstants = Result<Arc<[EnumConstant]>, ResolveError>;

/// State shared by a registry and every handle it hands out.
///
/// Holds no handles itself, so handles can keep it alive without forming cycles.
pub(crate) struct ResolveContext {
    pub(crate) host: Arc<dyn Host>,
    pub(crate) version: HostVersion,
    pub(crate) options: ResolveOptions,
    pub(crate) enums: OnceMap<TypeId, EnumConstants>,
}

impl ResolveContext {
    pub(crate) fn new(host: Arc<dyn Host>, version: HostVersion, options: ResolveOptions) -> Self {
        Self {
            host,
            version,
            options,
            enums: OnceMap::default(),
        }
    }

    pub(crate) fn env(&self) -> &dyn TypeEnv {
        self.host.as_env()
    }

    pub(crate) fn type_name(&self, id: TypeId) -> String {
        self.env()
            .type_name(id)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("{id:?}"))
    }

    /// Constants of `ty`, read from the host once and cached.
    pub(crate) fn enum_constants(&self, ty: TypeId) -> EnumConstants {
        self.enums.get_or_init(ty, || {
            let constants = self
                .host
                .enum_constants(ty)
                .ok_or_else(|| ResolveError::NotAnEnum(self.type_name(ty)))?;
            tracing::debug!(
                ty = %self.type_name(ty),
                constants = constants.len(),
                "cached enum constants"
            );
            Ok(constants.into())
        })
    }
}

impl fmt::Debug for ResolveContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveContext")
            .field("version", &self.version)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
