//! Configuration for hostlens: host version, logging, resolution behaviour and the type catalog.
//!
//! ```toml
//! host_version = "1.19.3"
//!
//! [logging]
//! level = "debug"
//!
//! [resolution]
//! list_candidates = true
//!
//! [[catalog.network_manager]]
//! name = "net.minecraft.network.NetworkManager"
//! min = "1.17"
//! ```

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::path::Path;

use hostlens_core::{HostVersion, InvalidVersionRange, VersionRange};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod logging;

pub use logging::{global_log_buffer, init_tracing, LogBuffer, LoggingConfig};

/// Token replaced by the host's legacy package segment (e.g. `v1_8_R3`) in catalog names.
pub const VERSION_TOKEN: &str = "{version}";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
    #[error("invalid configuration: {}", .messages.join("; "))]
    Invalid { messages: Vec<String> },
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Toml(value.message().to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// Attach the rendered candidate listing to not-found errors.
    #[serde(default = "ResolutionConfig::default_list_candidates")]
    pub list_candidates: bool,

    /// Upper bound on candidates rendered into a single error.
    #[serde(default = "ResolutionConfig::default_max_listed_candidates")]
    pub max_listed_candidates: usize,

    /// Reject lookups by analog when the mirrored enumeration has a different constant count.
    #[serde(default)]
    pub verify_enum_copies: bool,
}

impl ResolutionConfig {
    fn default_list_candidates() -> bool {
        true
    }

    fn default_max_listed_candidates() -> usize {
        256
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            list_candidates: Self::default_list_candidates(),
            max_listed_candidates: Self::default_max_listed_candidates(),
            verify_enum_copies: false,
        }
    }
}

/// One candidate host type name for a symbolic identifier, valid within `[min, max]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRule {
    /// Binary name; may contain [`VERSION_TOKEN`].
    pub name: String,
    #[serde(default)]
    pub min: Option<HostVersion>,
    #[serde(default)]
    pub max: Option<HostVersion>,
}

impl NameRule {
    pub fn range(&self) -> Result<VersionRange, InvalidVersionRange> {
        VersionRange::new(self.min, self.max)
    }

    /// The binary name with [`VERSION_TOKEN`] expanded for `version`.
    pub fn expand(&self, version: &HostVersion) -> String {
        self.name.replace(VERSION_TOKEN, &version.package_token())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostlensConfig {
    /// Version of the running host. Hosts usually detect this themselves and override it.
    #[serde(default)]
    pub host_version: Option<HostVersion>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub resolution: ResolutionConfig,
    /// Symbolic identifier -> ordered name rules.
    #[serde(default)]
    pub catalog: BTreeMap<String, Vec<NameRule>>,
}

impl HostlensConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::load_from_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded hostlens config");
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let config: HostlensConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut messages = Vec::new();

        if self.resolution.max_listed_candidates == 0 && self.resolution.list_candidates {
            messages.push(
                "resolution.max_listed_candidates must be at least 1 when list_candidates is enabled"
                    .to_owned(),
            );
        }
        if self.logging.buffer_lines == 0 {
            messages.push("logging.buffer_lines must be at least 1".to_owned());
        }

        for (id, rules) in &self.catalog {
            if id.trim().is_empty() {
                messages.push("catalog identifiers must not be empty".to_owned());
            }
            if rules.is_empty() {
                messages.push(format!("catalog.{id} has no name rules"));
            }
            for (idx, rule) in rules.iter().enumerate() {
                if rule.name.trim().is_empty() {
                    messages.push(format!("catalog.{id}[{idx}].name must not be empty"));
                }
                if let Err(err) = rule.range() {
                    messages.push(format!("catalog.{id}[{idx}]: {err}"));
                }
            }
        }

        if messages.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid { messages })
        }
    }
}
