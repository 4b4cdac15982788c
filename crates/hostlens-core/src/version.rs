use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version of the host runtime the plugin is embedded in.
///
/// Ordering is by `(major, minor, release)` precedence. The host version is fixed for the lifetime
/// of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HostVersion {
    pub major: u16,
    pub minor: u16,
    pub release: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid host version `{input}`: {reason}")]
pub struct VersionParseError {
    pub input: String,
    pub reason: &'static str,
}

impl HostVersion {
    #[inline]
    pub const fn new(major: u16, minor: u16, release: u16) -> Self {
        Self {
            major,
            minor,
            release,
        }
    }

    /// Legacy package segment used by hosts that embed the release into their package names,
    /// e.g. `v1_8_R3`.
    pub fn package_token(&self) -> String {
        self.to_string()
    }

    fn parse_dotted(input: &str) -> Option<Self> {
        let mut parts = input.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        let release = match parts.next() {
            Some(part) => part.parse().ok()?,
            None => 0,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(major, minor, release))
    }

    fn parse_token(input: &str) -> Option<Self> {
        let rest = input.strip_prefix('v').unwrap_or(input);
        let mut parts = rest.split('_');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        let release = parts.next()?.strip_prefix('R')?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(major, minor, release))
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}_{}_R{}", self.major, self.minor, self.release)
    }
}

impl FromStr for HostVersion {
    type Err = VersionParseError;

    /// Accepts dotted versions (`1.19.3`, `1.19`) and package tokens (`v1_19_R3`, `1_19_R3`).
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(VersionParseError {
                input: input.to_owned(),
                reason: "empty version string",
            });
        }

        let parsed = if trimmed.contains('_') {
            Self::parse_token(trimmed)
        } else {
            Self::parse_dotted(trimmed)
        };

        parsed.ok_or_else(|| VersionParseError {
            input: input.to_owned(),
            reason: "expected `major.minor[.release]` or `vMAJOR_MINOR_RRELEASE`",
        })
    }
}

impl TryFrom<String> for HostVersion {
    type Error = VersionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HostVersion> for String {
    fn from(value: HostVersion) -> Self {
        format!("{}.{}.{}", value.major, value.minor, value.release)
    }
}
