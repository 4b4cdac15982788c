use std::fmt;

use thiserror::Error;

use crate::HostVersion;

/// Inclusive range of host versions a query is valid for. Either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VersionRange {
    min: Option<HostVersion>,
    max: Option<HostVersion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("minimum version {min} is greater than maximum version {max}")]
pub struct InvalidVersionRange {
    pub min: HostVersion,
    pub max: HostVersion,
}

/// Which side of a [`VersionRange`] a host version fell out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionOutOfRange {
    Below { min: HostVersion },
    Above { max: HostVersion },
}

impl VersionRange {
    pub fn new(
        min: Option<HostVersion>,
        max: Option<HostVersion>,
    ) -> Result<Self, InvalidVersionRange> {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(InvalidVersionRange { min, max });
            }
        }
        Ok(Self { min, max })
    }

    pub const fn unbounded() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    pub const fn since(min: HostVersion) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub const fn until(max: HostVersion) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub fn min(&self) -> Option<HostVersion> {
        self.min
    }

    pub fn max(&self) -> Option<HostVersion> {
        self.max
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, version: &HostVersion) -> bool {
        self.check(version).is_ok()
    }

    pub fn check(&self, version: &HostVersion) -> Result<(), VersionOutOfRange> {
        if let Some(max) = self.max {
            if *version > max {
                return Err(VersionOutOfRange::Above { max });
            }
        }
        if let Some(min) = self.min {
            if *version < min {
                return Err(VersionOutOfRange::Below { min });
            }
        }
        Ok(())
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        match &self.min {
            Some(min) => write!(f, "{min}")?,
            None => f.write_str("*")?,
        }
        f.write_str(", ")?;
        match &self.max {
            Some(max) => write!(f, "{max}")?,
            None => f.write_str("*")?,
        }
        f.write_str("]")
    }
}

impl fmt::Display for VersionOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionOutOfRange::Below { min } => write!(f, "lower than the minimum {min}"),
            VersionOutOfRange::Above { max } => write!(f, "higher than the maximum {max}"),
        }
    }
}
