use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Stable, version-independent name of a host type (e.g. `network_manager`).
///
/// Cheap to clone; compares by string content.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolicId(Arc<str>);

impl SymbolicId {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SymbolicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolicId({})", self.0)
    }
}

impl fmt::Display for SymbolicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SymbolicId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SymbolicId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SymbolicId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SymbolicId {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl From<&SymbolicId> for SymbolicId {
    fn from(value: &SymbolicId) -> Self {
        value.clone()
    }
}
