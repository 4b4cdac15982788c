use std::fmt;
use std::sync::Arc;

use hostlens_model::EnumConstant;

use super::{Resolved, TypeHandle};
use crate::{ResolveError, Result};

/// A caller-side mirror of a host enumeration.
///
/// Mirrors are matched purely by ordinal; declaring the constants in host order is the
/// implementor's responsibility.
pub trait EnumCopy {
    fn ordinal(&self) -> usize;

    /// Number of constants the mirror declares.
    fn variant_count() -> usize;
}

/// A host enumeration with its constants in ordinal order.
#[derive(Clone)]
pub struct EnumHandle {
    ty: TypeHandle,
    constants: Arc<[EnumConstant]>,
}

impl EnumHandle {
    pub(crate) fn new(ty: TypeHandle, constants: Arc<[EnumConstant]>) -> Self {
        Self { ty, constants }
    }

    pub fn type_handle(&self) -> &TypeHandle {
        &self.ty
    }

    pub fn constants(&self) -> &[EnumConstant] {
        &self.constants
    }

    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    /// Whether both handles share the same cached constant list.
    pub fn shares_constants(&self, other: &EnumHandle) -> bool {
        Arc::ptr_eq(&self.constants, &other.constants)
    }

    pub fn get_by_ordinal(&self, ordinal: usize) -> Result<&EnumConstant> {
        self.constants
            .get(ordinal)
            .ok_or_else(|| self.missing(format!("#{ordinal}")))
    }

    pub fn get_by_name(&self, name: &str) -> Result<&EnumConstant> {
        self.constants
            .iter()
            .find(|constant| &*constant.name == name)
            .ok_or_else(|| self.missing(name.to_owned()))
    }

    /// The constant sharing `copy`'s ordinal.
    pub fn get_by_copy<E: EnumCopy>(&self, copy: &E) -> Result<&EnumConstant> {
        self.check_shape(E::variant_count())?;
        self.get_by_ordinal(copy.ordinal())
    }

    /// The constant sharing the ordinal of a constant of another host enumeration.
    pub fn get_by_analog(&self, analog: &EnumConstant) -> Result<&EnumConstant> {
        if self.ty.ctx().options.verify_enum_copies {
            let other = self.ty.ctx().enum_constants(analog.ty)?;
            self.check_shape(other.len())?;
        }
        self.get_by_ordinal(analog.ordinal as usize)
    }

    fn check_shape(&self, expected: usize) -> Result<()> {
        if !self.ty.ctx().options.verify_enum_copies || expected == self.len() {
            return Ok(());
        }
        Err(ResolveError::EnumShapeMismatch {
            type_name: self.ty.name(),
            expected,
            actual: self.len(),
        })
    }

    fn missing(&self, constant: String) -> ResolveError {
        ResolveError::EnumConstantMissing {
            type_name: self.ty.name(),
            constant,
        }
    }
}

impl PartialEq for EnumHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
    }
}

impl Eq for EnumHandle {}

impl fmt::Display for EnumHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.ty, f)
    }
}

impl fmt::Debug for EnumHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumHandle")
            .field("ty", &self.ty.name())
            .field("constants", &self.constants.len())
            .finish()
    }
}

impl Resolved for EnumHandle {}
