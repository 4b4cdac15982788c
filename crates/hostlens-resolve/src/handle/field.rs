use std::fmt;
use std::ops::Deref;

use hostlens_model::{AccessError, FieldDef, FieldId, Value};

use super::{Handle, Resolved, ValueTransform};

/// A resolved field.
///
/// `get` applies the result transform after the raw read; `set` applies the value transform
/// before the raw write.
#[derive(Clone)]
pub struct FieldHandle {
    handle: Handle<FieldId>,
    value_transform: Option<ValueTransform>,
    result_transform: Option<ValueTransform>,
}

impl FieldHandle {
    pub(crate) fn new(
        handle: Handle<FieldId>,
        value_transform: Option<ValueTransform>,
        result_transform: Option<ValueTransform>,
    ) -> Self {
        Self {
            handle,
            value_transform,
            result_transform,
        }
    }

    pub fn id(&self) -> FieldId {
        self.handle.member()
    }

    pub fn def(&self) -> Option<&FieldDef> {
        self.handle.owner().ctx().env().field(self.id())
    }

    pub fn is_static(&self) -> bool {
        self.def().is_some_and(|def| def.modifiers.is_static())
    }

    /// Read the field of `target` ([`Value::Null`] for static fields).
    pub fn get(&self, target: &Value) -> Result<Value, AccessError> {
        let raw = self.handle.owner().ctx().host.read_field(self.id(), target)?;
        match &self.result_transform {
            Some(transform) => transform(raw),
            None => Ok(raw),
        }
    }

    /// Write `value` into the field of `target` ([`Value::Null`] for static fields).
    pub fn set(&self, target: &Value, value: Value) -> Result<(), AccessError> {
        let value = match &self.value_transform {
            Some(transform) => transform(value)?,
            None => value,
        };
        self.handle
            .owner()
            .ctx()
            .host
            .write_field(self.id(), target, value)
    }
}

impl Deref for FieldHandle {
    type Target = Handle<FieldId>;

    fn deref(&self) -> &Self::Target {
        &self.handle
    }
}

impl PartialEq for FieldHandle {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for FieldHandle {}

impl fmt::Display for FieldHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.handle, f)
    }
}

impl fmt::Debug for FieldHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldHandle")
            .field("field", &self.id())
            .field("transformed", &(self.value_transform.is_some() || self.result_transform.is_some()))
            .finish()
    }
}

impl Resolved for FieldHandle {}
