use std::fmt;
use std::ops::Deref;

use hostlens_model::{AccessError, MethodDef, MethodId, Value};

use super::{ArgsTransform, Handle, Resolved, ValueTransform};

/// A resolved method. Invocation dispatches virtually on the receiver.
#[derive(Clone)]
pub struct MethodHandle {
    handle: Handle<MethodId>,
    call_transform: Option<ArgsTransform>,
    response_transform: Option<ValueTransform>,
}

impl MethodHandle {
    pub(crate) fn new(
        handle: Handle<MethodId>,
        call_transform: Option<ArgsTransform>,
        response_transform: Option<ValueTransform>,
    ) -> Self {
        Self {
            handle,
            call_transform,
            response_transform,
        }
    }

    pub fn id(&self) -> MethodId {
        self.handle.member()
    }

    pub fn def(&self) -> Option<&MethodDef> {
        self.handle.owner().ctx().env().method(self.id())
    }

    pub fn is_static(&self) -> bool {
        self.def().is_some_and(|def| def.modifiers.is_static())
    }

    /// Invoke on `target` ([`Value::Null`] for static methods). Exceptions raised by the host
    /// surface as [`AccessError::Thrown`].
    pub fn invoke(&self, target: &Value, args: Vec<Value>) -> Result<Value, AccessError> {
        let args = match &self.call_transform {
            Some(transform) => transform(args)?,
            None => args,
        };
        let result = self
            .handle
            .owner()
            .ctx()
            .host
            .invoke(self.id(), target, args)?;
        match &self.response_transform {
            Some(transform) => transform(result),
            None => Ok(result),
        }
    }
}

impl Deref for MethodHandle {
    type Target = Handle<MethodId>;

    fn deref(&self) -> &Self::Target {
        &self.handle
    }
}

impl PartialEq for MethodHandle {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for MethodHandle {}

impl fmt::Display for MethodHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.handle, f)
    }
}

impl fmt::Debug for MethodHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodHandle")
            .field("method", &self.id())
            .finish_non_exhaustive()
    }
}

impl Resolved for MethodHandle {}
