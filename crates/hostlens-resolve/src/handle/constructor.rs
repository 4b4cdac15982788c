use std::fmt;
use std::ops::Deref;

use hostlens_model::{AccessError, ConstructorDef, ConstructorId, Value};

use super::{ArgsTransform, Handle, Resolved, ValueTransform};

#[derive(Clone)]
pub struct ConstructorHandle {
    handle: Handle<ConstructorId>,
    call_transform: Option<ArgsTransform>,
    response_transform: Option<ValueTransform>,
}

impl ConstructorHandle {
    pub(crate) fn new(
        handle: Handle<ConstructorId>,
        call_transform: Option<ArgsTransform>,
        response_transform: Option<ValueTransform>,
    ) -> Self {
        Self {
            handle,
            call_transform,
            response_transform,
        }
    }

    pub fn id(&self) -> ConstructorId {
        self.handle.member()
    }

    pub fn def(&self) -> Option<&ConstructorDef> {
        self.handle.owner().ctx().env().constructor(self.id())
    }

    pub fn parameter_count(&self) -> usize {
        self.def().map_or(0, |def| def.params.len())
    }

    pub fn new_instance(&self, args: Vec<Value>) -> Result<Value, AccessError> {
        let args = match &self.call_transform {
            Some(transform) => transform(args)?,
            None => args,
        };
        let instance = self.handle.owner().ctx().host.construct(self.id(), args)?;
        match &self.response_transform {
            Some(transform) => transform(instance),
            None => Ok(instance),
        }
    }
}

impl Deref for ConstructorHandle {
    type Target = Handle<ConstructorId>;

    fn deref(&self) -> &Self::Target {
        &self.handle
    }
}

impl PartialEq for ConstructorHandle {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for ConstructorHandle {}

impl fmt::Display for ConstructorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.handle, f)
    }
}

impl fmt::Debug for ConstructorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorHandle")
            .field("constructor", &self.id())
            .finish_non_exhaustive()
    }
}

impl Resolved for ConstructorHandle {}
