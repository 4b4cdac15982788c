use crate::{
    AccessError, ConstructorDef, ConstructorId, EnumConstant, FieldDef, FieldId, MethodDef,
    MethodId, PrimitiveType, TypeDef, TypeId, Value,
};

/// Ids of the runtime types the engine needs to reason about assignability and boxing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellKnownTypes {
    pub object: TypeId,
    pub string: TypeId,
    pub number: TypeId,
    pub enum_base: TypeId,
    pub void_box: TypeId,
    pub boolean: TypeId,
    pub byte: TypeId,
    pub character: TypeId,
    pub short: TypeId,
    pub integer: TypeId,
    pub long: TypeId,
    pub float: TypeId,
    pub double: TypeId,
}

impl WellKnownTypes {
    pub fn box_of(&self, prim: PrimitiveType) -> TypeId {
        match prim {
            PrimitiveType::Boolean => self.boolean,
            PrimitiveType::Byte => self.byte,
            PrimitiveType::Char => self.character,
            PrimitiveType::Short => self.short,
            PrimitiveType::Int => self.integer,
            PrimitiveType::Long => self.long,
            PrimitiveType::Float => self.float,
            PrimitiveType::Double => self.double,
        }
    }

    pub fn primitive_of(&self, id: TypeId) -> Option<PrimitiveType> {
        PrimitiveType::ALL
            .into_iter()
            .find(|prim| self.box_of(*prim) == id)
    }
}

/// Read-only introspection of host types.
pub trait TypeEnv {
    fn type_def(&self, id: TypeId) -> Option<&TypeDef>;

    fn lookup_type(&self, name: &str) -> Option<TypeId>;

    fn well_known(&self) -> &WellKnownTypes;

    fn type_name(&self, id: TypeId) -> Option<&str> {
        self.type_def(id).map(|def| def.name.as_str())
    }

    fn field(&self, id: FieldId) -> Option<&FieldDef> {
        self.type_def(id.owner)?.fields.get(id.index as usize)
    }

    fn method(&self, id: MethodId) -> Option<&MethodDef> {
        self.type_def(id.owner)?.methods.get(id.index as usize)
    }

    fn constructor(&self, id: ConstructorId) -> Option<&ConstructorDef> {
        self.type_def(id.owner)?.constructors.get(id.index as usize)
    }

    /// Direct superclass, if it is known to this environment.
    fn super_class_of(&self, id: TypeId) -> Option<TypeId> {
        self.type_def(id)?.super_class.as_ref()?.class_id()
    }
}

/// Access primitives on live host values.
///
/// Static members ignore `target`; callers conventionally pass [`Value::Null`].
pub trait Host: TypeEnv + Send + Sync {
    fn read_field(&self, field: FieldId, target: &Value) -> Result<Value, AccessError>;

    fn write_field(&self, field: FieldId, target: &Value, value: Value) -> Result<(), AccessError>;

    fn invoke(&self, method: MethodId, target: &Value, args: Vec<Value>)
        -> Result<Value, AccessError>;

    fn construct(&self, ctor: ConstructorId, args: Vec<Value>) -> Result<Value, AccessError>;

    /// Constants of an enumerated type in ordinal order; `None` if `ty` is not an enum.
    fn enum_constants(&self, ty: TypeId) -> Option<Vec<EnumConstant>>;

    fn as_env(&self) -> &dyn TypeEnv;
}
