use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{is_assignable, FieldId, PrimitiveType, Type, TypeEnv, TypeId};

/// A live host value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Byte(i8),
    Char(char),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(Arc<str>),
    Object(ObjectRef),
    Enum(EnumConstant),
    Array(Arc<ArrayValue>),
}

impl Value {
    pub fn str(value: impl AsRef<str>) -> Self {
        Value::Str(Arc::from(value.as_ref()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    fn primitive(&self) -> Option<PrimitiveType> {
        Some(match self {
            Value::Bool(_) => PrimitiveType::Boolean,
            Value::Byte(_) => PrimitiveType::Byte,
            Value::Char(_) => PrimitiveType::Char,
            Value::Short(_) => PrimitiveType::Short,
            Value::Int(_) => PrimitiveType::Int,
            Value::Long(_) => PrimitiveType::Long,
            Value::Float(_) => PrimitiveType::Float,
            Value::Double(_) => PrimitiveType::Double,
            _ => return None,
        })
    }
}

impl From<EnumConstant> for Value {
    fn from(value: EnumConstant) -> Self {
        Value::Enum(value)
    }
}

impl From<ObjectRef> for Value {
    fn from(value: ObjectRef) -> Self {
        Value::Object(value)
    }
}

/// Heap instance of a host class. Field storage is shared between clones of the reference.
pub struct Instance {
    ty: TypeId,
    fields: RwLock<HashMap<FieldId, Value>>,
}

impl Instance {
    pub fn ty(&self) -> TypeId {
        self.ty
    }

    /// Stored value of `field`, or `None` if it was never written.
    pub fn load(&self, field: FieldId) -> Option<Value> {
        self.fields.read().get(&field).cloned()
    }

    pub fn store(&self, field: FieldId, value: Value) {
        self.fields.write().insert(field, value);
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("ty", &self.ty)
            .finish_non_exhaustive()
    }
}

/// Reference to an [`Instance`]; equality is identity.
#[derive(Debug, Clone)]
pub struct ObjectRef(Arc<Instance>);

impl ObjectRef {
    pub fn new(ty: TypeId) -> Self {
        Self(Arc::new(Instance {
            ty,
            fields: RwLock::new(HashMap::new()),
        }))
    }
}

impl std::ops::Deref for ObjectRef {
    type Target = Instance;

    fn deref(&self) -> &Instance {
        &self.0
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumConstant {
    pub ty: TypeId,
    pub ordinal: u32,
    pub name: Arc<str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    pub component: Type,
    pub items: Vec<Value>,
}

/// The zero value a field of type `ty` holds before it is first written.
pub fn default_value(ty: &Type) -> Value {
    match ty {
        Type::Primitive(prim) => match prim {
            PrimitiveType::Boolean => Value::Bool(false),
            PrimitiveType::Byte => Value::Byte(0),
            PrimitiveType::Char => Value::Char('\0'),
            PrimitiveType::Short => Value::Short(0),
            PrimitiveType::Int => Value::Int(0),
            PrimitiveType::Long => Value::Long(0),
            PrimitiveType::Float => Value::Float(0.0),
            PrimitiveType::Double => Value::Double(0.0),
        },
        _ => Value::Null,
    }
}

/// Runtime (boxed, erased) type of a value; `None` for `null`.
pub fn runtime_type(env: &dyn TypeEnv, value: &Value) -> Option<Type> {
    let wk = env.well_known();
    if let Some(prim) = value.primitive() {
        return Some(Type::class(wk.box_of(prim), vec![]));
    }
    match value {
        Value::Str(_) => Some(Type::class(wk.string, vec![])),
        Value::Object(obj) => Some(Type::class(obj.ty(), vec![])),
        Value::Enum(constant) => Some(Type::class(constant.ty, vec![])),
        Value::Array(array) => Some(Type::array(array.component.clone())),
        _ => None,
    }
}

/// Whether `value` may be stored in a slot declared as `expected`.
///
/// Primitive values are accepted by their own primitive type and, boxed, by any reference type
/// their box is assignable to.
pub fn value_conforms(env: &dyn TypeEnv, value: &Value, expected: &Type) -> bool {
    if let Some(prim) = value.primitive() {
        if expected == &Type::Primitive(prim) {
            return true;
        }
    }
    match runtime_type(env, value) {
        None => expected.is_reference(),
        Some(actual) => expected.is_reference() && is_assignable(env, &actual, expected),
    }
}
