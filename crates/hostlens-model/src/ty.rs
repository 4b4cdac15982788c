use std::fmt;
use std::sync::Arc;

use crate::{TypeId, WellKnownTypes};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Char,
        PrimitiveType::Short,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    /// The primitive a descriptor code stands for (`I` is `int`, `Z` is `boolean`).
    pub fn from_descriptor(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|prim| prim.descriptor() == code)
    }

    pub fn descriptor(self) -> char {
        match self {
            PrimitiveType::Boolean => 'Z',
            PrimitiveType::Byte => 'B',
            PrimitiveType::Char => 'C',
            PrimitiveType::Short => 'S',
            PrimitiveType::Int => 'I',
            PrimitiveType::Long => 'J',
            PrimitiveType::Float => 'F',
            PrimitiveType::Double => 'D',
        }
    }

    /// Binary name of the reference type this primitive boxes to.
    pub fn box_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "java.lang.Boolean",
            PrimitiveType::Byte => "java.lang.Byte",
            PrimitiveType::Char => "java.lang.Character",
            PrimitiveType::Short => "java.lang.Short",
            PrimitiveType::Int => "java.lang.Integer",
            PrimitiveType::Long => "java.lang.Long",
            PrimitiveType::Float => "java.lang.Float",
            PrimitiveType::Double => "java.lang.Double",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassType {
    pub def: TypeId,
    pub args: Vec<Type>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WildcardBound {
    Unbounded,
    Extends(Box<Type>),
    Super(Box<Type>),
}

/// A host type as it appears in member declarations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    Primitive(PrimitiveType),
    Class(ClassType),
    Array(Box<Type>),
    /// Type variable of a generic declaration, e.g. `E` in `List<E>`.
    TypeVar(Arc<str>),
    /// Only valid as a type argument.
    Wildcard(WildcardBound),
    /// Reference to a type the environment does not know about.
    Named(String),
}

impl Type {
    pub fn class(def: TypeId, args: Vec<Type>) -> Self {
        Type::Class(ClassType { def, args })
    }

    pub fn array(component: Type) -> Self {
        Type::Array(Box::new(component))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    pub fn is_reference(&self) -> bool {
        !matches!(self, Type::Void | Type::Primitive(_))
    }

    pub fn class_id(&self) -> Option<TypeId> {
        match self {
            Type::Class(ClassType { def, .. }) => Some(*def),
            _ => None,
        }
    }

    /// Type arguments of a parameterized class type; empty for everything else.
    pub fn type_args(&self) -> &[Type] {
        match self {
            Type::Class(ClassType { args, .. }) => args,
            _ => &[],
        }
    }

    /// Erase type arguments and type variables. Type variables erase to `Object`; loaded members
    /// carry their bound-aware erasure in `FieldDef::ty` and `MethodDef::params`.
    pub fn erasure(&self, well_known: &WellKnownTypes) -> Type {
        match self {
            Type::Class(ClassType { def, args }) if !args.is_empty() => Type::class(*def, vec![]),
            Type::Array(component) => Type::array(component.erasure(well_known)),
            Type::TypeVar(_) => Type::class(well_known.object, vec![]),
            Type::Wildcard(WildcardBound::Extends(bound)) => bound.erasure(well_known),
            Type::Wildcard(_) => Type::class(well_known.object, vec![]),
            other => other.clone(),
        }
    }
}

impl From<PrimitiveType> for Type {
    fn from(value: PrimitiveType) -> Self {
        Type::Primitive(value)
    }
}
