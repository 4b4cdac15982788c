use std::fmt;

use crate::{Type, TypeId};

/// JVM-style access flags.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u16);

impl Modifiers {
    pub const PUBLIC: u16 = 0x0001;
    pub const PRIVATE: u16 = 0x0002;
    pub const PROTECTED: u16 = 0x0004;
    pub const STATIC: u16 = 0x0008;
    pub const FINAL: u16 = 0x0010;
    pub const SYNCHRONIZED: u16 = 0x0020;
    pub const VARARGS: u16 = 0x0080;
    pub const NATIVE: u16 = 0x0100;
    pub const INTERFACE: u16 = 0x0200;
    pub const ABSTRACT: u16 = 0x0400;
    pub const ENUM: u16 = 0x4000;

    // Rendering order used by `Display`.
    const RENDERED: [(u16, &'static str); 8] = [
        (Self::PUBLIC, "public"),
        (Self::PROTECTED, "protected"),
        (Self::PRIVATE, "private"),
        (Self::ABSTRACT, "abstract"),
        (Self::STATIC, "static"),
        (Self::FINAL, "final"),
        (Self::SYNCHRONIZED, "synchronized"),
        (Self::NATIVE, "native"),
    ];

    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn contains(self, flag: u16) -> bool {
        self.0 & flag != 0
    }

    pub fn is_public(self) -> bool {
        self.contains(Self::PUBLIC)
    }

    pub fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }

    pub fn is_final(self) -> bool {
        self.contains(Self::FINAL)
    }

    pub fn is_abstract(self) -> bool {
        self.contains(Self::ABSTRACT)
    }

    pub fn with(self, flag: u16) -> Self {
        Self(self.0 | flag)
    }
}

impl fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Modifiers({:#06x})", self.0)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (flag, keyword) in Self::RENDERED {
            if self.contains(flag) {
                if !first {
                    f.write_str(" ")?;
                }
                f.write_str(keyword)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    /// Erased declared type, as reflection reports it.
    pub ty: Type,
    /// Declared type with its type arguments, when the declaration is generic.
    pub generic_ty: Option<Type>,
    pub modifiers: Modifiers,
}

impl FieldDef {
    pub fn generic_type(&self) -> &Type {
        self.generic_ty.as_ref().unwrap_or(&self.ty)
    }
}

/// Parameter and return types are erased; `generic_return` keeps the return type's arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDef {
    pub name: String,
    pub params: Vec<Type>,
    pub return_type: Type,
    pub generic_return: Option<Type>,
    pub modifiers: Modifiers,
}

impl MethodDef {
    pub fn generic_return_type(&self) -> &Type {
        self.generic_return.as_ref().unwrap_or(&self.return_type)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDef {
    pub params: Vec<Type>,
    pub modifiers: Modifiers,
}

/// Shape of one host type. Member lists are kept in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDef {
    /// Binary name, e.g. `net.example.Outer$Inner`.
    pub name: String,
    pub kind: TypeKind,
    pub modifiers: Modifiers,
    pub type_params: Vec<String>,
    pub super_class: Option<Type>,
    pub interfaces: Vec<Type>,
    pub declaring_type: Option<TypeId>,
    pub fields: Vec<FieldDef>,
    pub methods: Vec<MethodDef>,
    pub constructors: Vec<ConstructorDef>,
    pub nested: Vec<TypeId>,
    pub enum_constants: Vec<String>,
}

impl TypeDef {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            modifiers: Modifiers::from_bits(Modifiers::PUBLIC),
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            declaring_type: None,
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            nested: Vec::new(),
            enum_constants: Vec::new(),
        }
    }

    /// Name without package or enclosing types.
    pub fn simple_name(&self) -> &str {
        let tail = self.name.rsplit('.').next().unwrap_or(&self.name);
        tail.rsplit('$').next().unwrap_or(tail)
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }
}
