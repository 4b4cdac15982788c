use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{
    parse_method_signature, parse_type_signature, ConstructorDef, FieldDef, MethodDef, Modifiers,
    Type, TypeArgument, TypeDef, TypeEnv, TypeId, TypeKind, TypeSignature, TypeStore,
    WildcardBound,
};

/// Serialized shape of one host type.
///
/// Member types use JVM descriptors; the optional `signature` carries generic information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefStub {
    pub binary_name: String,
    #[serde(default)]
    pub access_flags: u16,
    #[serde(default)]
    pub super_binary_name: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub type_params: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldStub>,
    #[serde(default)]
    pub methods: Vec<MethodStub>,
    /// Binary names of member types, in declaration order.
    #[serde(default)]
    pub nested_types: Vec<String>,
    #[serde(default)]
    pub enum_constants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStub {
    pub name: String,
    pub descriptor: String,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub access_flags: u16,
}

/// A method or constructor (`<init>`). `<clinit>` is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodStub {
    pub name: String,
    pub descriptor: String,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub access_flags: u16,
}

/// Source of [`TypeDefStub`]s by binary name.
pub trait TypeProvider {
    fn lookup_type(&self, binary_name: &str) -> Option<TypeDefStub>;
}

impl TypeProvider for HashMap<String, TypeDefStub> {
    fn lookup_type(&self, binary_name: &str) -> Option<TypeDefStub> {
        self.get(binary_name).cloned()
    }
}

/// An ordered, deserialisable collection of stubs (`[[types]]` tables in TOML).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubSet {
    #[serde(default)]
    pub types: Vec<TypeDefStub>,
}

impl StubSet {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(|stub| stub.binary_name.as_str())
    }

    /// Load every stub in the set into `store`, in order.
    pub fn load_into(&self, store: &mut TypeStore) -> Vec<TypeId> {
        let mut loader = StubLoader::new(store, self);
        self.names()
            .filter_map(|name| loader.ensure_type(name))
            .collect()
    }
}

impl TypeProvider for StubSet {
    fn lookup_type(&self, binary_name: &str) -> Option<TypeDefStub> {
        self.types
            .iter()
            .find(|stub| stub.binary_name == binary_name)
            .cloned()
    }
}

/// Loads [`TypeProvider`] stubs into a [`TypeStore`] on demand, following references.
///
/// A type referenced while it is still being built resolves to its interned id, so cyclic
/// references terminate.
pub struct StubLoader<'a> {
    target: &'a mut TypeStore,
    source: &'a dyn TypeProvider,
    visited: HashSet<String>,
}

impl<'a> StubLoader<'a> {
    pub fn new(target: &'a mut TypeStore, source: &'a dyn TypeProvider) -> Self {
        Self {
            target,
            source,
            visited: HashSet::new(),
        }
    }

    /// Id of `binary_name`, loading its stub first when the source has one.
    ///
    /// Names the source does not know fall back to whatever the store already holds.
    pub fn ensure_type(&mut self, binary_name: &str) -> Option<TypeId> {
        if !self.visited.insert(binary_name.to_owned()) {
            return self.target.lookup_type(binary_name);
        }
        let Some(stub) = self.source.lookup_type(binary_name) else {
            return self.target.lookup_type(binary_name);
        };

        let id = self.target.intern_type_id(binary_name);
        let def = self.build_type_def(&stub);
        self.target.define_type(id, def);
        tracing::trace!(binary_name, "loaded type stub");
        Some(id)
    }

    fn build_type_def(&mut self, stub: &TypeDefStub) -> TypeDef {
        let kind = if stub.access_flags & Modifiers::INTERFACE != 0 {
            TypeKind::Interface
        } else if stub.access_flags & Modifiers::ENUM != 0 {
            TypeKind::Enum
        } else {
            TypeKind::Class
        };

        let super_class = match (kind, stub.super_binary_name.as_deref()) {
            (TypeKind::Interface, _) => None,
            (_, Some(name)) => Some(self.class_ref(name)),
            (TypeKind::Enum, None) => Some(self.class_ref("java.lang.Enum")),
            (TypeKind::Class, None) if stub.binary_name == "java.lang.Object" => None,
            (TypeKind::Class, None) => Some(self.class_ref("java.lang.Object")),
        };
        let interfaces = stub
            .interfaces
            .iter()
            .map(|name| self.class_ref(name))
            .collect();

        let declaring_type = stub
            .binary_name
            .rsplit_once('$')
            .and_then(|(outer, _)| self.ensure_type(outer));

        let fields = stub
            .fields
            .iter()
            .map(|field| FieldDef {
                name: field.name.clone(),
                ty: self.field_type(&field.descriptor),
                generic_ty: field
                    .signature
                    .as_deref()
                    .and_then(|sig| self.generic_field_type(sig)),
                modifiers: Modifiers::from_bits(field.access_flags),
            })
            .collect();

        let mut methods = Vec::new();
        let mut constructors = Vec::new();
        for method in &stub.methods {
            let modifiers = Modifiers::from_bits(method.access_flags);
            let (params, return_type) = self.method_types(&method.descriptor);
            match method.name.as_str() {
                "<clinit>" => continue,
                "<init>" => constructors.push(ConstructorDef { params, modifiers }),
                _ => methods.push(MethodDef {
                    name: method.name.clone(),
                    params,
                    return_type,
                    generic_return: method
                        .signature
                        .as_deref()
                        .and_then(|sig| self.generic_return(sig)),
                    modifiers,
                }),
            }
        }

        let nested = stub
            .nested_types
            .iter()
            .filter_map(|name| self.ensure_type(name))
            .collect();

        TypeDef {
            name: stub.binary_name.clone(),
            kind,
            modifiers: Modifiers::from_bits(stub.access_flags),
            type_params: stub.type_params.clone(),
            super_class,
            interfaces,
            declaring_type,
            fields,
            methods,
            constructors,
            nested,
            enum_constants: stub.enum_constants.clone(),
        }
    }

    fn class_ref(&mut self, binary_name: &str) -> Type {
        self.ensure_type(binary_name)
            .map(|id| Type::class(id, vec![]))
            .unwrap_or_else(|| Type::Named(binary_name.to_owned()))
    }

    fn field_type(&mut self, descriptor: &str) -> Type {
        match parse_type_signature(descriptor) {
            Ok(sig) => self.type_signature(&sig),
            Err(err) => {
                tracing::debug!(descriptor, %err, "unparseable field descriptor");
                Type::Named(descriptor.to_owned())
            }
        }
    }

    fn method_types(&mut self, descriptor: &str) -> (Vec<Type>, Type) {
        let sig = match parse_method_signature(descriptor) {
            Ok(sig) => sig,
            Err(err) => {
                tracing::debug!(descriptor, %err, "unparseable method descriptor");
                return (Vec::new(), Type::Named(descriptor.to_owned()));
            }
        };
        let params = sig.params.iter().map(|p| self.type_signature(p)).collect();
        let return_type = self.return_type(sig.return_type.as_ref());
        (params, return_type)
    }

    // Signatures only contribute type arguments; erased types always come from the descriptor.
    fn generic_field_type(&mut self, signature: &str) -> Option<Type> {
        match parse_type_signature(signature) {
            Ok(sig) => Some(self.type_signature(&sig)),
            Err(err) => {
                tracing::debug!(signature, %err, "ignoring unparseable field signature");
                None
            }
        }
    }

    fn generic_return(&mut self, signature: &str) -> Option<Type> {
        match parse_method_signature(signature) {
            Ok(sig) => Some(self.return_type(sig.return_type.as_ref())),
            Err(err) => {
                tracing::debug!(signature, %err, "ignoring unparseable method signature");
                None
            }
        }
    }

    fn return_type(&mut self, sig: Option<&TypeSignature>) -> Type {
        match sig {
            Some(ty) => self.type_signature(ty),
            None => Type::Void,
        }
    }

    fn type_signature(&mut self, sig: &TypeSignature) -> Type {
        match sig {
            TypeSignature::Base(prim) => Type::Primitive(*prim),
            TypeSignature::Array(component) => Type::array(self.type_signature(component)),
            TypeSignature::TypeVariable(name) => Type::TypeVar(name.as_str().into()),
            TypeSignature::Class { binary_name, args } => {
                let args: Vec<Type> = args.iter().map(|arg| self.type_argument(arg)).collect();
                match self.ensure_type(binary_name) {
                    Some(id) => Type::class(id, args),
                    None => Type::Named(binary_name.clone()),
                }
            }
        }
    }

    fn type_argument(&mut self, arg: &TypeArgument) -> Type {
        match arg {
            TypeArgument::Any => Type::Wildcard(WildcardBound::Unbounded),
            TypeArgument::Exact(ty) => self.type_signature(ty),
            TypeArgument::Extends(ty) => {
                Type::Wildcard(WildcardBound::Extends(Box::new(self.type_signature(ty))))
            }
            TypeArgument::Super(ty) => {
                Type::Wildcard(WildcardBound::Super(Box::new(self.type_signature(ty))))
            }
        }
    }
}
