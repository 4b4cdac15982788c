use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    default_value, format_type, is_subclass, runtime_type, value_conforms, AccessError,
    ConstructorDef, ConstructorId, EnumConstant, FieldDef, FieldId, Host, MethodDef, MethodId,
    Modifiers, ObjectRef, PrimitiveType, Type, TypeDef, TypeEnv, TypeId, TypeKind, Value,
    WellKnownTypes,
};

/// Arguments handed to a bound native body.
pub struct Invocation<'a> {
    pub store: &'a TypeStore,
    /// Receiver; [`Value::Null`] for static methods. For constructors, the freshly allocated
    /// instance.
    pub this: &'a Value,
    pub args: &'a [Value],
}

type MethodBody = Arc<dyn Fn(Invocation<'_>) -> Result<Value, AccessError> + Send + Sync>;
type ConstructorBody = Arc<dyn Fn(Invocation<'_>) -> Result<(), AccessError> + Send + Sync>;

/// In-memory host backend.
///
/// Type definitions are immutable once the store is shared; instance and static state live
/// behind `parking_lot` locks so a shared store is `Send + Sync`.
pub struct TypeStore {
    types: Vec<TypeDef>,
    by_name: HashMap<String, TypeId>,
    well_known: WellKnownTypes,
    method_bodies: HashMap<MethodId, MethodBody>,
    constructor_bodies: HashMap<ConstructorId, ConstructorBody>,
    statics: RwLock<HashMap<FieldId, Value>>,
}

impl fmt::Debug for TypeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeStore")
            .field("types", &self.types.len())
            .field("method_bodies", &self.method_bodies.len())
            .field("constructor_bodies", &self.constructor_bodies.len())
            .finish_non_exhaustive()
    }
}

impl TypeStore {
    /// A store containing the handful of runtime types every host has: `java.lang.Object`,
    /// `String`, `Number`, the box types, `Enum`, `Runnable`, `CharSequence`, `Comparable` and
    /// the core `java.util` collection interfaces.
    pub fn with_minimal_runtime() -> Self {
        let placeholder = TypeId::new(0);
        let mut store = Self {
            types: Vec::new(),
            by_name: HashMap::new(),
            well_known: WellKnownTypes {
                object: placeholder,
                string: placeholder,
                number: placeholder,
                enum_base: placeholder,
                void_box: placeholder,
                boolean: placeholder,
                byte: placeholder,
                character: placeholder,
                short: placeholder,
                integer: placeholder,
                long: placeholder,
                float: placeholder,
                double: placeholder,
            },
            method_bodies: HashMap::new(),
            constructor_bodies: HashMap::new(),
            statics: RwLock::new(HashMap::new()),
        };

        let object = store.add_runtime_class("java.lang.Object", TypeKind::Class, None, &[]);
        store.types[object.index()].constructors.push(ConstructorDef {
            params: vec![],
            modifiers: Modifiers::from_bits(Modifiers::PUBLIC),
        });

        let comparable = store.add_runtime_class("java.lang.Comparable", TypeKind::Interface, None, &[]);
        store.types[comparable.index()].type_params.push("T".to_owned());
        let char_sequence =
            store.add_runtime_class("java.lang.CharSequence", TypeKind::Interface, None, &[]);
        let runnable = store.add_runtime_class("java.lang.Runnable", TypeKind::Interface, None, &[]);
        store.types[runnable.index()].methods.push(MethodDef {
            name: "run".to_owned(),
            params: vec![],
            return_type: Type::Void,
            generic_return: None,
            modifiers: Modifiers::from_bits(Modifiers::PUBLIC | Modifiers::ABSTRACT),
        });

        let string = store.add_runtime_class(
            "java.lang.String",
            TypeKind::Class,
            Some(object),
            &[char_sequence, comparable],
        );
        store.types[string.index()].modifiers = store.types[string.index()]
            .modifiers
            .with(Modifiers::FINAL);

        let number = store.add_runtime_class("java.lang.Number", TypeKind::Class, Some(object), &[]);
        store.types[number.index()].modifiers = store.types[number.index()]
            .modifiers
            .with(Modifiers::ABSTRACT);

        let enum_base =
            store.add_runtime_class("java.lang.Enum", TypeKind::Class, Some(object), &[comparable]);
        store.types[enum_base.index()].modifiers = store.types[enum_base.index()]
            .modifiers
            .with(Modifiers::ABSTRACT);
        store.types[enum_base.index()].type_params.push("E".to_owned());

        let void_box = store.add_runtime_class("java.lang.Void", TypeKind::Class, Some(object), &[]);

        let mut boxes = [placeholder; 8];
        for (slot, prim) in boxes.iter_mut().zip(PrimitiveType::ALL) {
            let super_class = match prim {
                PrimitiveType::Boolean | PrimitiveType::Char => object,
                _ => number,
            };
            *slot = store.add_runtime_class(prim.box_name(), TypeKind::Class, Some(super_class), &[comparable]);
        }

        let collection = store.add_runtime_class("java.util.Collection", TypeKind::Interface, None, &[]);
        store.types[collection.index()].type_params.push("E".to_owned());
        let list =
            store.add_runtime_class("java.util.List", TypeKind::Interface, None, &[collection]);
        store.types[list.index()].type_params.push("E".to_owned());
        let map = store.add_runtime_class("java.util.Map", TypeKind::Interface, None, &[]);
        store.types[map.index()].type_params.extend(["K".to_owned(), "V".to_owned()]);

        let [boolean, byte, character, short, integer, long, float, double] = boxes;
        store.well_known = WellKnownTypes {
            object,
            string,
            number,
            enum_base,
            void_box,
            boolean,
            byte,
            character,
            short,
            integer,
            long,
            float,
            double,
        };
        store
    }

    fn add_runtime_class(
        &mut self,
        name: &str,
        kind: TypeKind,
        super_class: Option<TypeId>,
        interfaces: &[TypeId],
    ) -> TypeId {
        let id = self.intern_type_id(name);
        let mut def = TypeDef::new(name, kind);
        if kind == TypeKind::Interface {
            def.modifiers = def
                .modifiers
                .with(Modifiers::INTERFACE | Modifiers::ABSTRACT);
        }
        def.super_class = super_class.map(|id| Type::class(id, vec![]));
        def.interfaces = interfaces.iter().map(|id| Type::class(*id, vec![])).collect();
        self.types[id.index()] = def;
        id
    }

    /// Id for `name`, reserving a placeholder definition if the type is not defined yet.
    pub fn intern_type_id(&mut self, name: &str) -> TypeId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let raw: u32 = self.types.len().try_into().unwrap_or(u32::MAX);
        let id = TypeId::new(raw);
        self.types.push(TypeDef::new(name, TypeKind::Class));
        self.by_name.insert(name.to_owned(), id);
        id
    }

    /// Install `def` under `id`. Enum constants become readable through their static fields.
    pub fn define_type(&mut self, id: TypeId, def: TypeDef) {
        if def.kind == TypeKind::Enum {
            let statics = self.statics.get_mut();
            for (ordinal, name) in def.enum_constants.iter().enumerate() {
                let Some(index) = def.fields.iter().position(|f| &f.name == name) else {
                    continue;
                };
                statics.insert(
                    FieldId::new(id, index as u32),
                    Value::Enum(EnumConstant {
                        ty: id,
                        ordinal: ordinal as u32,
                        name: Arc::from(name.as_str()),
                    }),
                );
            }
        }

        if let Some(old) = self.types.get(id.index()) {
            if old.name != def.name {
                self.by_name.remove(&old.name);
            }
        }
        self.by_name.insert(def.name.clone(), id);
        if let Some(slot) = self.types.get_mut(id.index()) {
            *slot = def;
        }
    }

    /// Intern and define in one step.
    pub fn add_type(&mut self, def: TypeDef) -> TypeId {
        let id = self.intern_type_id(&def.name);
        self.define_type(id, def);
        id
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn find_field(&self, owner: TypeId, name: &str) -> Option<FieldId> {
        let def = self.type_def(owner)?;
        let index = def.fields.iter().position(|f| f.name == name)?;
        Some(FieldId::new(owner, index as u32))
    }

    /// First method named `name` with `arity` parameters, in declaration order.
    pub fn find_method(&self, owner: TypeId, name: &str, arity: usize) -> Option<MethodId> {
        let def = self.type_def(owner)?;
        let index = def
            .methods
            .iter()
            .position(|m| m.name == name && m.params.len() == arity)?;
        Some(MethodId::new(owner, index as u32))
    }

    pub fn find_constructor(&self, owner: TypeId, arity: usize) -> Option<ConstructorId> {
        let def = self.type_def(owner)?;
        let index = def.constructors.iter().position(|c| c.params.len() == arity)?;
        Some(ConstructorId::new(owner, index as u32))
    }

    pub fn bind_method<F>(&mut self, method: MethodId, body: F)
    where
        F: Fn(Invocation<'_>) -> Result<Value, AccessError> + Send + Sync + 'static,
    {
        self.method_bodies.insert(method, Arc::new(body));
    }

    pub fn bind_constructor<F>(&mut self, ctor: ConstructorId, body: F)
    where
        F: Fn(Invocation<'_>) -> Result<(), AccessError> + Send + Sync + 'static,
    {
        self.constructor_bodies.insert(ctor, Arc::new(body));
    }

    /// Allocate an instance without running any constructor.
    pub fn allocate(&self, ty: TypeId) -> ObjectRef {
        ObjectRef::new(ty)
    }

    fn field_def(&self, field: FieldId) -> Result<&FieldDef, AccessError> {
        self.field(field)
            .ok_or_else(|| AccessError::UnknownMember(format!("{field:?}")))
    }

    fn member_name(&self, owner: TypeId, name: &str) -> String {
        format!("{}.{name}", self.type_name(owner).unwrap_or("?"))
    }

    fn describe_value(&self, value: &Value) -> String {
        match runtime_type(self, value) {
            Some(ty) => format_type(self, &ty),
            None => "null".to_owned(),
        }
    }

    /// Type id of the object a receiver value refers to.
    fn receiver_type(&self, target: &Value) -> Option<TypeId> {
        match target {
            Value::Object(obj) => Some(obj.ty()),
            Value::Enum(constant) => Some(constant.ty),
            Value::Str(_) => Some(self.well_known.string),
            _ => None,
        }
    }

    fn check_receiver(&self, owner: TypeId, member: &str, target: &Value) -> Result<(), AccessError> {
        if target.is_null() {
            return Err(AccessError::NullTarget {
                member: member.to_owned(),
            });
        }
        match self.receiver_type(target) {
            Some(actual) if is_subclass(self, actual, owner) => Ok(()),
            _ => Err(AccessError::WrongInstance {
                expected: self.type_name(owner).unwrap_or("?").to_owned(),
                actual: self.describe_value(target),
            }),
        }
    }

    fn check_args(&self, member: &str, params: &[Type], args: &[Value]) -> Result<(), AccessError> {
        if params.len() != args.len() {
            return Err(AccessError::ArgumentCount {
                member: member.to_owned(),
                expected: params.len(),
                actual: args.len(),
            });
        }
        for (index, (param, arg)) in params.iter().zip(args).enumerate() {
            if !value_conforms(self, arg, param) {
                return Err(AccessError::ArgumentType {
                    member: member.to_owned(),
                    index,
                    expected: format_type(self, param),
                    actual: self.describe_value(arg),
                });
            }
        }
        Ok(())
    }

    /// Find the body that implements `method` for a receiver of runtime type `receiver`.
    fn dispatch(&self, method: MethodId, def: &MethodDef, receiver: TypeId) -> Option<MethodBody> {
        let mut current = Some(receiver);
        let mut steps = 0usize;
        while let Some(ty) = current {
            if steps > self.types.len() {
                break;
            }
            steps += 1;
            if let Some(type_def) = self.type_def(ty) {
                for (index, candidate) in type_def.methods.iter().enumerate() {
                    if candidate.name != def.name || !self.same_erased_params(candidate, def) {
                        continue;
                    }
                    if let Some(body) = self.method_bodies.get(&MethodId::new(ty, index as u32)) {
                        return Some(body.clone());
                    }
                }
            }
            current = self.super_class_of(ty);
        }
        self.method_bodies.get(&method).cloned()
    }

    fn same_erased_params(&self, a: &MethodDef, b: &MethodDef) -> bool {
        a.params.len() == b.params.len()
            && a.params
                .iter()
                .zip(&b.params)
                .all(|(x, y)| x.erasure(&self.well_known) == y.erasure(&self.well_known))
    }
}

impl TypeEnv for TypeStore {
    fn type_def(&self, id: TypeId) -> Option<&TypeDef> {
        self.types.get(id.index())
    }

    fn lookup_type(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }
}

impl Host for TypeStore {
    fn read_field(&self, field: FieldId, target: &Value) -> Result<Value, AccessError> {
        let def = self.field_def(field)?;
        if def.modifiers.is_static() {
            let stored = self.statics.read().get(&field).cloned();
            return Ok(stored.unwrap_or_else(|| default_value(&def.ty)));
        }

        let member = self.member_name(field.owner, &def.name);
        self.check_receiver(field.owner, &member, target)?;
        let stored = target.as_object().and_then(|obj| obj.load(field));
        Ok(stored.unwrap_or_else(|| default_value(&def.ty)))
    }

    fn write_field(&self, field: FieldId, target: &Value, value: Value) -> Result<(), AccessError> {
        let def = self.field_def(field)?;
        let member = self.member_name(field.owner, &def.name);
        if def.modifiers.is_static() && def.modifiers.is_final() {
            return Err(AccessError::IllegalAccess {
                member,
                reason: "cannot write a static final field".to_owned(),
            });
        }
        if !value_conforms(self, &value, &def.ty) {
            return Err(AccessError::ArgumentType {
                member,
                index: 0,
                expected: format_type(self, &def.ty),
                actual: self.describe_value(&value),
            });
        }

        if def.modifiers.is_static() {
            self.statics.write().insert(field, value);
            return Ok(());
        }

        self.check_receiver(field.owner, &member, target)?;
        match target.as_object() {
            Some(obj) => {
                obj.store(field, value);
                Ok(())
            }
            None => Err(AccessError::IllegalAccess {
                member,
                reason: "built-in values have no writable fields".to_owned(),
            }),
        }
    }

    fn invoke(
        &self,
        method: MethodId,
        target: &Value,
        args: Vec<Value>,
    ) -> Result<Value, AccessError> {
        let def = self
            .method(method)
            .ok_or_else(|| AccessError::UnknownMember(format!("{method:?}")))?;
        let member = self.member_name(method.owner, &def.name);
        self.check_args(&member, &def.params, &args)?;

        let body = if def.modifiers.is_static() {
            self.method_bodies.get(&method).cloned()
        } else {
            self.check_receiver(method.owner, &member, target)?;
            let receiver = self.receiver_type(target).unwrap_or(method.owner);
            self.dispatch(method, def, receiver)
        };
        let body = body.ok_or(AccessError::NoBody { member })?;

        let null = Value::Null;
        let this = if def.modifiers.is_static() {
            &null
        } else {
            target
        };
        body(Invocation {
            store: self,
            this,
            args: &args,
        })
    }

    fn construct(&self, ctor: ConstructorId, args: Vec<Value>) -> Result<Value, AccessError> {
        let owner = self
            .type_def(ctor.owner)
            .ok_or_else(|| AccessError::UnknownMember(format!("{ctor:?}")))?;
        let def = self
            .constructor(ctor)
            .ok_or_else(|| AccessError::UnknownMember(format!("{ctor:?}")))?;

        let reason = match owner.kind {
            TypeKind::Interface => Some("interfaces cannot be instantiated"),
            TypeKind::Enum => Some("enum types cannot be instantiated"),
            TypeKind::Class if owner.modifiers.is_abstract() => Some("type is abstract"),
            TypeKind::Class => None,
        };
        if let Some(reason) = reason {
            return Err(AccessError::Instantiation {
                type_name: owner.name.clone(),
                reason: reason.to_owned(),
            });
        }

        let member = self.member_name(ctor.owner, "<init>");
        self.check_args(&member, &def.params, &args)?;

        let instance = Value::Object(self.allocate(ctor.owner));
        if let Some(body) = self.constructor_bodies.get(&ctor) {
            body(Invocation {
                store: self,
                this: &instance,
                args: &args,
            })?;
        }
        Ok(instance)
    }

    fn enum_constants(&self, ty: TypeId) -> Option<Vec<EnumConstant>> {
        let def = self.type_def(ty)?;
        if !def.is_enum() {
            return None;
        }
        Some(
            def.enum_constants
                .iter()
                .enumerate()
                .map(|(ordinal, name)| EnumConstant {
                    ty,
                    ordinal: ordinal as u32,
                    name: Arc::from(name.as_str()),
                })
                .collect(),
        )
    }

    fn as_env(&self) -> &dyn TypeEnv {
        self
    }
}
