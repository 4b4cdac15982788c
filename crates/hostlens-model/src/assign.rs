use std::collections::{HashSet, VecDeque};

use crate::{ClassType, PrimitiveType, Type, TypeEnv, TypeId, WildcardBound};

/// Box a primitive (or `void`) to its reference type; other types are returned unchanged.
pub fn box_type(env: &dyn TypeEnv, ty: &Type) -> Type {
    let wk = env.well_known();
    match ty {
        Type::Primitive(prim) => Type::class(wk.box_of(*prim), vec![]),
        Type::Void => Type::class(wk.void_box, vec![]),
        other => other.clone(),
    }
}

/// The primitive a box type wraps, if `ty` is one of the eight box types.
pub fn unbox_type(env: &dyn TypeEnv, ty: &Type) -> Option<PrimitiveType> {
    match ty {
        Type::Class(ClassType { def, .. }) => env.well_known().primitive_of(*def),
        _ => None,
    }
}

/// Unbox a box type (or `java.lang.Void`) to its primitive; other types are returned unchanged.
pub fn unboxed(env: &dyn TypeEnv, ty: &Type) -> Type {
    if let Some(prim) = unbox_type(env, ty) {
        return Type::Primitive(prim);
    }
    match ty {
        Type::Class(ClassType { def, .. }) if *def == env.well_known().void_box => Type::Void,
        other => other.clone(),
    }
}

/// Whether `sub` is `sup` or reaches it through its superclass / superinterface closure.
pub fn is_subclass(env: &dyn TypeEnv, sub: TypeId, sup: TypeId) -> bool {
    if sub == sup {
        return true;
    }

    let mut queue = VecDeque::from([sub]);
    let mut seen = HashSet::new();
    while let Some(current) = queue.pop_front() {
        if !seen.insert(current) {
            continue;
        }
        if current == sup {
            return true;
        }
        let Some(def) = env.type_def(current) else {
            continue;
        };
        if let Some(id) = def.super_class.as_ref().and_then(Type::class_id) {
            queue.push_back(id);
        }
        queue.extend(def.interfaces.iter().filter_map(Type::class_id));
    }

    // Interfaces have no superclass but are still subtypes of the root object.
    sup == env.well_known().object && env.type_def(sub).is_some()
}

/// Whether a value of type `from` can be supplied where `to` is expected.
///
/// Both types are compared by erasure. Primitives only accept themselves; every reference type
/// (arrays included) is assignable to the root object; arrays are covariant over reference
/// components.
pub fn is_assignable(env: &dyn TypeEnv, from: &Type, to: &Type) -> bool {
    let wk = env.well_known();
    let from = from.erasure(wk);
    let to = to.erasure(wk);
    if from == to {
        return true;
    }

    match (&from, &to) {
        (Type::Void, _) | (_, Type::Void) => false,
        (Type::Primitive(_), _) | (_, Type::Primitive(_)) => false,
        (_, Type::Class(ClassType { def, .. })) if *def == wk.object => from.is_reference(),
        (Type::Class(sub), Type::Class(sup)) => is_subclass(env, sub.def, sup.def),
        (Type::Array(sub), Type::Array(sup)) => {
            sub.is_reference() && sup.is_reference() && is_assignable(env, sub, sup)
        }
        _ => false,
    }
}

/// Java-like rendering with fully qualified binary names, e.g. `java.util.List<java.lang.String>`.
pub fn format_type(env: &dyn TypeEnv, ty: &Type) -> String {
    let mut out = String::new();
    write_type(env, ty, &mut out);
    out
}

fn write_type(env: &dyn TypeEnv, ty: &Type, out: &mut String) {
    match ty {
        Type::Void => out.push_str("void"),
        Type::Primitive(prim) => out.push_str(prim.keyword()),
        Type::Class(ClassType { def, args }) => {
            match env.type_name(*def) {
                Some(name) => out.push_str(name),
                None => out.push_str(&format!("<unknown type {}>", def.to_raw())),
            }
            if !args.is_empty() {
                out.push('<');
                for (idx, arg) in args.iter().enumerate() {
                    if idx > 0 {
                        out.push_str(", ");
                    }
                    write_type(env, arg, out);
                }
                out.push('>');
            }
        }
        Type::Array(component) => {
            write_type(env, component, out);
            out.push_str("[]");
        }
        Type::TypeVar(name) => out.push_str(name),
        Type::Wildcard(WildcardBound::Unbounded) => out.push('?'),
        Type::Wildcard(WildcardBound::Extends(bound)) => {
            out.push_str("? extends ");
            write_type(env, bound, out);
        }
        Type::Wildcard(WildcardBound::Super(bound)) => {
            out.push_str("? super ");
            write_type(env, bound, out);
        }
        Type::Named(name) => out.push_str(name),
    }
}
