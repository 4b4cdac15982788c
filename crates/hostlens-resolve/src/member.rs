//! [`Member`] implementations for the four member categories.

use hostlens_model::{format_type, ConstructorId, FieldId, MethodId, Modifiers, Type, TypeEnv, TypeId, TypeKind};

use crate::walker::Member;
use crate::MemberCategory;

/// A type declared inside another type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NestedType(pub TypeId);

fn count(len: usize) -> impl Iterator<Item = u32> {
    (0..len).map(|idx| idx as u32)
}

fn type_name(env: &dyn TypeEnv, id: TypeId) -> &str {
    env.type_name(id).unwrap_or("<unknown>")
}

fn with_modifiers(modifiers: Modifiers, rest: String) -> String {
    let modifiers = modifiers.to_string();
    if modifiers.is_empty() {
        rest
    } else {
        format!("{modifiers} {rest}")
    }
}

fn render_params(env: &dyn TypeEnv, params: &[Type]) -> String {
    params
        .iter()
        .map(|param| format_type(env, param))
        .collect::<Vec<_>>()
        .join(",")
}

impl Member for FieldId {
    const CATEGORY: MemberCategory = MemberCategory::Field;
    const INHERITED: bool = true;

    fn own_members(env: &dyn TypeEnv, ty: TypeId) -> Vec<Self> {
        let len = env.type_def(ty).map_or(0, |def| def.fields.len());
        count(len).map(|idx| FieldId::new(ty, idx)).collect()
    }

    fn declaring_type(self, _env: &dyn TypeEnv) -> Option<TypeId> {
        Some(self.owner)
    }

    fn render(self, env: &dyn TypeEnv) -> String {
        let Some(def) = env.field(self) else {
            return format!("{self:?}");
        };
        with_modifiers(
            def.modifiers,
            format!(
                "{} {}.{}",
                format_type(env, &def.ty),
                type_name(env, self.owner),
                def.name
            ),
        )
    }
}

impl Member for MethodId {
    const CATEGORY: MemberCategory = MemberCategory::Method;
    const INHERITED: bool = true;

    fn own_members(env: &dyn TypeEnv, ty: TypeId) -> Vec<Self> {
        let len = env.type_def(ty).map_or(0, |def| def.methods.len());
        count(len).map(|idx| MethodId::new(ty, idx)).collect()
    }

    fn declaring_type(self, _env: &dyn TypeEnv) -> Option<TypeId> {
        Some(self.owner)
    }

    fn render(self, env: &dyn TypeEnv) -> String {
        let Some(def) = env.method(self) else {
            return format!("{self:?}");
        };
        with_modifiers(
            def.modifiers,
            format!(
                "{} {}.{}({})",
                format_type(env, &def.return_type),
                type_name(env, self.owner),
                def.name,
                render_params(env, &def.params)
            ),
        )
    }
}

impl Member for ConstructorId {
    const CATEGORY: MemberCategory = MemberCategory::Constructor;
    const INHERITED: bool = false;

    fn own_members(env: &dyn TypeEnv, ty: TypeId) -> Vec<Self> {
        let len = env.type_def(ty).map_or(0, |def| def.constructors.len());
        count(len).map(|idx| ConstructorId::new(ty, idx)).collect()
    }

    fn declaring_type(self, _env: &dyn TypeEnv) -> Option<TypeId> {
        Some(self.owner)
    }

    fn render(self, env: &dyn TypeEnv) -> String {
        let Some(def) = env.constructor(self) else {
            return format!("{self:?}");
        };
        with_modifiers(
            def.modifiers,
            format!(
                "{}({})",
                type_name(env, self.owner),
                render_params(env, &def.params)
            ),
        )
    }
}

impl Member for NestedType {
    const CATEGORY: MemberCategory = MemberCategory::NestedType;
    const INHERITED: bool = true;

    fn own_members(env: &dyn TypeEnv, ty: TypeId) -> Vec<Self> {
        env.type_def(ty)
            .map(|def| def.nested.iter().copied().map(NestedType).collect())
            .unwrap_or_default()
    }

    fn declaring_type(self, env: &dyn TypeEnv) -> Option<TypeId> {
        env.type_def(self.0)?.declaring_type
    }

    fn render(self, env: &dyn TypeEnv) -> String {
        render_type(env, self.0)
    }
}

/// `public static class a.B$C`
pub(crate) fn render_type(env: &dyn TypeEnv, id: TypeId) -> String {
    let Some(def) = env.type_def(id) else {
        return format!("{id:?}");
    };
    let keyword = match def.kind {
        TypeKind::Class => "class",
        TypeKind::Interface => "interface",
        TypeKind::Enum => "enum",
    };
    with_modifiers(def.modifiers, format!("{keyword} {}", def.name))
}
