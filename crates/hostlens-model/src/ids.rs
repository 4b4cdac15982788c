use std::fmt;

/// Index of a type definition inside a [`crate::TypeEnv`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn to_raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

macro_rules! member_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            pub owner: TypeId,
            pub index: u32,
        }

        impl $name {
            #[inline]
            pub const fn new(owner: TypeId, index: u32) -> Self {
                Self { owner, index }
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({}#{})", stringify!($name), self.owner.0, self.index)
            }
        }
    };
}

member_id!(
    /// A field, identified by its declaring type and declaration index.
    FieldId
);
member_id!(
    /// A method, identified by its declaring type and declaration index.
    MethodId
);
member_id!(
    /// A constructor, identified by its declaring type and declaration index.
    ConstructorId
);
