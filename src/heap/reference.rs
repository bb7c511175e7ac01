use crate::syntax::{Address, Identifier};

/// Handle to a cell in `Memory`.
///
/// Cloning a handle yields an alias: both clones denote the same address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ref {
    Primitive {
        id: usize,
    },
    Object {
        address: Address,
        struct_tag: Identifier,
    },
    Array {
        address: Address,
        array_tag: Identifier,
    },
}

impl Ref {
    pub fn kind(&self) -> MemoryKind {
        match self {
            Ref::Primitive { .. } => MemoryKind::Primitive,
            Ref::Object { .. } => MemoryKind::Object,
            Ref::Array { .. } => MemoryKind::Array,
        }
    }

    /// Primitives live outside the address space.
    pub fn address(&self) -> Option<Address> {
        match self {
            Ref::Primitive { .. } => None,
            Ref::Object { address, .. } | Ref::Array { address, .. } => Some(*address),
        }
    }

    pub fn tag(&self) -> Option<&Identifier> {
        match self {
            Ref::Primitive { .. } => None,
            Ref::Object { struct_tag, .. } => Some(struct_tag),
            Ref::Array { array_tag, .. } => Some(array_tag),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryKind {
    Primitive,
    Object,
    Array,
}
