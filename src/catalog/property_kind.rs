use serde::{Deserialize, Serialize};

/// Classification of an entity property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKind {
    /// Column-backed scalar value
    Primitive,
    /// Single related entity (navigation)
    Complex,
    /// Zero or more related entities (navigation)
    Collection,
}

impl PropertyKind {
    pub fn is_navigation(&self) -> bool {
        !matches!(self, PropertyKind::Primitive)
    }
}
