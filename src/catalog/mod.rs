pub mod property_kind;
pub use property_kind::*;

pub mod property_descriptor;
pub use property_descriptor::*;

pub mod entity_descriptor;
pub use entity_descriptor::*;

pub mod memory_catalog;
pub use memory_catalog::*;

/// Read-only source of entity metadata.
///
/// Implementations are built once and shared by every compilation running
/// against them, so lookups take `&self` only.
pub trait EntityCatalog {
    /// Return the descriptor of an entity type by name, if known.
    fn entity(&self, name: &str) -> Option<&EntityDescriptor>;
}
