use std::{path::Path, sync::Arc};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{catalog::{EntityCatalog, EntityDescriptor, PropertyKind}, CatalogError};

pub type SharedCatalog = Arc<MemoryCatalog>;

/// In-memory entity catalog.
///
/// Built once (programmatically or from a JSON document) and read-only
/// afterwards; wrap it with [`MemoryCatalog::into_shared`] to hand the same
/// catalog to concurrently running compilations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryCatalog {
    entities: IndexMap<String, EntityDescriptor>,
}

#[derive(Deserialize)]
struct CatalogDocument {
    entities: Vec<EntityDescriptor>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(mut self, entity: EntityDescriptor) -> Self {
        self.register(entity);
        self
    }

    pub fn register(&mut self, entity: EntityDescriptor) {
        self.entities.insert(entity.name.clone(), entity);
    }

    pub fn into_shared(self) -> SharedCatalog {
        Arc::new(self)
    }

    pub fn entity_names(&self) -> Vec<String> {
        self.entities.keys().cloned().collect()
    }

    /// Parse a catalog document of the form `{ "entities": [ ... ] }`.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(text)?;
        let mut catalog = Self::new();
        for entity in document.entities {
            Self::validate_key(&entity)?;
            catalog.register(entity);
        }
        Ok(catalog)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    fn validate_key(entity: &EntityDescriptor) -> Result<(), CatalogError> {
        for key in &entity.key {
            let valid = entity.property(key)
                .map(|p| p.kind == PropertyKind::Primitive)
                .unwrap_or(false);
            if !valid {
                return Err(CatalogError::InvalidKey { entity: entity.name.clone(), key: key.clone() });
            }
        }
        Ok(())
    }
}

impl EntityCatalog for MemoryCatalog {
    fn entity(&self, name: &str) -> Option<&EntityDescriptor> {
        self.entities.get(name)
    }
}
