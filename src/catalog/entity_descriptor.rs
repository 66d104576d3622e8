use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{PropertyDescriptor, PropertyKind};

/// Metadata describing one mapped entity type.
///
/// The `properties` map keeps declaration order, which is also the order of
/// the primitive members built for the entity's object model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub name: String,
    pub table: String,
    /// names of the primitive properties forming the identity of a row
    #[serde(default)]
    pub key: Vec<String>,
    pub properties: IndexMap<String, PropertyDescriptor>,
}

impl EntityDescriptor {
    pub fn new(name: &str, table: &str) -> Self {
        Self {
            name: name.to_string(),
            table: table.to_string(),
            key: vec![],
            properties: IndexMap::new(),
        }
    }

    pub fn with_key(mut self, key: &[&str]) -> Self {
        self.key = key.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.insert(property.name.clone(), property);
        self
    }

    /// Shorthand for a primitive property whose column shares its name.
    pub fn with_column(self, name: &str) -> Self {
        self.with_property(PropertyDescriptor::primitive(name, name))
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    /// Column-backed properties in declaration order.
    pub fn primitive_properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.values().filter(|p| p.kind == PropertyKind::Primitive)
    }
}
