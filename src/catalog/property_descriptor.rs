use serde::{Deserialize, Serialize};

use crate::catalog::PropertyKind;

/// Key pairing between an owner entity and a navigation target.
///
/// - `this_key`: property of the owner entity.
/// - `other_key`: matching property of the related entity.
///
/// For a many-to-one navigation this is usually `fk -> pk`, for a one-to-many
/// navigation `pk -> fk`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    pub this_key: String,
    pub other_key: String,
}

impl Association {
    pub fn new(this_key: &str, other_key: &str) -> Self {
        Self { this_key: this_key.to_string(), other_key: other_key.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    pub kind: PropertyKind,
    /// backing column, primitive properties only
    #[serde(default)]
    pub column: Option<String>,
    /// related entity name, navigation properties only
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub association: Option<Association>,
}

impl PropertyDescriptor {
    pub fn primitive(name: &str, column: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: PropertyKind::Primitive,
            column: Some(column.to_string()),
            target: None,
            association: None,
        }
    }

    pub fn complex(name: &str, target: &str, association: Association) -> Self {
        Self {
            name: name.to_string(),
            kind: PropertyKind::Complex,
            column: None,
            target: Some(target.to_string()),
            association: Some(association),
        }
    }

    pub fn collection(name: &str, target: &str, association: Association) -> Self {
        Self {
            name: name.to_string(),
            kind: PropertyKind::Collection,
            column: None,
            target: Some(target.to_string()),
            association: Some(association),
        }
    }

    /// Column name of a primitive property; falls back to the property name.
    pub fn column_name(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }
}
