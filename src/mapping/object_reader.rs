use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::mapping::ObjectActivator;

/// Positional result row as streamed back by the execution layer.
pub type Row = Vec<Value>;

/// Evaluates an [`ObjectActivator`] against result rows.
///
/// Without collections every row yields one value. With collections, rows
/// are grouped by the root identity (every column read outside collections)
/// and each collection receives one element per distinct element identity;
/// rows whose element identity is entirely NULL (unmatched LEFT JOIN) add
/// nothing.
pub struct ObjectReader<'a> {
    activator: &'a ObjectActivator,
}

impl<'a> ObjectReader<'a> {
    pub fn new(activator: &'a ObjectActivator) -> Self {
        Self { activator }
    }

    pub fn read(&self, rows: &[Row]) -> Vec<Value> {
        if !self.activator.contains_collection() {
            return rows.iter().map(|row| Self::build(self.activator, row)).collect();
        }

        let root_identity = self.activator.root_identity();
        let mut roots: IndexMap<String, Value> = IndexMap::new();
        let mut seen: HashSet<String> = HashSet::new();

        for row in rows {
            let root_key = Self::identity_key(row, &root_identity);
            let target = roots.entry(root_key.clone())
                .or_insert_with(|| Self::build(self.activator, row));
            Self::merge(self.activator, row, target, &root_key, &mut seen);
        }

        roots.into_values().collect()
    }

    fn cell(row: &Row, ordinal: usize) -> Value {
        row.get(ordinal).cloned().unwrap_or(Value::Null)
    }

    fn identity_key(row: &Row, ordinals: &[usize]) -> String {
        let parts: Vec<String> = ordinals.iter().map(|o| Self::cell(row, *o).to_string()).collect();
        parts.join("\u{1f}")
    }

    fn is_absent(row: &Row, identity: &[usize]) -> bool {
        !identity.is_empty() && identity.iter().all(|o| Self::cell(row, *o).is_null())
    }

    /// Build one value from one row; collections start empty.
    fn build(activator: &ObjectActivator, row: &Row) -> Value {
        match activator {
            ObjectActivator::Primitive { ordinal } => Self::cell(row, *ordinal),
            ObjectActivator::Complex { identity, members, .. } => {
                if Self::is_absent(row, identity) {
                    return Value::Null;
                }
                let mut object = Map::new();
                for (name, member) in members {
                    object.insert(name.clone(), Self::build(member, row));
                }
                Value::Object(object)
            }
            ObjectActivator::Collection { .. } => Value::Array(vec![]),
        }
    }

    /// Append this row's collection elements below `target`.
    fn merge(activator: &ObjectActivator, row: &Row, target: &mut Value, path: &str, seen: &mut HashSet<String>) {
        let ObjectActivator::Complex { members, .. } = activator else {
            return;
        };
        let Value::Object(object) = target else {
            return;
        };
        for (name, member) in members {
            let member_path = format!("{}/{}", path, name);
            match member {
                ObjectActivator::Collection { element } => {
                    let identity = element.element_identity();
                    if Self::is_absent(row, &identity) {
                        continue;
                    }
                    let element_key = format!("{}#{}", member_path, Self::identity_key(row, &identity));
                    if !seen.insert(element_key) {
                        continue;
                    }
                    if let Some(Value::Array(items)) = object.get_mut(name) {
                        items.push(Self::build(element, row));
                    }
                }
                ObjectActivator::Complex { .. } if member.contains_collection() => {
                    if let Some(child) = object.get_mut(name) {
                        Self::merge(member, row, child, &member_path, seen);
                    }
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::mapping::Constructor;

    fn prim(ordinal: usize) -> ObjectActivator {
        ObjectActivator::Primitive { ordinal }
    }

    fn user_with_orders() -> ObjectActivator {
        ObjectActivator::Complex {
            constructor: Constructor::Entity("User".into()),
            identity: vec![0],
            members: vec![
                ("id".into(), prim(0)),
                ("name".into(), prim(1)),
                ("orders".into(), ObjectActivator::Collection { element: Box::new(ObjectActivator::Complex {
                    constructor: Constructor::Entity("Order".into()),
                    identity: vec![2],
                    members: vec![("id".into(), prim(2)), ("amount".into(), prim(3))],
                }) }),
            ],
        }
    }

    #[test]
    fn flat_rows_map_one_to_one() {
        let activator = ObjectActivator::Complex {
            constructor: Constructor::Anonymous,
            identity: vec![],
            members: vec![("name".into(), prim(1)), ("age".into(), prim(0))],
        };
        let rows = vec![vec![json!(30), json!("Ana")], vec![json!(41), json!("Rui")]];
        let values = ObjectReader::new(&activator).read(&rows);
        assert_eq!(values, vec![json!({"name": "Ana", "age": 30}), json!({"name": "Rui", "age": 41})]);
    }

    #[test]
    fn collection_rows_group_under_their_root() {
        let activator = user_with_orders();
        let rows = vec![
            vec![json!(1), json!("Ana"), json!(10), json!(5.5)],
            vec![json!(1), json!("Ana"), json!(11), json!(7.0)],
            vec![json!(2), json!("Rui"), Value::Null, Value::Null],
            vec![json!(1), json!("Ana"), json!(10), json!(5.5)],
        ];
        let values = ObjectReader::new(&activator).read(&rows);
        assert_eq!(values, vec![
            json!({"id": 1, "name": "Ana", "orders": [{"id": 10, "amount": 5.5}, {"id": 11, "amount": 7.0}]}),
            json!({"id": 2, "name": "Rui", "orders": []}),
        ]);
    }

    #[test]
    fn unmatched_complex_navigation_reads_as_null() {
        let activator = ObjectActivator::Complex {
            constructor: Constructor::Entity("User".into()),
            identity: vec![0],
            members: vec![
                ("id".into(), prim(0)),
                ("city".into(), ObjectActivator::Complex {
                    constructor: Constructor::Entity("City".into()),
                    identity: vec![1],
                    members: vec![("id".into(), prim(1)), ("name".into(), prim(2))],
                }),
            ],
        };
        let rows = vec![vec![json!(1), Value::Null, Value::Null]];
        assert_eq!(ObjectReader::new(&activator).read(&rows), vec![json!({"id": 1, "city": null})]);
    }

    #[test]
    fn collections_below_complex_members_are_merged() {
        let activator = ObjectActivator::Complex {
            constructor: Constructor::Entity("Order".into()),
            identity: vec![0],
            members: vec![
                ("id".into(), prim(0)),
                ("user".into(), user_with_orders_shifted()),
            ],
        };
        let rows = vec![
            vec![json!(7), json!(1), json!("Ana"), json!(10), json!(1.0)],
            vec![json!(7), json!(1), json!("Ana"), json!(11), json!(2.0)],
        ];
        let values = ObjectReader::new(&activator).read(&rows);
        assert_eq!(values.len(), 1);
        assert_eq!(values[0]["user"]["orders"].as_array().map(|a| a.len()), Some(2));
    }

    fn user_with_orders_shifted() -> ObjectActivator {
        ObjectActivator::Complex {
            constructor: Constructor::Entity("User".into()),
            identity: vec![1],
            members: vec![
                ("id".into(), prim(1)),
                ("name".into(), prim(2)),
                ("orders".into(), ObjectActivator::Collection { element: Box::new(ObjectActivator::Complex {
                    constructor: Constructor::Entity("Order".into()),
                    identity: vec![3],
                    members: vec![("id".into(), prim(3)), ("amount".into(), prim(4))],
                }) }),
            ],
        }
    }
}
