use indexmap::IndexMap;

use crate::{
    catalog::EntityDescriptor,
    mapping::ObjectActivator,
    sql::{SqlExpr, SqlStatement},
};

/// What a complex node materializes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constructor {
    /// Mapped entity, by catalog name
    Entity(String),
    /// Anonymous record built by a projection
    Anonymous,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveObjectModel {
    pub expr: SqlExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComplexObjectModel {
    pub constructor: Constructor,
    /// member names forming the identity of the materialized object
    pub key: Vec<String>,
    pub members: IndexMap<String, ObjectModel>,
    pub condition: Option<SqlExpr>,
    pub filter: Option<SqlExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionObjectModel {
    pub element: Box<ObjectModel>,
    pub condition: Option<SqlExpr>,
    pub filter: Option<SqlExpr>,
}

/// Shape of a materialized value.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectModel {
    Primitive(PrimitiveObjectModel),
    Complex(ComplexObjectModel),
    Collection(CollectionObjectModel),
}

impl ComplexObjectModel {
    pub fn new(constructor: Constructor) -> Self {
        Self {
            constructor,
            key: vec![],
            members: IndexMap::new(),
            condition: None,
            filter: None,
        }
    }

    /// Entity node with one primitive member per column, bound to `table_alias`.
    pub fn for_entity(entity: &EntityDescriptor, table_alias: &str) -> Self {
        let mut model = Self::new(Constructor::Entity(entity.name.clone()));
        model.key = entity.key.clone();
        for property in entity.primitive_properties() {
            model.add_member(&property.name, ObjectModel::primitive(SqlExpr::column(table_alias, property.column_name())));
        }
        model
    }

    pub fn add_member(&mut self, name: &str, model: ObjectModel) {
        self.members.insert(name.to_string(), model);
    }
}

impl ObjectModel {
    pub fn primitive(expr: SqlExpr) -> ObjectModel {
        ObjectModel::Primitive(PrimitiveObjectModel { expr })
    }

    pub fn collection(element: ObjectModel) -> ObjectModel {
        ObjectModel::Collection(CollectionObjectModel { element: Box::new(element), condition: None, filter: None })
    }

    pub fn member(&self, name: &str) -> Option<&ObjectModel> {
        match self {
            ObjectModel::Complex(c) => c.members.get(name),
            _ => None,
        }
    }

    /// Catalog entity materialized by this node (the element's, for a collection).
    pub fn entity_name(&self) -> Option<&str> {
        match self {
            ObjectModel::Complex(ComplexObjectModel { constructor: Constructor::Entity(name), .. }) => Some(name),
            ObjectModel::Collection(c) => c.element.entity_name(),
            _ => None,
        }
    }

    pub fn as_primitive_expr(&self) -> Option<&SqlExpr> {
        match self {
            ObjectModel::Primitive(p) => Some(&p.expr),
            _ => None,
        }
    }

    pub fn contains_collection(&self) -> bool {
        match self {
            ObjectModel::Primitive(_) => false,
            ObjectModel::Complex(c) => c.members.values().any(ObjectModel::contains_collection),
            ObjectModel::Collection(_) => true,
        }
    }

    /// SQL expressions of every primitive leaf outside collections, in member order.
    pub fn primitive_leaves(&self) -> Vec<&SqlExpr> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a SqlExpr>) {
        match self {
            ObjectModel::Primitive(p) => out.push(&p.expr),
            ObjectModel::Complex(c) => {
                for member in c.members.values() {
                    member.collect_leaves(out);
                }
            }
            ObjectModel::Collection(_) => {}
        }
    }

    /// Rebind every primitive leaf to a column of the derived table `table_alias`.
    ///
    /// Each leaf expression is projected by `statement` (reusing an equal
    /// column when there is one) and the new leaf reads that column through
    /// the alias. Conditions and filters stay behind: they belong to the
    /// statement being wrapped.
    pub fn to_new_object_model(&self, statement: &mut SqlStatement, table_alias: &str, column_prefix: &str) -> ObjectModel {
        self.rebind(statement, table_alias, column_prefix, None)
    }

    fn rebind(&self, statement: &mut SqlStatement, table_alias: &str, column_prefix: &str, hint: Option<&str>) -> ObjectModel {
        match self {
            ObjectModel::Primitive(p) => {
                let ordinal = statement.project(&p.expr, hint, column_prefix);
                let alias = statement.columns[ordinal].alias.clone();
                ObjectModel::primitive(SqlExpr::column(table_alias, &alias))
            }
            ObjectModel::Complex(c) => {
                let mut model = ComplexObjectModel::new(c.constructor.clone());
                model.key = c.key.clone();
                for (name, member) in &c.members {
                    model.add_member(name, member.rebind(statement, table_alias, column_prefix, Some(name)));
                }
                ObjectModel::Complex(model)
            }
            ObjectModel::Collection(c) => {
                ObjectModel::collection(c.element.rebind(statement, table_alias, column_prefix, None))
            }
        }
    }

    /// Build the materialization recipe, projecting every leaf into `statement`.
    pub fn generate_activator(&self, statement: &mut SqlStatement, column_prefix: &str) -> ObjectActivator {
        self.activator(statement, column_prefix, None)
    }

    fn activator(&self, statement: &mut SqlStatement, column_prefix: &str, hint: Option<&str>) -> ObjectActivator {
        match self {
            ObjectModel::Primitive(p) => ObjectActivator::Primitive { ordinal: statement.project(&p.expr, hint, column_prefix) },
            ObjectModel::Complex(c) => {
                let members: Vec<(String, ObjectActivator)> = c.members.iter()
                    .map(|(name, member)| (name.clone(), member.activator(statement, column_prefix, Some(name))))
                    .collect();
                let identity = c.key.iter()
                    .filter_map(|k| members.iter().find(|(name, _)| name == k))
                    .filter_map(|(_, a)| match a {
                        ObjectActivator::Primitive { ordinal } => Some(*ordinal),
                        _ => None,
                    })
                    .collect();
                ObjectActivator::Complex { constructor: c.constructor.clone(), identity, members }
            }
            ObjectModel::Collection(c) => ObjectActivator::Collection {
                element: Box::new(c.element.activator(statement, column_prefix, None)),
            },
        }
    }
}
