use crate::mapping::Constructor;

/// Recipe turning one result row (plus, for collections, its sibling rows)
/// into a value. Ordinals index the statement's projected columns.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectActivator {
    Primitive { ordinal: usize },
    Complex {
        constructor: Constructor,
        /// ordinals of the key columns; all NULL means "no object"
        identity: Vec<usize>,
        members: Vec<(String, ObjectActivator)>,
    },
    /// Filled from every row sharing the owner's root identity
    Collection { element: Box<ObjectActivator> },
}

impl ObjectActivator {
    pub fn contains_collection(&self) -> bool {
        match self {
            ObjectActivator::Primitive { .. } => false,
            ObjectActivator::Complex { members, .. } => members.iter().any(|(_, m)| m.contains_collection()),
            ObjectActivator::Collection { .. } => true,
        }
    }

    /// Ordinals of every column read outside collections. Rows agreeing on
    /// all of them materialize the same root object.
    pub fn root_identity(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_root_ordinals(&mut out);
        out
    }

    fn collect_root_ordinals(&self, out: &mut Vec<usize>) {
        match self {
            ObjectActivator::Primitive { ordinal } => {
                if !out.contains(ordinal) {
                    out.push(*ordinal);
                }
            }
            ObjectActivator::Complex { members, .. } => {
                for (_, member) in members {
                    member.collect_root_ordinals(out);
                }
            }
            ObjectActivator::Collection { .. } => {}
        }
    }

    /// Identity of a collection element: its key columns, or every direct
    /// primitive column when the element has no key.
    pub fn element_identity(&self) -> Vec<usize> {
        match self {
            ObjectActivator::Complex { identity, .. } if !identity.is_empty() => identity.clone(),
            other => other.root_identity(),
        }
    }
}
