use indexmap::IndexMap;

use crate::{lambda::Parameter, mapping::ObjectModel};

/// Lambda parameter -> object model bindings of one lexical scope.
///
/// Scopes are never mutated once handed to a parser: entering a nested
/// lambda clones the bindings and adds one more. Re-binding a parameter that
/// is already present shadows the outer binding inside the new scope only.
#[derive(Debug, Clone, Default)]
pub struct ScopeParameters {
    bindings: IndexMap<Parameter, ObjectModel>,
}

impl ScopeParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope holding exactly one binding.
    pub fn single(parameter: &Parameter, model: ObjectModel) -> Self {
        Self::new().clone_with(parameter, model)
    }

    /// Copy of this scope extended with one binding.
    pub fn clone_with(&self, parameter: &Parameter, model: ObjectModel) -> Self {
        let mut bindings = self.bindings.clone();
        bindings.insert(parameter.clone(), model);
        Self { bindings }
    }

    pub fn get(&self, parameter: &Parameter) -> Option<&ObjectModel> {
        self.bindings.get(parameter)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::SqlExpr;

    #[test]
    fn clone_with_leaves_the_parent_untouched() {
        let p = Parameter::new(1, "a");
        let q = Parameter::new(2, "b");
        let outer = ScopeParameters::single(&p, ObjectModel::primitive(SqlExpr::column("T", "x")));
        let inner = outer.clone_with(&q, ObjectModel::primitive(SqlExpr::column("T", "y")));

        assert_eq!(outer.len(), 1);
        assert_eq!(inner.len(), 2);
        assert!(outer.get(&q).is_none());
        assert!(inner.get(&p).is_some());
    }

    #[test]
    fn rebinding_shadows_only_in_the_new_scope() {
        let p = Parameter::new(1, "a");
        let outer = ScopeParameters::single(&p, ObjectModel::primitive(SqlExpr::column("T", "x")));
        let inner = outer.clone_with(&p, ObjectModel::primitive(SqlExpr::column("T1", "x")));

        assert_eq!(inner.len(), 1);
        assert_eq!(inner.get(&p).and_then(|m| m.as_primitive_expr()), Some(&SqlExpr::column("T1", "x")));
        assert_eq!(outer.get(&p).and_then(|m| m.as_primitive_expr()), Some(&SqlExpr::column("T", "x")));
    }
}
