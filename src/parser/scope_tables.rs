use indexmap::IndexSet;

use crate::sql::unique_name;

/// Table aliases of one compilation.
///
/// `taken` remembers every alias ever handed out so none is reused for the
/// lifetime of the compilation; `visible` is the subset a parsed column may
/// reference from the statement currently being built.
#[derive(Debug, Clone, Default)]
pub struct ScopeTables {
    taken: IndexSet<String>,
    visible: IndexSet<String>,
}

impl ScopeTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.visible.contains(alias)
    }

    pub fn register(&mut self, alias: &str) {
        self.taken.insert(alias.to_string());
        self.visible.insert(alias.to_string());
    }

    /// Reserve and return a fresh alias derived from `prefix`.
    pub fn generate_unique_alias(&mut self, prefix: &str) -> String {
        let alias = unique_name(prefix, |candidate| self.taken.contains(candidate));
        self.register(&alias);
        alias
    }

    /// Reserve a fresh alias for a derived table wrapping everything visible
    /// so far. Afterwards only that alias is visible.
    pub fn enter_derived(&mut self, prefix: &str) -> String {
        let alias = unique_name(prefix, |candidate| self.taken.contains(candidate));
        self.taken.insert(alias.clone());
        self.visible.clear();
        self.visible.insert(alias.clone());
        alias
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.visible.iter().map(String::as_str)
    }
}
