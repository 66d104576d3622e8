use crate::sql::{JoinClause, SqlStatement};

/// A table-shaped source visible under an alias.
#[derive(Debug, Clone, PartialEq)]
pub enum TableSource {
    /// Physical table
    Table { name: String, alias: String },
    /// Derived table built from a nested statement
    Derived { query: Box<SqlStatement>, alias: String },
}

impl TableSource {
    pub fn table(name: &str, alias: &str) -> Self {
        TableSource::Table { name: name.to_string(), alias: alias.to_string() }
    }

    pub fn derived(query: SqlStatement, alias: &str) -> Self {
        TableSource::Derived { query: Box::new(query), alias: alias.to_string() }
    }

    pub fn alias(&self) -> &str {
        match self {
            TableSource::Table { alias, .. } | TableSource::Derived { alias, .. } => alias,
        }
    }
}

/// Root source of a statement plus the sources joined onto it, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct FromClause {
    pub source: TableSource,
    pub joins: Vec<JoinClause>,
}

impl FromClause {
    pub fn new(source: TableSource) -> Self {
        Self { source, joins: vec![] }
    }

    /// Every alias made visible by this clause.
    pub fn aliases(&self) -> Vec<&str> {
        let mut out = vec![self.source.alias()];
        out.extend(self.joins.iter().map(|j| j.source.alias()));
        out
    }
}
