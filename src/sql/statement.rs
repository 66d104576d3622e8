use crate::sql::{unique_name, FromClause, Ordering, SqlExpr};

/// One projected column of a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSegment {
    pub expr: SqlExpr,
    pub alias: String,
}

/// SELECT-shaped statement tree handed to the rendering/execution layer.
///
/// `columns` only ever grows: projecting an expression that is already
/// projected (structural equality) returns the existing column.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub from: FromClause,
    pub columns: Vec<ColumnSegment>,
    pub condition: Option<SqlExpr>,
    pub group_by: Vec<SqlExpr>,
    pub having: Option<SqlExpr>,
    pub orderings: Vec<Ordering>,
    pub distinct: bool,
    /// OFFSET
    pub skip: Option<u64>,
    /// LIMIT
    pub take: Option<u64>,
}

impl SqlStatement {
    pub fn new(from: FromClause) -> Self {
        Self {
            from,
            columns: vec![],
            condition: None,
            group_by: vec![],
            having: None,
            orderings: vec![],
            distinct: false,
            skip: None,
            take: None,
        }
    }

    /// Ordinal of the projected column whose expression equals `expr`.
    pub fn find_column(&self, expr: &SqlExpr) -> Option<usize> {
        self.columns.iter().position(|c| &c.expr == expr)
    }

    pub fn is_alias_taken(&self, alias: &str) -> bool {
        self.columns.iter().any(|c| c.alias.eq_ignore_ascii_case(alias))
    }

    pub fn generate_unique_column_alias(&self, prefix: &str) -> String {
        unique_name(prefix, |candidate| self.is_alias_taken(candidate))
    }

    /// Project `expr` and return its ordinal, reusing an equal column.
    ///
    /// A new column is named after `preferred_alias` when given (suffixed on
    /// collision), otherwise after `prefix`.
    pub fn project(&mut self, expr: &SqlExpr, preferred_alias: Option<&str>, prefix: &str) -> usize {
        if let Some(ordinal) = self.find_column(expr) {
            return ordinal;
        }
        let alias = self.generate_unique_column_alias(preferred_alias.unwrap_or(prefix));
        self.columns.push(ColumnSegment { expr: expr.clone(), alias });
        self.columns.len() - 1
    }

    pub fn column_alias(&self, ordinal: usize) -> Option<&str> {
        self.columns.get(ordinal).map(|c| c.alias.as_str())
    }

    pub fn is_paged(&self) -> bool {
        self.skip.is_some() || self.take.is_some()
    }
}
