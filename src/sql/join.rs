use crate::sql::{SqlExpr, TableSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub source: TableSource,
    pub on: SqlExpr,
}

impl JoinClause {
    pub fn new(join_type: JoinType, source: TableSource, on: SqlExpr) -> Self {
        Self { join_type, source, on }
    }
}
