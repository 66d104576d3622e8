use crate::{
    mapping::ObjectModel,
    parser::{ScopeParameters, ScopeTables},
    sql::SqlExpr,
    CompileError,
};

/// Inputs shared by the parsers for one lambda.
pub struct ParseContext<'a> {
    /// parameter -> object model bindings
    pub scope: &'a ScopeParameters,
    /// aliases a parsed column may reference
    pub tables: &'a ScopeTables,
    pub max_depth: usize,
}

impl<'a> ParseContext<'a> {
    pub fn new(scope: &'a ScopeParameters, tables: &'a ScopeTables, max_depth: usize) -> Self {
        Self { scope, tables, max_depth }
    }

    /// Depth of the child node, failing past the configured limit.
    pub fn enter(&self, depth: usize) -> Result<usize, CompileError> {
        if depth >= self.max_depth {
            return Err(CompileError::DepthLimitExceeded(self.max_depth));
        }
        Ok(depth + 1)
    }

    pub fn check_tables(&self, expr: &SqlExpr) -> Result<(), CompileError> {
        for column in expr.columns() {
            if !self.tables.contains(&column.table) {
                return Err(CompileError::TableOutOfScope(column.table.clone()));
            }
        }
        Ok(())
    }

    pub fn check_model_tables(&self, model: &ObjectModel) -> Result<(), CompileError> {
        for leaf in model.primitive_leaves() {
            self.check_tables(leaf)?;
        }
        Ok(())
    }
}
