use serde_json::Value;

use crate::{mapping::{ObjectActivator, ObjectReader, Row}, sql::SqlStatement};

/// Final output of a compilation: the statement to render and execute, and
/// the recipe rebuilding results from its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingData {
    pub statement: SqlStatement,
    pub activator: ObjectActivator,
}

impl MappingData {
    pub fn reader(&self) -> ObjectReader<'_> {
        ObjectReader::new(&self.activator)
    }

    pub fn read(&self, rows: &[Row]) -> Vec<Value> {
        self.reader().read(rows)
    }
}
