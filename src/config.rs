use serde::{Deserialize, Serialize};

use crate::catalog::EntityCatalog;

/// Knobs of the compiler. Every field has a default, so a partial JSON
/// document is enough to override a single value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// prefix of derived-table aliases (`T`, `T1`, `T2`, ...)
    pub table_alias_prefix: String,
    /// prefix of synthesized column aliases (`C`, `C1`, ...)
    pub column_alias_prefix: String,
    pub max_expression_depth: usize,
    pub max_navigation_depth: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            table_alias_prefix: "T".to_string(),
            column_alias_prefix: "C".to_string(),
            max_expression_depth: 128,
            max_navigation_depth: 16,
        }
    }
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_alias_prefixes(table: &str, column: &str) -> Self {
        Self {
            table_alias_prefix: table.to_string(),
            column_alias_prefix: column.to_string(),
            ..Self::default()
        }
    }
}

/// Read-only inputs shared by every acceptance, parse and materialization call.
#[derive(Clone, Copy)]
pub struct CompileContext<'a> {
    pub catalog: &'a dyn EntityCatalog,
    pub config: &'a CompilerConfig,
}

impl<'a> CompileContext<'a> {
    pub fn new(catalog: &'a dyn EntityCatalog, config: &'a CompilerConfig) -> Self {
        Self { catalog, config }
    }
}
