use thiserror::Error;

/// Failure raised while translating an operator chain.
///
/// Every variant is raised before any statement leaves the compiler; no
/// partial statement is ever handed to the execution layer.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CompileError {
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Not yet implemented: {0}")]
    NotYetImplemented(String),

    #[error("Unknown entity '{0}'")]
    UnknownEntity(String),

    #[error("Entity '{entity}' has no property '{property}'")]
    UnknownProperty { entity: String, property: String },

    #[error("Member '{member}' is not exposed by the bound object model")]
    UnknownMember { member: String },

    #[error("Parameter '{0}' is not bound in the current scope")]
    UnboundParameter(String),

    #[error("Table alias '{0}' is not in scope")]
    TableOutOfScope(String),

    #[error("Lambda expects {expected} parameter(s) but declares {got}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("Nesting exceeds the configured limit of {0}")]
    DepthLimitExceeded(usize),
}

impl CompileError {
    pub fn unsupported(message: impl Into<String>) -> Self {
        CompileError::UnsupportedOperation(message.into())
    }

    pub fn not_yet_implemented(message: impl Into<String>) -> Self {
        CompileError::NotYetImplemented(message.into())
    }
}

/// Failure raised while loading an entity catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid catalog document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Entity '{entity}' declares key '{key}' which is not a column-backed property")]
    InvalidKey { entity: String, key: String },
}
