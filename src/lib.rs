pub mod error;
pub use error::*;

pub mod config;
pub use config::*;

pub mod catalog;
pub use catalog::{EntityCatalog, EntityDescriptor, MemoryCatalog, PropertyDescriptor, PropertyKind};

pub mod sql;
pub mod lambda;
pub mod mapping;
pub mod parser;
pub mod query;

pub mod planner;
pub use planner::{CompilationState, QueryCompiler};

#[cfg(test)]
mod test_fixtures;
