use tracing::debug;

use crate::{
    catalog::EntityCatalog,
    config::{CompileContext, CompilerConfig},
    mapping::MappingData,
    planner::CompilationState,
    query::Operator,
    CompileError,
};

/// Entry point: compiles operator chains against one catalog and config.
///
/// The compiler holds only shared references, so one catalog can serve any
/// number of compilers running side by side.
pub struct QueryCompiler<'a> {
    ctx: CompileContext<'a>,
}

impl<'a> QueryCompiler<'a> {
    pub fn new(catalog: &'a dyn EntityCatalog, config: &'a CompilerConfig) -> Self {
        Self { ctx: CompileContext::new(catalog, config) }
    }

    pub fn context(&self) -> &CompileContext<'a> {
        &self.ctx
    }

    /// Initial state reading every row of `entity`.
    pub fn root(&self, entity: &str) -> Result<CompilationState, CompileError> {
        CompilationState::root(entity, &self.ctx)
    }

    pub fn accept(&self, state: CompilationState, op: Operator) -> Result<CompilationState, CompileError> {
        state.accept(op, &self.ctx)
    }

    /// Feed `operators` in order, stopping at the first failure.
    pub fn build(&self, entity: &str, operators: impl IntoIterator<Item = Operator>) -> Result<CompilationState, CompileError> {
        let mut state = self.root(entity)?;
        for op in operators {
            state = self.accept(state, op)?;
        }
        Ok(state)
    }

    pub fn materialize(&self, state: CompilationState) -> Result<MappingData, CompileError> {
        state.materialize(&self.ctx)
    }

    pub fn compile(&self, entity: &str, operators: impl IntoIterator<Item = Operator>) -> Result<MappingData, CompileError> {
        debug!(entity, "compiling query");
        let state = self.build(entity, operators)?;
        self.materialize(state)
    }
}
