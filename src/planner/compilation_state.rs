use tracing::{debug, trace};

use crate::{
    config::CompileContext,
    mapping::MappingData,
    parser::SelectorResolver,
    planner::QueryAccumulator,
    query::{JoinSpec, Operator},
    sql::SqlStatement,
    CompileError,
};

/// Legal-transition set of the query being compiled.
///
/// Each variant owns exactly one accumulator. `Limit` is the combination of
/// a Skip followed by a Take and renders as a single paging construct.
#[derive(Debug, Clone)]
pub enum CompilationState {
    General(QueryAccumulator),
    Skip { acc: QueryAccumulator, count: u64 },
    Take { acc: QueryAccumulator, count: u64 },
    Limit { acc: QueryAccumulator, skip: u64, take: u64 },
    Distinct(QueryAccumulator),
    /// terminal: the query collapsed into one aggregate value
    Aggregate(QueryAccumulator),
    Grouping(QueryAccumulator),
}

impl CompilationState {
    pub fn root(entity: &str, ctx: &CompileContext) -> Result<Self, CompileError> {
        Ok(CompilationState::General(QueryAccumulator::root(entity, ctx)?))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CompilationState::General(_) => "General",
            CompilationState::Skip { .. } => "Skip",
            CompilationState::Take { .. } => "Take",
            CompilationState::Limit { .. } => "Limit",
            CompilationState::Distinct(_) => "Distinct",
            CompilationState::Aggregate(_) => "Aggregate",
            CompilationState::Grouping(_) => "Grouping",
        }
    }

    pub fn accumulator(&self) -> &QueryAccumulator {
        match self {
            CompilationState::General(acc)
            | CompilationState::Skip { acc, .. }
            | CompilationState::Take { acc, .. }
            | CompilationState::Limit { acc, .. }
            | CompilationState::Distinct(acc)
            | CompilationState::Aggregate(acc)
            | CompilationState::Grouping(acc) => acc,
        }
    }

    fn into_accumulator(self) -> QueryAccumulator {
        match self {
            CompilationState::General(acc)
            | CompilationState::Skip { acc, .. }
            | CompilationState::Take { acc, .. }
            | CompilationState::Limit { acc, .. }
            | CompilationState::Distinct(acc)
            | CompilationState::Aggregate(acc)
            | CompilationState::Grouping(acc) => acc,
        }
    }

    /// Feed one operator, returning the state that accepts the next one.
    pub fn accept(self, op: Operator, ctx: &CompileContext) -> Result<CompilationState, CompileError> {
        trace!(state = self.kind(), operator = op.kind(), "accepting operator");
        use CompilationState as S;

        match (self, op) {
            (S::Aggregate(_), op) => {
                Err(CompileError::unsupported(format!("{} after an aggregate", op.kind())))
            }
            (S::General(acc), op) => Self::accept_general(acc, op, ctx),

            (state, Operator::Join(spec)) => state.join(*spec, ctx),
            (state, Operator::Include(chain)) => Err(CompileError::unsupported(format!(
                "Include of '{}' after {}", chain.path(), state.kind()
            ))),

            (S::Skip { acc, count }, Operator::Select(selector)) => {
                Ok(S::Skip { acc: acc.select(&selector, ctx)?, count })
            }
            (S::Skip { acc, count }, Operator::Skip(more)) => Ok(S::Skip { acc, count: count.saturating_add(more) }),
            (S::Skip { acc, count }, Operator::Take(take)) => Ok(S::Limit { acc, skip: count, take }),

            (S::Take { acc, count }, Operator::Select(selector)) => {
                Ok(S::Take { acc: acc.select(&selector, ctx)?, count })
            }
            (S::Take { acc, count }, Operator::Take(take)) => Ok(S::Take { acc, count: count.min(take) }),

            (S::Limit { acc, skip, take }, Operator::Select(selector)) => {
                Ok(S::Limit { acc: acc.select(&selector, ctx)?, skip, take })
            }
            (S::Limit { acc, skip, take }, Operator::Take(more)) => Ok(S::Limit { acc, skip, take: take.min(more) }),

            (S::Distinct(acc), Operator::Distinct) => Ok(S::Distinct(acc)),

            (S::Grouping(acc), Operator::Select(selector)) => Ok(S::Grouping(acc.select(&selector, ctx)?)),
            (S::Grouping(acc), Operator::Skip(count)) => Ok(S::Skip { acc, count }),
            (S::Grouping(acc), Operator::Take(count)) => Ok(S::Take { acc, count }),
            (S::Grouping(acc), Operator::Distinct) => Ok(S::Distinct(acc)),

            (state, op) => state.as_subquery_state(ctx)?.accept(op, ctx),
        }
    }

    fn accept_general(mut acc: QueryAccumulator, op: Operator, ctx: &CompileContext) -> Result<CompilationState, CompileError> {
        use CompilationState as S;

        match op {
            Operator::Where(predicate) => {
                acc.filter(&predicate, ctx)?;
                Ok(S::General(acc))
            }
            Operator::OrderBy { key, order_type, kind } => {
                acc.order_by(&key, order_type, kind, ctx)?;
                Ok(S::General(acc))
            }
            Operator::Select(selector) => Ok(S::General(acc.select(&selector, ctx)?)),
            Operator::Skip(count) => {
                acc.ensure_no_collection("Skip")?;
                Ok(S::Skip { acc, count })
            }
            Operator::Take(count) => {
                acc.ensure_no_collection("Take")?;
                Ok(S::Take { acc, count })
            }
            Operator::Distinct => {
                acc.ensure_no_collection("Distinct")?;
                Ok(S::Distinct(acc))
            }
            Operator::Aggregate { function, arguments, distinct } => {
                Ok(S::Aggregate(acc.aggregate(function, &arguments, distinct, ctx)?))
            }
            Operator::GroupBy(spec) => Ok(S::Grouping(acc.group_by(&spec, ctx)?)),
            Operator::Include(chain) => {
                acc.include(&chain, ctx)?;
                Ok(S::General(acc))
            }
            Operator::Join(spec) => Self::join(S::General(acc), *spec, ctx),
        }
    }

    /// Join `spec.inner` onto this query. The outer side is always promoted
    /// first so the join composes with whatever it has accumulated.
    fn join(self, spec: JoinSpec, ctx: &CompileContext) -> Result<CompilationState, CompileError> {
        spec.condition.expect_arity(2)?;
        spec.selector.expect_arity(2)?;

        let mut outer = self.promote(ctx)?;
        let outer_param = spec.condition.first_parameter()?;
        let scope = outer.scope_parameters.clone_with(outer_param, outer.result_model.clone());

        let joined = spec.inner.to_join_query_result(spec.join_type, &spec.condition, &scope, &mut outer.scope_tables, ctx)?;
        outer.from.joins.push(joined.join_clause);

        let scope = outer.scope_parameters
            .clone_with(spec.selector.first_parameter()?, outer.result_model.clone())
            .clone_with(spec.selector.last_parameter()?, joined.result_model);
        let model = SelectorResolver::resolve(&spec.selector, &outer.parse_context(&scope, ctx))?;
        outer.result_model = model;

        Ok(CompilationState::General(outer))
    }

    /// Statement of this state with no projected columns yet: the
    /// accumulator's clauses plus the paging or DISTINCT of the variant.
    pub fn create_sql_query(&self) -> SqlStatement {
        let mut statement = self.accumulator().create_sql_query();
        match self {
            CompilationState::Skip { count, .. } => statement.skip = Some(*count),
            CompilationState::Take { count, .. } => statement.take = Some(*count),
            CompilationState::Limit { skip, take, .. } => {
                statement.skip = Some(*skip);
                statement.take = Some(*take);
            }
            CompilationState::Distinct(_) => statement.distinct = true,
            CompilationState::General(_) | CompilationState::Aggregate(_) | CompilationState::Grouping(_) => {}
        }
        statement
    }

    /// Final statement plus the recipe rebuilding results from its rows.
    pub fn materialize(self, ctx: &CompileContext) -> Result<MappingData, CompileError> {
        let mut statement = self.create_sql_query();
        let acc = self.into_accumulator();
        let activator = acc.result_model.generate_activator(&mut statement, &ctx.config.column_alias_prefix);

        debug!(
            columns = statement.columns.len(),
            joins = statement.from.joins.len(),
            paged = statement.is_paged(),
            "materialized statement"
        );
        Ok(MappingData { statement, activator })
    }

    pub(crate) fn into_parts(self) -> (SqlStatement, QueryAccumulator) {
        let statement = self.create_sql_query();
        (statement, self.into_accumulator())
    }
}
