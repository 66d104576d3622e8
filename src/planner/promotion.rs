use tracing::debug;

use crate::{
    config::CompileContext,
    lambda::Lambda,
    mapping::ObjectModel,
    parser::{FilterPredicateParser, ParseContext, ScopeParameters, ScopeTables},
    planner::{CompilationState, QueryAccumulator},
    sql::{FromClause, JoinClause, JoinType, Ordering, SqlExpr, SqlStatement, TableSource},
    CompileError,
};

/// This query prepared as the right-hand side of a join.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinQueryResult {
    /// result model rebound to the derived table
    pub result_model: ObjectModel,
    pub join_clause: JoinClause,
}

impl CompilationState {
    /// Wrap everything accumulated so far as a derived table and continue
    /// from a fresh general state reading from it.
    pub fn as_subquery_state(self, ctx: &CompileContext) -> Result<CompilationState, CompileError> {
        Ok(CompilationState::General(self.promote(ctx)?))
    }

    pub(crate) fn promote(self, ctx: &CompileContext) -> Result<QueryAccumulator, CompileError> {
        self.accumulator().ensure_no_collection("Subquery promotion")?;

        let (mut statement, acc) = self.into_parts();
        let mut scope_tables = acc.scope_tables;
        let alias = scope_tables.enter_derived(&ctx.config.table_alias_prefix);
        let prefix = &ctx.config.column_alias_prefix;

        let result_model = acc.result_model.to_new_object_model(&mut statement, &alias, prefix);
        let before = statement.columns.len();
        let orderings = rebind_orderings(&acc.orderings, &mut statement, &alias, prefix);
        let synthesized = statement.columns.len() - before;

        debug!(
            alias = %alias,
            reused = orderings.len() - synthesized,
            synthesized,
            "promoted statement to derived table"
        );

        let mut next = QueryAccumulator::new(scope_tables, FromClause::new(TableSource::derived(statement, &alias)), result_model);
        next.scope_parameters = acc.scope_parameters;
        next.orderings = orderings;
        next.inherit_orderings = true;
        Ok(next)
    }

    /// This query wrapped as a derived table and joined onto a composing
    /// query, without touching this state.
    ///
    /// `scope` and `scope_tables` belong to the composing query; the derived
    /// alias is reserved in `scope_tables` and the last parameter of
    /// `condition` is bound to the rebound result model.
    pub fn to_join_query_result(
        &self,
        join_type: JoinType,
        condition: &Lambda,
        scope: &ScopeParameters,
        scope_tables: &mut ScopeTables,
        ctx: &CompileContext,
    ) -> Result<JoinQueryResult, CompileError> {
        self.accumulator().ensure_no_collection("Join")?;

        let mut statement = self.create_sql_query();
        let alias = scope_tables.generate_unique_alias(&ctx.config.table_alias_prefix);
        let prefix = &ctx.config.column_alias_prefix;

        let result_model = self.accumulator().result_model.to_new_object_model(&mut statement, &alias, prefix);
        // paging of the inner query depends on its orderings
        rebind_orderings(&self.accumulator().orderings, &mut statement, &alias, prefix);

        let scope = scope.clone_with(condition.last_parameter()?, result_model.clone());
        let parse_ctx = ParseContext::new(&scope, scope_tables, ctx.config.max_expression_depth);
        let on = FilterPredicateParser::parse(condition, &parse_ctx)?;

        debug!(alias = %alias, join = ?join_type, "joined statement as derived table");

        Ok(JoinQueryResult {
            result_model,
            join_clause: JoinClause::new(join_type, TableSource::derived(statement, &alias), on),
        })
    }
}

/// Orderings of the wrapped statement re-expressed over its derived alias.
/// An ordering whose expression is already projected reuses that column.
fn rebind_orderings(orderings: &[Ordering], statement: &mut SqlStatement, alias: &str, prefix: &str) -> Vec<Ordering> {
    let mut out = Vec::with_capacity(orderings.len());
    for ordering in orderings {
        let ordinal = statement.project(&ordering.expr, None, prefix);
        let column = statement.columns[ordinal].alias.clone();
        out.push(Ordering::new(SqlExpr::column(alias, &column), ordering.order_type));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::CompilerConfig,
        lambda::{Expr, Parameter},
        query::Operator,
        sql::OrderType,
        test_fixtures::fixtures,
    };

    fn users_ordered_by(ctx: &CompileContext, key: Lambda) -> CompilationState {
        CompilationState::root("User", ctx).unwrap()
            .accept(Operator::order_by(key), ctx).unwrap()
            .accept(Operator::Take(3), ctx).unwrap()
    }

    fn derived(acc: &QueryAccumulator) -> (&SqlStatement, &str) {
        match &acc.from.source {
            TableSource::Derived { query, alias } => (query.as_ref(), alias.as_str()),
            other => panic!("expected derived source, got {other:?}"),
        }
    }

    #[test]
    fn ordering_on_a_projected_column_adds_no_column() {
        let catalog = fixtures::catalog();
        let config = CompilerConfig::default();
        let ctx = CompileContext::new(&catalog, &config);
        let p = Parameter::new(1, "u");

        let state = users_ordered_by(&ctx, Lambda::unary(p, |u| u.member("name")));
        let acc = state.promote(&ctx).unwrap();
        let (inner, alias) = derived(&acc);

        assert_eq!(alias, "T");
        assert_eq!(inner.columns.len(), 4);
        assert_eq!(inner.take, Some(3));
        assert_eq!(acc.orderings, vec![Ordering::asc(SqlExpr::column("T", "name"))]);
        assert!(acc.inherit_orderings);
        assert_eq!(acc.result_model.member("age"), Some(&ObjectModel::primitive(SqlExpr::column("T", "age"))));
    }

    #[test]
    fn ordering_on_an_unprojected_expression_adds_one_column() {
        let catalog = fixtures::catalog();
        let config = CompilerConfig::default();
        let ctx = CompileContext::new(&catalog, &config);
        let p = Parameter::new(1, "u");

        let state = users_ordered_by(&ctx, Lambda::unary(p, |u| Expr::call("upper", vec![u.member("name")])));
        let acc = state.promote(&ctx).unwrap();
        let (inner, _) = derived(&acc);

        assert_eq!(inner.columns.len(), 5);
        assert_eq!(inner.columns[4].alias, "C");
        assert_eq!(inner.columns[4].expr.to_string(), "UPPER(users.name)");
        assert_eq!(acc.orderings, vec![Ordering::asc(SqlExpr::column("T", "C"))]);
    }

    #[test]
    fn successive_promotions_get_fresh_aliases() {
        let catalog = fixtures::catalog();
        let config = CompilerConfig::default();
        let ctx = CompileContext::new(&catalog, &config);
        let p = Parameter::new(1, "u");

        let state = users_ordered_by(&ctx, Lambda::unary(p, |u| u.member("id")))
            .accept(Operator::Skip(1), &ctx).unwrap()
            .accept(Operator::Distinct, &ctx).unwrap();
        let acc = state.promote(&ctx).unwrap();

        let (inner, alias) = derived(&acc);
        assert_eq!(alias, "T2");
        assert!(inner.distinct);
        let (paged, paged_alias) = match &inner.from.source {
            TableSource::Derived { query, alias } => (query, alias),
            other => panic!("expected derived source, got {other:?}"),
        };
        assert_eq!(paged_alias, "T1");
        assert_eq!(paged.skip, Some(1));
        assert_eq!(acc.orderings, vec![Ordering::new(SqlExpr::column("T2", "id"), OrderType::Asc)]);
    }

    #[test]
    fn join_result_is_a_pure_read_of_the_inner_state() {
        let catalog = fixtures::catalog();
        let config = CompilerConfig::default();
        let ctx = CompileContext::new(&catalog, &config);

        let inner = CompilationState::root("Order", &ctx).unwrap();
        let before = format!("{inner:?}");

        let outer = CompilationState::root("User", &ctx).unwrap().promote(&ctx).unwrap();
        let u = Parameter::new(1, "u");
        let o = Parameter::new(2, "o");
        let condition = Lambda::binary(u.clone(), o, |u, o| u.member("id").eq(o.member("user_id")));
        let scope = outer.scope_parameters.clone_with(&u, outer.result_model.clone());
        let mut tables = outer.scope_tables.clone();

        let joined = inner.to_join_query_result(JoinType::Inner, &condition, &scope, &mut tables, &ctx).unwrap();

        assert_eq!(format!("{inner:?}"), before);
        assert_eq!(joined.join_clause.source.alias(), "T1");
        assert_eq!(joined.join_clause.on.to_string(), "(T.id = T1.user_id)");
        assert_eq!(joined.result_model.member("amount"), Some(&ObjectModel::primitive(SqlExpr::column("T1", "amount"))));
    }

    #[test]
    fn collections_block_promotion() {
        let catalog = fixtures::catalog();
        let config = CompilerConfig::default();
        let ctx = CompileContext::new(&catalog, &config);

        let state = CompilationState::root("User", &ctx).unwrap()
            .accept(Operator::include("orders"), &ctx).unwrap();
        assert!(matches!(state.as_subquery_state(&ctx), Err(CompileError::NotYetImplemented(_))));
    }
}
