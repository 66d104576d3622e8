use crate::{
    config::CompileContext,
    lambda::Lambda,
    mapping::{ComplexObjectModel, Constructor, ObjectModel},
    parser::{
        FilterPredicateParser, GeneralExpressionParser, GroupKeySelectorParser, ParseContext, ScopeParameters,
        ScopeTables, SelectorResolver,
    },
    query::{GroupBySpec, OrderKind},
    sql::{AggregateCall, AggregateFunction, FromClause, Ordering, OrderType, SqlExpr, SqlStatement, TableSource},
    CompileError,
};

/// Working state of the statement being built.
///
/// A new accumulator is created at the query root and by every promotion,
/// projection, aggregate and grouping; none is shared between statements.
#[derive(Debug, Clone)]
pub struct QueryAccumulator {
    /// bindings inherited by every lambda parsed against this statement
    pub scope_parameters: ScopeParameters,
    pub scope_tables: ScopeTables,
    pub from: FromClause,
    pub condition: Option<SqlExpr>,
    pub group_segments: Vec<SqlExpr>,
    pub having: Option<SqlExpr>,
    pub orderings: Vec<Ordering>,
    /// orderings were carried over by a promotion, not requested
    pub inherit_orderings: bool,
    pub result_model: ObjectModel,
}

impl QueryAccumulator {
    /// Accumulator reading every column of `entity` from its table.
    pub fn root(entity: &str, ctx: &CompileContext) -> Result<Self, CompileError> {
        let descriptor = ctx.catalog.entity(entity)
            .ok_or_else(|| CompileError::UnknownEntity(entity.to_string()))?;

        let mut scope_tables = ScopeTables::new();
        let alias = scope_tables.generate_unique_alias(&descriptor.table);
        let result_model = ObjectModel::Complex(ComplexObjectModel::for_entity(descriptor, &alias));

        Ok(Self::new(scope_tables, FromClause::new(TableSource::table(&descriptor.table, &alias)), result_model))
    }

    pub fn new(scope_tables: ScopeTables, from: FromClause, result_model: ObjectModel) -> Self {
        Self {
            scope_parameters: ScopeParameters::new(),
            scope_tables,
            from,
            condition: None,
            group_segments: vec![],
            having: None,
            orderings: vec![],
            inherit_orderings: false,
            result_model,
        }
    }

    /// Statement with this accumulator's clauses and no projected columns yet.
    pub fn create_sql_query(&self) -> SqlStatement {
        let mut statement = SqlStatement::new(self.from.clone());
        statement.condition = self.condition.clone();
        statement.group_by = self.group_segments.clone();
        statement.having = self.having.clone();
        statement.orderings = self.orderings.clone();
        statement
    }

    pub fn append_condition(&mut self, condition: SqlExpr) {
        self.condition = Some(SqlExpr::and_also(self.condition.take(), condition));
    }

    pub fn append_having(&mut self, condition: SqlExpr) {
        self.having = Some(SqlExpr::and_also(self.having.take(), condition));
    }

    /// Fail when the result carries a collection: the joined child rows would
    /// be treated as root rows by `operation`.
    pub fn ensure_no_collection(&self, operation: &str) -> Result<(), CompileError> {
        if self.result_model.contains_collection() {
            return Err(CompileError::not_yet_implemented(format!("{} over a result with included collections", operation)));
        }
        Ok(())
    }

    /// Scope of a single-parameter lambda whose parameter denotes `model`.
    pub(crate) fn unary_scope(&self, lambda: &Lambda, model: &ObjectModel) -> Result<ScopeParameters, CompileError> {
        lambda.expect_arity(1)?;
        Ok(self.scope_parameters.clone_with(lambda.first_parameter()?, model.clone()))
    }

    pub(crate) fn parse_context<'a>(&'a self, scope: &'a ScopeParameters, ctx: &CompileContext) -> ParseContext<'a> {
        ParseContext::new(scope, &self.scope_tables, ctx.config.max_expression_depth)
    }

    pub fn filter(&mut self, predicate: &Lambda, ctx: &CompileContext) -> Result<(), CompileError> {
        let scope = self.unary_scope(predicate, &self.result_model)?;
        let condition = FilterPredicateParser::parse(predicate, &self.parse_context(&scope, ctx))?;
        self.append_condition(condition);
        Ok(())
    }

    pub fn order_by(&mut self, key: &Lambda, order_type: OrderType, kind: OrderKind, ctx: &CompileContext) -> Result<(), CompileError> {
        let scope = self.unary_scope(key, &self.result_model)?;
        let expr = GeneralExpressionParser::parse(key, &self.parse_context(&scope, ctx))?;

        if self.inherit_orderings || kind == OrderKind::Primary {
            self.orderings.clear();
            self.inherit_orderings = false;
        }
        self.orderings.push(Ordering::new(expr, order_type));
        Ok(())
    }

    /// Replace the result model by the projection of `selector`, keeping
    /// every clause.
    pub fn select(mut self, selector: &Lambda, ctx: &CompileContext) -> Result<Self, CompileError> {
        self.ensure_no_collection("Select")?;
        let scope = self.unary_scope(selector, &self.result_model)?;
        let model = SelectorResolver::resolve(selector, &self.parse_context(&scope, ctx))?;
        self.result_model = model;
        Ok(self)
    }

    /// Accumulator of a single aggregate over the rows filtered so far.
    pub fn aggregate(&self, function: AggregateFunction, arguments: &[Lambda], distinct: bool, ctx: &CompileContext) -> Result<Self, CompileError> {
        self.ensure_no_collection("Aggregate")?;
        if arguments.is_empty() && !function.allows_no_argument() {
            return Err(CompileError::unsupported(format!("{} requires an argument", function.sql_name())));
        }

        let mut args = Vec::with_capacity(arguments.len());
        for argument in arguments {
            let scope = self.unary_scope(argument, &self.result_model)?;
            args.push(GeneralExpressionParser::parse(argument, &self.parse_context(&scope, ctx))?);
        }
        let call = SqlExpr::Aggregate(AggregateCall::new(function, args, distinct));

        let mut next = Self::new(self.scope_tables.clone(), self.from.clone(), ObjectModel::primitive(call));
        next.scope_parameters = self.scope_parameters.clone();
        next.condition = self.condition.clone();
        Ok(next)
    }

    /// Group the rows by the key selectors and project each group.
    ///
    /// Lambdas after the key selectors see the group: a record exposing
    /// `key` (the key model) and `elements` (the grouped element model, only
    /// meaningful inside aggregate arguments).
    ///
    /// Without explicit orderings in `spec` the earlier orderings are kept
    /// as they are; the caller owns whether they are valid over the groups.
    pub fn group_by(mut self, spec: &GroupBySpec, ctx: &CompileContext) -> Result<Self, CompileError> {
        self.ensure_no_collection("GroupBy")?;
        if spec.key_selectors.is_empty() {
            return Err(CompileError::unsupported("GroupBy without key selectors"));
        }

        let mut key_models = Vec::with_capacity(spec.key_selectors.len());
        for selector in &spec.key_selectors {
            let scope = self.unary_scope(selector, &self.result_model)?;
            let parse_ctx = self.parse_context(&scope, ctx);
            let keys = GroupKeySelectorParser::parse(selector, &parse_ctx)?;
            key_models.push(SelectorResolver::resolve(selector, &parse_ctx)?);
            self.group_segments.extend(keys);
        }

        let key_model = if key_models.len() == 1 {
            key_models.remove(0)
        } else {
            let mut record = ComplexObjectModel::new(Constructor::Anonymous);
            for (i, model) in key_models.into_iter().enumerate() {
                record.add_member(&format!("item{}", i + 1), model);
            }
            ObjectModel::Complex(record)
        };

        let mut group = ComplexObjectModel::new(Constructor::Anonymous);
        group.add_member("key", key_model);
        group.add_member("elements", self.result_model.clone());
        let group_model = ObjectModel::Complex(group);

        for predicate in &spec.having {
            let scope = self.unary_scope(predicate, &group_model)?;
            let condition = FilterPredicateParser::parse(predicate, &self.parse_context(&scope, ctx))?;
            self.append_having(condition);
        }

        if !spec.orderings.is_empty() {
            let mut orderings = Vec::with_capacity(spec.orderings.len());
            for (key, order_type) in &spec.orderings {
                let scope = self.unary_scope(key, &group_model)?;
                let expr = GeneralExpressionParser::parse(key, &self.parse_context(&scope, ctx))?;
                orderings.push(Ordering::new(expr, *order_type));
            }
            self.orderings = orderings;
            self.inherit_orderings = false;
        }

        let scope = self.unary_scope(&spec.selector, &group_model)?;
        let model = SelectorResolver::resolve(&spec.selector, &self.parse_context(&scope, ctx))?;
        self.result_model = model;
        Ok(self)
    }
}
