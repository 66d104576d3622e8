use crate::{
    lambda::{BinaryOp, Expr, Lambda},
    mapping::ObjectModel,
    parser::{FilterPredicateParser, MemberResolver, ParseContext},
    sql::{AggregateCall, ArithmeticOp, ComparatorOp, Literal, SqlExpr},
    CompileError,
};

/// Translates a lambda body into a scalar SQL expression.
pub struct GeneralExpressionParser;

impl GeneralExpressionParser {
    pub fn parse(lambda: &Lambda, ctx: &ParseContext) -> Result<SqlExpr, CompileError> {
        Self::parse_expr(&lambda.body, ctx, 0)
    }

    pub fn parse_expr(expr: &Expr, ctx: &ParseContext, depth: usize) -> Result<SqlExpr, CompileError> {
        let depth = ctx.enter(depth)?;
        match expr {
            Expr::Parameter(_) | Expr::Member { .. } => Self::parse_member(expr, ctx, depth),

            Expr::Constant(literal) => Ok(SqlExpr::Literal(literal.clone())),

            Expr::Binary { op, left, right } => Self::parse_binary(*op, left, right, ctx, depth),

            Expr::Not(inner) => {
                let inner = FilterPredicateParser::ensure_predicate(Self::parse_expr(inner, ctx, depth)?);
                Ok(SqlExpr::Not(Box::new(inner)))
            }

            Expr::Negate(inner) => Ok(SqlExpr::Negate(Box::new(Self::parse_expr(inner, ctx, depth)?))),

            Expr::Call { function, args } => {
                let mut parsed = Vec::with_capacity(args.len());
                for arg in args {
                    parsed.push(Self::parse_expr(arg, ctx, depth)?);
                }
                Ok(SqlExpr::Function { name: function.to_ascii_uppercase(), args: parsed })
            }

            Expr::In { expr, list } => {
                let expr = Self::parse_expr(expr, ctx, depth)?;
                let mut parsed = Vec::with_capacity(list.len());
                for item in list {
                    parsed.push(Self::parse_expr(item, ctx, depth)?);
                }
                Ok(SqlExpr::InList { expr: Box::new(expr), list: parsed, negated: false })
            }

            Expr::Aggregate { function, argument, distinct } => {
                let args = match argument {
                    Some(argument) => vec![Self::parse_expr(argument, ctx, depth)?],
                    None if function.allows_no_argument() => vec![],
                    None => return Err(CompileError::unsupported(format!("{} requires an argument", function.sql_name()))),
                };
                Ok(SqlExpr::Aggregate(AggregateCall::new(*function, args, *distinct)))
            }

            Expr::New { .. } => Err(CompileError::unsupported("record construction is not a scalar expression")),
        }
    }

    fn parse_member(expr: &Expr, ctx: &ParseContext, depth: usize) -> Result<SqlExpr, CompileError> {
        match MemberResolver::resolve_model(expr, ctx, depth)? {
            Some(ObjectModel::Primitive(p)) => {
                ctx.check_tables(&p.expr)?;
                Ok(p.expr.clone())
            }
            Some(_) => Err(CompileError::unsupported(format!("'{}' is not a scalar member", Self::describe(expr)))),
            None => Err(CompileError::unsupported(format!("member access '{}' is not rooted at a parameter", Self::describe(expr)))),
        }
    }

    fn parse_binary(op: BinaryOp, left: &Expr, right: &Expr, ctx: &ParseContext, depth: usize) -> Result<SqlExpr, CompileError> {
        let arithmetic = match op {
            BinaryOp::Eq => return Self::parse_comparison(ComparatorOp::Eq, left, right, ctx, depth),
            BinaryOp::NotEq => return Self::parse_comparison(ComparatorOp::NotEq, left, right, ctx, depth),
            BinaryOp::Lt => return Self::parse_comparison(ComparatorOp::Lt, left, right, ctx, depth),
            BinaryOp::LtEq => return Self::parse_comparison(ComparatorOp::LtEq, left, right, ctx, depth),
            BinaryOp::Gt => return Self::parse_comparison(ComparatorOp::Gt, left, right, ctx, depth),
            BinaryOp::GtEq => return Self::parse_comparison(ComparatorOp::GtEq, left, right, ctx, depth),
            BinaryOp::And | BinaryOp::Or => {
                let l = Self::parse_expr(left, ctx, depth)?;
                let r = Self::parse_expr(right, ctx, depth)?;
                return Ok(Self::flatten(op == BinaryOp::And, l, r));
            }
            BinaryOp::Add => ArithmeticOp::Add,
            BinaryOp::Sub => ArithmeticOp::Sub,
            BinaryOp::Mul => ArithmeticOp::Mul,
            BinaryOp::Div => ArithmeticOp::Div,
            BinaryOp::Mod => ArithmeticOp::Mod,
        };
        let l = Self::parse_expr(left, ctx, depth)?;
        let r = Self::parse_expr(right, ctx, depth)?;
        Ok(SqlExpr::Arithmetic { left: Box::new(l), op: arithmetic, right: Box::new(r) })
    }

    fn parse_comparison(op: ComparatorOp, left: &Expr, right: &Expr, ctx: &ParseContext, depth: usize) -> Result<SqlExpr, CompileError> {
        let l = Self::parse_expr(left, ctx, depth)?;
        let r = Self::parse_expr(right, ctx, depth)?;

        let subject = match (l, r) {
            (SqlExpr::Literal(Literal::Null), SqlExpr::Literal(Literal::Null)) => {
                return Err(CompileError::unsupported("comparison between two NULL constants"));
            }
            (subject, SqlExpr::Literal(Literal::Null)) | (SqlExpr::Literal(Literal::Null), subject) => subject,
            (l, r) => return Ok(SqlExpr::compare(l, op, r)),
        };

        match op {
            ComparatorOp::Eq => Ok(SqlExpr::IsNull { expr: Box::new(subject), negated: false }),
            ComparatorOp::NotEq => Ok(SqlExpr::IsNull { expr: Box::new(subject), negated: true }),
            other => Err(CompileError::unsupported(format!("ordering comparison '{}' against NULL", other))),
        }
    }

    fn flatten(and: bool, l: SqlExpr, r: SqlExpr) -> SqlExpr {
        let l = FilterPredicateParser::ensure_predicate(l);
        let r = FilterPredicateParser::ensure_predicate(r);
        let mut parts = Vec::with_capacity(2);
        for side in [l, r] {
            match side {
                SqlExpr::And(more) if and => parts.extend(more),
                SqlExpr::Or(more) if !and => parts.extend(more),
                other => parts.push(other),
            }
        }
        if and { SqlExpr::And(parts) } else { SqlExpr::Or(parts) }
    }

    /// Dotted rendering of a member chain for error messages.
    pub fn describe(expr: &Expr) -> String {
        match expr {
            Expr::Parameter(p) => p.name.clone(),
            Expr::Member { target, member } => format!("{}.{}", Self::describe(target), member),
            other => format!("{:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        lambda::Parameter,
        parser::{ScopeParameters, ScopeTables},
        sql::{AggregateFunction, ComparatorOp},
        test_fixtures::fixtures,
    };

    fn scope_for(p: &Parameter) -> (ScopeParameters, ScopeTables) {
        let scope = ScopeParameters::single(p, fixtures::user_with_city_model());
        let mut tables = ScopeTables::new();
        tables.register("users");
        tables.register("cities");
        (scope, tables)
    }

    #[test]
    fn member_comparison_becomes_column_comparison() {
        let p = Parameter::new(1, "u");
        let (scope, tables) = scope_for(&p);
        let ctx = ParseContext::new(&scope, &tables, 32);
        let lambda = Lambda::unary(p, |u| u.member("age").gt(Expr::constant(18)));

        let expr = GeneralExpressionParser::parse(&lambda, &ctx).unwrap();
        assert_eq!(expr, SqlExpr::compare(SqlExpr::column("users", "age"), ComparatorOp::Gt, SqlExpr::literal(18)));
    }

    #[test]
    fn null_comparisons_become_is_null() {
        let p = Parameter::new(1, "u");
        let (scope, tables) = scope_for(&p);
        let ctx = ParseContext::new(&scope, &tables, 32);

        let eq = Lambda::unary(p.clone(), |u| u.member("name").eq(Expr::null()));
        assert_eq!(GeneralExpressionParser::parse(&eq, &ctx).unwrap().to_string(), "users.name IS NULL");

        let ne = Lambda::unary(p.clone(), |u| Expr::null().not_eq(u.member("city").member("name")));
        assert_eq!(GeneralExpressionParser::parse(&ne, &ctx).unwrap().to_string(), "cities.name IS NOT NULL");

        let lt = Lambda::unary(p, |u| u.member("age").lt(Expr::null()));
        assert!(matches!(GeneralExpressionParser::parse(&lt, &ctx), Err(CompileError::UnsupportedOperation(_))));
    }

    #[test]
    fn null_on_either_side_picks_the_other_operand() {
        let p = Parameter::new(1, "u");
        let (scope, tables) = scope_for(&p);
        let ctx = ParseContext::new(&scope, &tables, 32);

        let left = Lambda::unary(p.clone(), |u| Expr::null().eq(u.member("age")));
        assert_eq!(
            GeneralExpressionParser::parse(&left, &ctx).unwrap(),
            SqlExpr::IsNull { expr: Box::new(SqlExpr::column("users", "age")), negated: false }
        );

        let columns = Lambda::unary(p.clone(), |u| u.clone().member("age").not_eq(u.member("city_id")));
        assert_eq!(GeneralExpressionParser::parse(&columns, &ctx).unwrap().to_string(), "(users.age <> users.city_id)");

        let both = Lambda::unary(p, |_| Expr::null().eq(Expr::null()));
        assert_eq!(
            GeneralExpressionParser::parse(&both, &ctx),
            Err(CompileError::unsupported("comparison between two NULL constants"))
        );
    }

    #[test]
    fn logical_operators_flatten_and_coerce_booleans() {
        let p = Parameter::new(1, "u");
        let (scope, tables) = scope_for(&p);
        let ctx = ParseContext::new(&scope, &tables, 32);
        let lambda = Lambda::unary(p, |u| {
            u.clone().member("age").gt(Expr::constant(18))
                .and(u.clone().member("name").eq(Expr::constant("Ana")))
                .and(u.member("age"))
        });

        let expr = GeneralExpressionParser::parse(&lambda, &ctx).unwrap();
        assert_eq!(expr.to_string(), "((users.age > 18) AND (users.name = 'Ana') AND (users.age = TRUE))");
    }

    #[test]
    fn entity_members_are_not_scalars() {
        let p = Parameter::new(1, "u");
        let (scope, tables) = scope_for(&p);
        let ctx = ParseContext::new(&scope, &tables, 32);
        let lambda = Lambda::unary(p, |u| u.member("city"));

        let err = GeneralExpressionParser::parse(&lambda, &ctx).unwrap_err();
        assert_eq!(err, CompileError::unsupported("'u.city' is not a scalar member"));
    }

    #[test]
    fn columns_outside_scope_tables_are_rejected() {
        let p = Parameter::new(1, "u");
        let scope = ScopeParameters::single(&p, fixtures::user_with_city_model());
        let mut tables = ScopeTables::new();
        tables.register("users");
        let ctx = ParseContext::new(&scope, &tables, 32);
        let lambda = Lambda::unary(p, |u| u.member("city").member("name"));

        let err = GeneralExpressionParser::parse(&lambda, &ctx).unwrap_err();
        assert_eq!(err, CompileError::TableOutOfScope("cities".into()));
    }

    #[test]
    fn aggregates_and_functions() {
        let p = Parameter::new(1, "u");
        let (scope, tables) = scope_for(&p);
        let ctx = ParseContext::new(&scope, &tables, 32);

        let count = Lambda::unary(p.clone(), |_| Expr::count());
        assert_eq!(GeneralExpressionParser::parse(&count, &ctx).unwrap().to_string(), "COUNT(*)");

        let upper = Lambda::unary(p.clone(), |u| Expr::call("upper", vec![u.member("name")]));
        assert_eq!(GeneralExpressionParser::parse(&upper, &ctx).unwrap().to_string(), "UPPER(users.name)");

        let sum = Lambda::unary(p, |_| Expr::aggregate(AggregateFunction::Sum, None));
        assert!(GeneralExpressionParser::parse(&sum, &ctx).is_err());
    }

    #[test]
    fn deep_expressions_hit_the_depth_limit() {
        let p = Parameter::new(1, "u");
        let (scope, tables) = scope_for(&p);
        let ctx = ParseContext::new(&scope, &tables, 8);
        let mut body = Expr::constant(0);
        for _ in 0..20 {
            body = body.add(Expr::constant(1));
        }
        let lambda = Lambda::new(vec![p], body);
        assert_eq!(GeneralExpressionParser::parse(&lambda, &ctx), Err(CompileError::DepthLimitExceeded(8)));
    }
}
