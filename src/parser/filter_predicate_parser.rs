use crate::{
    lambda::Lambda,
    parser::{GeneralExpressionParser, ParseContext},
    sql::{Literal, SqlExpr},
    CompileError,
};

/// Parses predicates (WHERE, HAVING, navigation conditions).
pub struct FilterPredicateParser;

impl FilterPredicateParser {
    pub fn parse(lambda: &Lambda, ctx: &ParseContext) -> Result<SqlExpr, CompileError> {
        let expr = GeneralExpressionParser::parse(lambda, ctx)?;
        Ok(Self::ensure_predicate(expr))
    }

    /// A bare boolean value used as a condition reads as `value = TRUE`.
    pub fn ensure_predicate(expr: SqlExpr) -> SqlExpr {
        if expr.is_predicate() {
            return expr;
        }
        SqlExpr::eq(expr, SqlExpr::Literal(Literal::Bool(true)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lambda::{Expr, Parameter}, parser::{ScopeParameters, ScopeTables}, test_fixtures::fixtures};

    #[test]
    fn boolean_member_is_coerced() {
        let p = Parameter::new(1, "o");
        let scope = ScopeParameters::single(&p, fixtures::order_model("orders"));
        let mut tables = ScopeTables::new();
        tables.register("orders");
        let ctx = ParseContext::new(&scope, &tables, 32);

        let lambda = Lambda::unary(p.clone(), |o| o.member("paid"));
        assert_eq!(FilterPredicateParser::parse(&lambda, &ctx).unwrap().to_string(), "(orders.paid = TRUE)");

        let negated = Lambda::unary(p, |o| o.member("paid").not());
        assert_eq!(FilterPredicateParser::parse(&negated, &ctx).unwrap().to_string(), "NOT (orders.paid = TRUE)");
    }

    #[test]
    fn literal_booleans_are_already_predicates() {
        let scope = ScopeParameters::new();
        let tables = ScopeTables::new();
        let ctx = ParseContext::new(&scope, &tables, 32);
        let lambda = Lambda::unary(Parameter::new(1, "x"), |_| Expr::constant(true));
        assert_eq!(FilterPredicateParser::parse(&lambda, &ctx).unwrap(), SqlExpr::literal(true));
    }
}
