use crate::{
    lambda::{Expr, Lambda},
    mapping::ObjectModel,
    parser::{GeneralExpressionParser, MemberResolver, ParseContext},
    sql::SqlExpr,
    CompileError,
};

/// Parses GROUP BY key selectors into one or more key expressions.
pub struct GroupKeySelectorParser;

impl GroupKeySelectorParser {
    pub fn parse(lambda: &Lambda, ctx: &ParseContext) -> Result<Vec<SqlExpr>, CompileError> {
        let mut keys = Vec::new();
        match &lambda.body {
            Expr::New { members } => {
                let depth = ctx.enter(0)?;
                for (_, member) in members {
                    Self::expand(member, ctx, depth, &mut keys)?;
                }
            }
            body => Self::expand(body, ctx, 0, &mut keys)?,
        }
        Ok(keys)
    }

    fn expand(expr: &Expr, ctx: &ParseContext, depth: usize, keys: &mut Vec<SqlExpr>) -> Result<(), CompileError> {
        match MemberResolver::resolve_model(expr, ctx, depth)? {
            Some(ObjectModel::Collection(_)) => {
                Err(CompileError::unsupported(format!("collection '{}' cannot be a group key", GeneralExpressionParser::describe(expr))))
            }
            Some(model) => {
                for leaf in model.primitive_leaves() {
                    ctx.check_tables(leaf)?;
                    keys.push(leaf.clone());
                }
                Ok(())
            }
            None => {
                keys.push(GeneralExpressionParser::parse_expr(expr, ctx, depth)?);
                Ok(())
            }
        }
    }
}
