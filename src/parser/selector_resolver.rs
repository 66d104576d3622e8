use crate::{
    lambda::{Expr, Lambda},
    mapping::{ComplexObjectModel, Constructor, ObjectModel},
    parser::{GeneralExpressionParser, MemberResolver, ParseContext},
    CompileError,
};

/// Builds the object model of a projection.
pub struct SelectorResolver;

impl SelectorResolver {
    pub fn resolve(lambda: &Lambda, ctx: &ParseContext) -> Result<ObjectModel, CompileError> {
        Self::resolve_expr(&lambda.body, ctx, 0)
    }

    fn resolve_expr(expr: &Expr, ctx: &ParseContext, depth: usize) -> Result<ObjectModel, CompileError> {
        let depth = ctx.enter(depth)?;
        match expr {
            Expr::New { members } => {
                let mut model = ComplexObjectModel::new(Constructor::Anonymous);
                for (name, member) in members {
                    if model.members.contains_key(name) {
                        return Err(CompileError::unsupported(format!("duplicate projected member '{}'", name)));
                    }
                    model.add_member(name, Self::resolve_expr(member, ctx, depth)?);
                }
                Ok(ObjectModel::Complex(model))
            }
            Expr::Parameter(_) | Expr::Member { .. } => match MemberResolver::resolve_model(expr, ctx, depth)? {
                Some(model) => {
                    ctx.check_model_tables(model)?;
                    Ok(model.clone())
                }
                None => Ok(ObjectModel::primitive(GeneralExpressionParser::parse_expr(expr, ctx, depth)?)),
            },
            other => Ok(ObjectModel::primitive(GeneralExpressionParser::parse_expr(other, ctx, depth)?)),
        }
    }
}
