use crate::{lambda::Expr, mapping::ObjectModel, parser::ParseContext, CompileError};

pub struct MemberResolver;

impl MemberResolver {
    /// Resolve a parameter or member chain to the object model it denotes.
    ///
    /// `Ok(None)` means the expression is not a parameter-rooted chain.
    pub fn resolve_model<'a>(expr: &Expr, ctx: &ParseContext<'a>, depth: usize) -> Result<Option<&'a ObjectModel>, CompileError> {
        let depth = ctx.enter(depth)?;
        match expr {
            Expr::Parameter(p) => ctx.scope.get(p)
                .map(Some)
                .ok_or_else(|| CompileError::UnboundParameter(p.name.clone())),
            Expr::Member { target, member } => match Self::resolve_model(target, ctx, depth)? {
                Some(model) => model.member(member)
                    .map(Some)
                    .ok_or_else(|| CompileError::UnknownMember { member: member.clone() }),
                None => Ok(None),
            },
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        lambda::Parameter,
        mapping::ComplexObjectModel,
        parser::{ScopeParameters, ScopeTables},
        sql::SqlExpr,
        test_fixtures::fixtures,
    };

    #[test]
    fn resolves_member_chains_through_nested_models() {
        let p = Parameter::new(1, "u");
        let scope = ScopeParameters::single(&p, fixtures::user_with_city_model());
        let tables = ScopeTables::new();
        let ctx = ParseContext::new(&scope, &tables, 16);

        let expr = Expr::param(&p).member("city").member("name");
        let model = MemberResolver::resolve_model(&expr, &ctx, 0).unwrap().unwrap();
        assert_eq!(model.as_primitive_expr(), Some(&SqlExpr::column("cities", "name")));
    }

    #[test]
    fn unknown_members_and_unbound_parameters_fail() {
        let p = Parameter::new(1, "u");
        let scope = ScopeParameters::single(&p, ObjectModel::Complex(ComplexObjectModel::new(crate::mapping::Constructor::Anonymous)));
        let tables = ScopeTables::new();
        let ctx = ParseContext::new(&scope, &tables, 16);

        let err = MemberResolver::resolve_model(&Expr::param(&p).member("nope"), &ctx, 0).unwrap_err();
        assert_eq!(err, CompileError::UnknownMember { member: "nope".into() });

        let other = Parameter::new(2, "x");
        let err = MemberResolver::resolve_model(&Expr::param(&other), &ctx, 0).unwrap_err();
        assert_eq!(err, CompileError::UnboundParameter("x".into()));
    }

    #[test]
    fn constants_are_not_chains() {
        let scope = ScopeParameters::new();
        let tables = ScopeTables::new();
        let ctx = ParseContext::new(&scope, &tables, 16);
        assert!(MemberResolver::resolve_model(&Expr::constant(1), &ctx, 0).unwrap().is_none());
    }
}
