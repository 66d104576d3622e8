use tracing::debug;

use crate::{
    catalog::{EntityDescriptor, PropertyKind},
    config::CompileContext,
    lambda::Lambda,
    mapping::{CollectionObjectModel, ComplexObjectModel, Constructor, ObjectModel},
    parser::{FilterPredicateParser, ParseContext, ScopeParameters, ScopeTables},
    planner::QueryAccumulator,
    query::NavigationChain,
    sql::{JoinClause, JoinType, SqlExpr, TableSource},
    CompileError,
};

impl QueryAccumulator {
    /// Eagerly load the navigation properties of `chain`.
    ///
    /// Every new step LEFT JOINs the related table onto the current source
    /// and hangs a node bound to it under its owner. Steps already included
    /// are walked through without joining again.
    pub fn include(&mut self, chain: &NavigationChain, ctx: &CompileContext) -> Result<(), CompileError> {
        if chain.len() > ctx.config.max_navigation_depth {
            return Err(CompileError::DepthLimitExceeded(ctx.config.max_navigation_depth));
        }

        let mut path: Vec<String> = Vec::with_capacity(chain.len());
        let mut under_collection = false;

        for step in &chain.steps {
            let owner = node_at(&mut self.result_model, &path)
                .ok_or_else(|| CompileError::unsupported(format!("cannot include '{}' from a scalar result", chain.path())))?;
            let owner = match owner {
                ObjectModel::Complex(c) => c,
                _ => return Err(CompileError::unsupported(format!("{} is not navigation property", step.property))),
            };

            let entity_name = match &owner.constructor {
                Constructor::Entity(name) => name.clone(),
                Constructor::Anonymous => {
                    // projected record: walk into an existing member
                    let member = owner.members.get(&step.property)
                        .ok_or_else(|| CompileError::UnknownMember { member: step.property.clone() })?;
                    if matches!(member, ObjectModel::Primitive(_)) {
                        return Err(CompileError::unsupported(format!("{} is not navigation property", step.property)));
                    }
                    under_collection |= matches!(member, ObjectModel::Collection(_));
                    path.push(step.property.clone());
                    continue;
                }
            };

            let entity = lookup(ctx, &entity_name)?;
            let property = entity.property(&step.property).ok_or_else(|| CompileError::UnknownProperty {
                entity: entity_name.clone(),
                property: step.property.clone(),
            })?;

            let is_collection = match property.kind {
                PropertyKind::Primitive => {
                    return Err(CompileError::unsupported(format!("{} is not navigation property", step.property)));
                }
                PropertyKind::Complex => false,
                PropertyKind::Collection => true,
            };

            if !owner.members.contains_key(&step.property) {
                if is_collection && under_collection {
                    return Err(CompileError::not_yet_implemented(format!(
                        "including collection '{}' below another collection", step.property
                    )));
                }
                let (association, target_name) = match (&property.association, &property.target) {
                    (Some(association), Some(target)) => (association.clone(), target.clone()),
                    _ => {
                        return Err(CompileError::unsupported(format!(
                            "navigation '{}.{}' has no association", entity_name, step.property
                        )));
                    }
                };
                let target = lookup(ctx, &target_name)?;

                let alias = self.scope_tables.generate_unique_alias(&target.table);
                let element = ComplexObjectModel::for_entity(target, &alias);

                let owner_key = key_expr(owner, &association.this_key)?;
                let related_key = key_expr(&element, &association.other_key)?;

                let element_model = ObjectModel::Complex(element.clone());
                let condition = parse_step_lambda(step.condition.as_ref(), &self.scope_parameters, &self.scope_tables, &element_model, ctx)?;
                let filter = parse_step_lambda(step.filter.as_ref(), &self.scope_parameters, &self.scope_tables, &element_model, ctx)?;

                let mut on = SqlExpr::eq(owner_key, related_key);
                for extra in [&condition, &filter].into_iter().flatten() {
                    on = SqlExpr::and_also(Some(on), extra.clone());
                }

                self.from.joins.push(JoinClause::new(JoinType::Left, TableSource::table(&target.table, &alias), on));

                let node = if is_collection {
                    ObjectModel::Collection(CollectionObjectModel { element: Box::new(element_model), condition, filter })
                } else {
                    let mut element = element;
                    element.condition = condition;
                    element.filter = filter;
                    ObjectModel::Complex(element)
                };
                owner.add_member(&step.property, node);

                debug!(
                    property = %step.property,
                    target = %target_name,
                    alias = %alias,
                    collection = is_collection,
                    "included navigation"
                );
            }

            under_collection |= is_collection;
            path.push(step.property.clone());
        }

        Ok(())
    }
}

/// Node that owns the next step: the element for a collection.
fn node_at<'m>(model: &'m mut ObjectModel, path: &[String]) -> Option<&'m mut ObjectModel> {
    let mut node = element_of(model);
    for name in path {
        node = match node {
            ObjectModel::Complex(c) => element_of(c.members.get_mut(name)?),
            _ => return None,
        };
    }
    Some(node)
}

fn element_of(model: &mut ObjectModel) -> &mut ObjectModel {
    match model {
        ObjectModel::Collection(c) => c.element.as_mut(),
        other => other,
    }
}

fn lookup<'c>(ctx: &CompileContext<'c>, name: &str) -> Result<&'c EntityDescriptor, CompileError> {
    ctx.catalog.entity(name).ok_or_else(|| CompileError::UnknownEntity(name.to_string()))
}

fn key_expr(node: &ComplexObjectModel, key: &str) -> Result<SqlExpr, CompileError> {
    node.members.get(key)
        .and_then(ObjectModel::as_primitive_expr)
        .cloned()
        .ok_or_else(|| CompileError::UnknownMember { member: key.to_string() })
}

/// Parse a step condition or filter with its parameter bound to the new node.
fn parse_step_lambda(
    lambda: Option<&Lambda>,
    scope: &ScopeParameters,
    tables: &ScopeTables,
    node: &ObjectModel,
    ctx: &CompileContext,
) -> Result<Option<SqlExpr>, CompileError> {
    let Some(lambda) = lambda else {
        return Ok(None);
    };
    lambda.expect_arity(1)?;
    let scope = scope.clone_with(lambda.first_parameter()?, node.clone());
    let parse_ctx = ParseContext::new(&scope, tables, ctx.config.max_expression_depth);
    FilterPredicateParser::parse(lambda, &parse_ctx).map(Some)
}
