use crate::{
    lambda::Lambda,
    planner::CompilationState,
    query::NavigationChain,
    sql::{AggregateFunction, JoinType, OrderType},
};

/// Whether an ordering starts a fresh sort or extends the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKind {
    Primary,
    Then,
}

#[derive(Debug, Clone)]
pub struct GroupBySpec {
    pub key_selectors: Vec<Lambda>,
    /// predicates over the group, ANDed into HAVING
    pub having: Vec<Lambda>,
    /// explicit orderings over the group; empty keeps the current ones
    pub orderings: Vec<(Lambda, OrderType)>,
    /// projection of each group
    pub selector: Lambda,
}

impl GroupBySpec {
    pub fn new(key_selector: Lambda, selector: Lambda) -> Self {
        Self { key_selectors: vec![key_selector], having: vec![], orderings: vec![], selector }
    }

    pub fn with_key(mut self, key_selector: Lambda) -> Self {
        self.key_selectors.push(key_selector);
        self
    }

    pub fn with_having(mut self, predicate: Lambda) -> Self {
        self.having.push(predicate);
        self
    }

    pub fn with_ordering(mut self, key: Lambda, order_type: OrderType) -> Self {
        self.orderings.push((key, order_type));
        self
    }
}

/// Another compiled query joined in as a subordinate source.
///
/// `condition` and `selector` take two parameters: the outer element first,
/// the inner element last.
#[derive(Debug, Clone)]
pub struct JoinSpec {
    pub join_type: JoinType,
    pub inner: CompilationState,
    pub condition: Lambda,
    pub selector: Lambda,
}

/// One operation of a query chain, fed to a [`CompilationState`].
#[derive(Debug, Clone)]
pub enum Operator {
    Where(Lambda),
    OrderBy { key: Lambda, order_type: OrderType, kind: OrderKind },
    Select(Lambda),
    Skip(u64),
    Take(u64),
    Distinct,
    Aggregate { function: AggregateFunction, arguments: Vec<Lambda>, distinct: bool },
    GroupBy(Box<GroupBySpec>),
    Include(NavigationChain),
    Join(Box<JoinSpec>),
}

impl Operator {
    pub fn order_by(key: Lambda) -> Self {
        Operator::OrderBy { key, order_type: OrderType::Asc, kind: OrderKind::Primary }
    }

    pub fn order_by_desc(key: Lambda) -> Self {
        Operator::OrderBy { key, order_type: OrderType::Desc, kind: OrderKind::Primary }
    }

    pub fn then_by(key: Lambda) -> Self {
        Operator::OrderBy { key, order_type: OrderType::Asc, kind: OrderKind::Then }
    }

    pub fn then_by_desc(key: Lambda) -> Self {
        Operator::OrderBy { key, order_type: OrderType::Desc, kind: OrderKind::Then }
    }

    pub fn aggregate(function: AggregateFunction, arguments: Vec<Lambda>) -> Self {
        Operator::Aggregate { function, arguments, distinct: false }
    }

    pub fn count() -> Self {
        Self::aggregate(AggregateFunction::Count, vec![])
    }

    pub fn group_by(spec: GroupBySpec) -> Self {
        Operator::GroupBy(Box::new(spec))
    }

    pub fn include(chain: impl Into<NavigationChain>) -> Self {
        Operator::Include(chain.into())
    }

    pub fn join(join_type: JoinType, inner: CompilationState, condition: Lambda, selector: Lambda) -> Self {
        Operator::Join(Box::new(JoinSpec { join_type, inner, condition, selector }))
    }

    /// Short name used in logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Operator::Where(_) => "Where",
            Operator::OrderBy { kind: OrderKind::Primary, .. } => "OrderBy",
            Operator::OrderBy { kind: OrderKind::Then, .. } => "ThenBy",
            Operator::Select(_) => "Select",
            Operator::Skip(_) => "Skip",
            Operator::Take(_) => "Take",
            Operator::Distinct => "Distinct",
            Operator::Aggregate { .. } => "Aggregate",
            Operator::GroupBy(_) => "GroupBy",
            Operator::Include(_) => "Include",
            Operator::Join(_) => "Join",
        }
    }
}
