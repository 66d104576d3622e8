use crate::{lambda::Parameter, sql::{AggregateFunction, Literal}};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

/// Node of a lambda body as produced by the query-builder layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Parameter(Parameter),
    Member { target: Box<Expr>, member: String },
    Constant(Literal),
    Binary { op: BinaryOp, left: Box<Expr>, right: Box<Expr> },
    Not(Box<Expr>),
    Negate(Box<Expr>),
    /// Scalar SQL function call
    Call { function: String, args: Vec<Expr> },
    In { expr: Box<Expr>, list: Vec<Expr> },
    /// Aggregate over the rows of the current (grouped) scope
    Aggregate { function: AggregateFunction, argument: Option<Box<Expr>>, distinct: bool },
    /// Anonymous record construction
    New { members: Vec<(String, Expr)> },
}

impl Expr {
    pub fn param(parameter: &Parameter) -> Expr {
        Expr::Parameter(parameter.clone())
    }

    pub fn constant(literal: impl Into<Literal>) -> Expr {
        Expr::Constant(literal.into())
    }

    pub fn null() -> Expr {
        Expr::Constant(Literal::Null)
    }

    pub fn member(self, member: &str) -> Expr {
        Expr::Member { target: Box::new(self), member: member.to_string() }
    }

    pub fn binary(self, op: BinaryOp, right: Expr) -> Expr {
        Expr::Binary { op, left: Box::new(self), right: Box::new(right) }
    }

    pub fn eq(self, right: Expr) -> Expr { self.binary(BinaryOp::Eq, right) }
    pub fn not_eq(self, right: Expr) -> Expr { self.binary(BinaryOp::NotEq, right) }
    pub fn lt(self, right: Expr) -> Expr { self.binary(BinaryOp::Lt, right) }
    pub fn gt(self, right: Expr) -> Expr { self.binary(BinaryOp::Gt, right) }
    pub fn gt_eq(self, right: Expr) -> Expr { self.binary(BinaryOp::GtEq, right) }
    pub fn and(self, right: Expr) -> Expr { self.binary(BinaryOp::And, right) }
    pub fn or(self, right: Expr) -> Expr { self.binary(BinaryOp::Or, right) }
    pub fn add(self, right: Expr) -> Expr { self.binary(BinaryOp::Add, right) }

    pub fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }

    pub fn call(function: &str, args: Vec<Expr>) -> Expr {
        Expr::Call { function: function.to_string(), args }
    }

    pub fn aggregate(function: AggregateFunction, argument: Option<Expr>) -> Expr {
        Expr::Aggregate { function, argument: argument.map(Box::new), distinct: false }
    }

    pub fn count() -> Expr {
        Self::aggregate(AggregateFunction::Count, None)
    }

    pub fn new_record(members: Vec<(&str, Expr)>) -> Expr {
        Expr::New { members: members.into_iter().map(|(n, e)| (n.to_string(), e)).collect() }
    }
}
