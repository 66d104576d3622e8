use std::fmt;

use crate::sql::{AggregateCall, ArithmeticOp, ComparatorOp, Literal};

/// Reference to one column of a table visible under `table` (an alias).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnAccess {
    pub table: String,
    pub column: String,
}

/// SQL-level expression tree.
///
/// Trees are immutable values: transformations build new trees. Equality is
/// structural, which is what promotion relies on to reuse projected columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SqlExpr {
    Column(ColumnAccess),
    Literal(Literal),
    Compare { left: Box<SqlExpr>, op: ComparatorOp, right: Box<SqlExpr> },
    Arithmetic { left: Box<SqlExpr>, op: ArithmeticOp, right: Box<SqlExpr> },
    And(Vec<SqlExpr>),
    Or(Vec<SqlExpr>),
    Not(Box<SqlExpr>),
    Negate(Box<SqlExpr>),
    IsNull { expr: Box<SqlExpr>, negated: bool },
    InList { expr: Box<SqlExpr>, list: Vec<SqlExpr>, negated: bool },
    Function { name: String, args: Vec<SqlExpr> },
    Aggregate(AggregateCall),
}

impl SqlExpr {
    pub fn column(table: &str, column: &str) -> SqlExpr {
        SqlExpr::Column(ColumnAccess { table: table.to_string(), column: column.to_string() })
    }

    pub fn literal(literal: impl Into<Literal>) -> SqlExpr {
        SqlExpr::Literal(literal.into())
    }

    pub fn compare(left: SqlExpr, op: ComparatorOp, right: SqlExpr) -> SqlExpr {
        SqlExpr::Compare { left: Box::new(left), op, right: Box::new(right) }
    }

    pub fn eq(left: SqlExpr, right: SqlExpr) -> SqlExpr {
        Self::compare(left, ComparatorOp::Eq, right)
    }

    /// Logical AND of `next` onto an optional accumulated condition, with
    /// nested conjunctions flattened. `None` stands for TRUE.
    pub fn and_also(existing: Option<SqlExpr>, next: SqlExpr) -> SqlExpr {
        let mut parts = match existing {
            None => return next,
            Some(SqlExpr::And(parts)) => parts,
            Some(other) => vec![other],
        };
        match next {
            SqlExpr::And(more) => parts.extend(more),
            other => parts.push(other),
        }
        SqlExpr::And(parts)
    }

    /// Whether the node already evaluates to a SQL truth value.
    pub fn is_predicate(&self) -> bool {
        matches!(
            self,
            SqlExpr::Compare { .. }
                | SqlExpr::And(_)
                | SqlExpr::Or(_)
                | SqlExpr::Not(_)
                | SqlExpr::IsNull { .. }
                | SqlExpr::InList { .. }
                | SqlExpr::Literal(Literal::Bool(_))
        )
    }

    /// Every column access in the tree, in visiting order.
    pub fn columns(&self) -> Vec<&ColumnAccess> {
        let mut out = Vec::new();
        self.walk(&mut |e| {
            if let SqlExpr::Column(c) = e {
                out.push(c);
            }
        });
        out
    }

    /// Pre-order traversal.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a SqlExpr)) {
        visit(self);
        match self {
            SqlExpr::Column(_) | SqlExpr::Literal(_) => {}
            SqlExpr::Compare { left, right, .. } | SqlExpr::Arithmetic { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
            SqlExpr::And(parts) | SqlExpr::Or(parts) => {
                for p in parts { p.walk(visit); }
            }
            SqlExpr::Not(inner) | SqlExpr::Negate(inner) => inner.walk(visit),
            SqlExpr::IsNull { expr, .. } => expr.walk(visit),
            SqlExpr::InList { expr, list, .. } => {
                expr.walk(visit);
                for e in list { e.walk(visit); }
            }
            SqlExpr::Function { args, .. } => {
                for a in args { a.walk(visit); }
            }
            SqlExpr::Aggregate(call) => {
                for a in &call.args { a.walk(visit); }
            }
        }
    }
}

impl fmt::Display for ColumnAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, parts: &[SqlExpr], sep: &str) -> fmt::Result {
    for (i, p) in parts.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", p)?;
    }
    Ok(())
}

impl fmt::Display for SqlExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlExpr::Column(c) => write!(f, "{}", c),
            SqlExpr::Literal(l) => write!(f, "{}", l),
            SqlExpr::Compare { left, op, right } => write!(f, "({} {} {})", left, op, right),
            SqlExpr::Arithmetic { left, op, right } => write!(f, "({} {} {})", left, op, right),
            SqlExpr::And(parts) => {
                write!(f, "(")?;
                write_joined(f, parts, " AND ")?;
                write!(f, ")")
            }
            SqlExpr::Or(parts) => {
                write!(f, "(")?;
                write_joined(f, parts, " OR ")?;
                write!(f, ")")
            }
            SqlExpr::Not(inner) => write!(f, "NOT {}", inner),
            SqlExpr::Negate(inner) => write!(f, "-{}", inner),
            SqlExpr::IsNull { expr, negated: false } => write!(f, "{} IS NULL", expr),
            SqlExpr::IsNull { expr, negated: true } => write!(f, "{} IS NOT NULL", expr),
            SqlExpr::InList { expr, list, negated } => {
                write!(f, "{} {}IN (", expr, if *negated { "NOT " } else { "" })?;
                write_joined(f, list, ", ")?;
                write!(f, ")")
            }
            SqlExpr::Function { name, args } => {
                write!(f, "{}(", name)?;
                write_joined(f, args, ", ")?;
                write!(f, ")")
            }
            SqlExpr::Aggregate(call) => write!(f, "{}", call),
        }
    }
}
