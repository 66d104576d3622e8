use std::fmt;

use crate::sql::SqlExpr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunction {
    Count,
    LongCount,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFunction {
    pub fn sql_name(&self) -> &'static str {
        match self {
            AggregateFunction::Count | AggregateFunction::LongCount => "COUNT",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
        }
    }

    /// COUNT may be called without an argument; everything else needs one.
    pub fn allows_no_argument(&self) -> bool {
        matches!(self, AggregateFunction::Count | AggregateFunction::LongCount)
    }
}

/// One aggregate call in the SQL tree. An empty `args` list means `COUNT(*)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AggregateCall {
    pub function: AggregateFunction,
    pub args: Vec<SqlExpr>,
    pub distinct: bool,
}

impl AggregateCall {
    pub fn new(function: AggregateFunction, args: Vec<SqlExpr>, distinct: bool) -> Self {
        Self { function, args, distinct }
    }

    pub fn count_all() -> Self {
        Self::new(AggregateFunction::Count, vec![], false)
    }
}

impl fmt::Display for AggregateCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.function.sql_name())?;
        if self.distinct {
            write!(f, "DISTINCT ")?;
        }
        if self.args.is_empty() {
            write!(f, "*")?;
        }
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_all_renders_star() {
        assert_eq!(AggregateCall::count_all().to_string(), "COUNT(*)");
    }

    #[test]
    fn distinct_flag_is_part_of_identity() {
        let col = SqlExpr::column("T", "id");
        let a = AggregateCall::new(AggregateFunction::Count, vec![col.clone()], true);
        let b = AggregateCall::new(AggregateFunction::Count, vec![col], false);
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "COUNT(DISTINCT T.id)");
    }
}
