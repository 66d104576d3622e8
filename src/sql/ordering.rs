use std::fmt;

use crate::sql::SqlExpr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderType {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ordering {
    pub expr: SqlExpr,
    pub order_type: OrderType,
}

impl Ordering {
    pub fn new(expr: SqlExpr, order_type: OrderType) -> Self {
        Self { expr, order_type }
    }

    pub fn asc(expr: SqlExpr) -> Self {
        Self::new(expr, OrderType::Asc)
    }

    pub fn desc(expr: SqlExpr) -> Self {
        Self::new(expr, OrderType::Desc)
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.order_type {
            OrderType::Asc => write!(f, "{} ASC", self.expr),
            OrderType::Desc => write!(f, "{} DESC", self.expr),
        }
    }
}
