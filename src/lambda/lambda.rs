use crate::{lambda::{Expr, Parameter}, CompileError};

#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub parameters: Vec<Parameter>,
    pub body: Expr,
}

impl Lambda {
    pub fn new(parameters: Vec<Parameter>, body: Expr) -> Self {
        Self { parameters, body }
    }

    /// Single-parameter lambda; `build` receives the parameter as an expression.
    pub fn unary(parameter: Parameter, build: impl FnOnce(Expr) -> Expr) -> Self {
        let body = build(Expr::param(&parameter));
        Self::new(vec![parameter], body)
    }

    /// Two-parameter lambda, as used by join conditions and join selectors.
    pub fn binary(first: Parameter, second: Parameter, build: impl FnOnce(Expr, Expr) -> Expr) -> Self {
        let body = build(Expr::param(&first), Expr::param(&second));
        Self::new(vec![first, second], body)
    }

    /// Ensure the lambda declares exactly `expected` parameters.
    pub fn expect_arity(&self, expected: usize) -> Result<(), CompileError> {
        if self.parameters.len() != expected {
            return Err(CompileError::ArityMismatch { expected, got: self.parameters.len() });
        }
        Ok(())
    }

    pub fn first_parameter(&self) -> Result<&Parameter, CompileError> {
        self.parameters.first().ok_or(CompileError::ArityMismatch { expected: 1, got: 0 })
    }

    pub fn last_parameter(&self) -> Result<&Parameter, CompileError> {
        self.parameters.last().ok_or(CompileError::ArityMismatch { expected: 1, got: 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_is_checked() {
        let lambda = Lambda::unary(Parameter::new(1, "u"), |u| u.member("age"));
        assert!(lambda.expect_arity(1).is_ok());
        assert_eq!(lambda.expect_arity(2), Err(CompileError::ArityMismatch { expected: 2, got: 1 }));
    }

    #[test]
    fn parameters_compare_by_identity() {
        assert_eq!(Parameter::new(7, "a"), Parameter::new(7, "b"));
        assert_ne!(Parameter::new(7, "a"), Parameter::new(8, "a"));
    }
}
