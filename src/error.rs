use thiserror::Error;

/// Errors raised by polynomial arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolynomialError {
    /// Division or remainder by the zero polynomial.
    #[error("Division by zero polynomial")]
    DivisionByZero,
}
