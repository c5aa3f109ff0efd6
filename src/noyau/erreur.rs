// src/noyau/erreur.rs
//
// Erreurs typées du noyau.
// Les messages reprennent la formulation attendue en sortie (relayée telle quelle
// par les appelants), d’où l’anglais.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Mismatched parentheses")]
    MismatchedParentheses,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    /// Aussi après échec des replis (composé, préfixe, suffixe).
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("unknown target unit for 'to'")]
    UnknownTargetUnit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("exponent must be unitless")]
    NonUnitlessExponent,

    #[error("negative base with fractional exponent")]
    NegativeBase,

    #[error("dimension exponent out of range")]
    DimensionOverflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),

    #[error("Unit mismatch for {op}")]
    DimensionMismatch { op: String },

    #[error("invalid expression (stack size {0})")]
    InvalidExpression(usize),

    #[error("stack underflow {0}")]
    MissingOperand(String),

    #[error("unknown operator '{0}'")]
    UnknownOperator(char),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("'to' must be the last operation of the expression")]
    ConversionNotTerminal,

    #[error("Internal error: unexpected token in RPN")]
    UnexpectedToken,
}

impl EvalError {
    pub fn dimension_mismatch(op: &str) -> Self {
        EvalError::DimensionMismatch { op: op.to_string() }
    }
}
