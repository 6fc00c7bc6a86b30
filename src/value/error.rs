use super::ValueKind;
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("Undefined Variable: {0}")]
    UndefinedVariable(CompactString),
    #[error("Type Mismatch {{{operation}}}: expected {expected} but got {actual}")]
    TypeMismatch {
        operation: &'static str,
        expected: ValueKind,
        actual: ValueKind,
    },
    #[error("Division By Zero")]
    DivisionByZero,
    #[error("Invalid Identifier: {0:?}")]
    InvalidIdentifier(CompactString),
}

impl RuntimeError {
    pub fn code(&self) -> &'static str {
        match self {
            RuntimeError::UndefinedVariable(_) => "RT001",
            RuntimeError::TypeMismatch { .. } => "RT002",
            RuntimeError::DivisionByZero => "RT003",
            RuntimeError::InvalidIdentifier(_) => "RT004",
        }
    }
}
