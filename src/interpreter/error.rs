use crate::{lexer::Span, value::error::RuntimeError};
use thiserror::Error;

/// A runtime error tagged with the statement that raised it.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("[line {line}] {error}")]
pub struct ExecutionError {
    pub error: RuntimeError,
    pub line: u32,
    pub span: Span,
}

impl ExecutionError {
    pub fn code(&self) -> &'static str {
        self.error.code()
    }
}
