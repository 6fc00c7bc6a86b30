use crate::expression::BinaryOperator;
use crate::lexer::{LexicalError, Span, TokenKind};
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExpressionParserErrorKind {
    #[error("Operator `{operator}` needs two operands but {available} available.")]
    InsufficientOperands {
        operator: BinaryOperator,
        available: usize,
    },
    #[error("Expected a single result but {count} operands were left over.")]
    LeftoverOperands { count: usize },
    #[error("Expected at least one operand.")]
    EmptyExpression,
    #[error("Malformed numeric literal `{0}`.")]
    InvalidNumber(CompactString),
}

/// Failure to turn a postfix token stream into a tree.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct ExpressionParserError {
    pub kind: ExpressionParserErrorKind,
    pub span: Span,
}

impl ExpressionParserError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            ExpressionParserErrorKind::InsufficientOperands { .. } => "PE001",
            ExpressionParserErrorKind::LeftoverOperands { .. } => "PE002",
            ExpressionParserErrorKind::EmptyExpression => "PE003",
            ExpressionParserErrorKind::InvalidNumber(_) => "PE004",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParserErrorKind {
    #[error("Expected {expected} but got token {actual}.")]
    UnexpectedToken {
        actual: TokenKind,
        expected: TokenKind,
    },
    #[error("Expected an expression but got token {0}.")]
    NonExpression(TokenKind),
    #[error("Expected a non-EOF token.")]
    UnexpectedEof,
    #[error("Expected a `print` or assignment statement but got {0}.")]
    InvalidStatement(TokenKind),
    #[error("Expected the end of the line but got {0}.")]
    TrailingToken(TokenKind),
    #[error("Expected at most {0} nested sub-expressions.")]
    NestingTooDeep(usize),
    #[error("Encountered a lexer error {0}.")]
    LexicalError(LexicalError),
}

/// A script line that is not a valid statement.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("[line {line}] {kind} `{text}`")]
pub struct ParserError {
    pub kind: ParserErrorKind,
    pub line: u32,
    pub text: CompactString,
    pub span: Span,
}

impl ParserError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            ParserErrorKind::UnexpectedToken { .. } => "SE001",
            ParserErrorKind::NonExpression(_) => "SE002",
            ParserErrorKind::UnexpectedEof => "SE003",
            ParserErrorKind::InvalidStatement(_) => "SE004",
            ParserErrorKind::TrailingToken(_) => "SE005",
            ParserErrorKind::NestingTooDeep(_) => "SE006",
            ParserErrorKind::LexicalError(ref error) => error.code(),
        }
    }
}
