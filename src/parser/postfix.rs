use super::error::{ExpressionParserError, ExpressionParserErrorKind};
use crate::{
    expression::{BinaryOperator, Expression},
    lexer::Span,
};

/// Parses a whitespace separated postfix (RPN) expression such as `x y + 3 *`.
///
/// Operands are pushed onto a stack; an operator pops its right operand and
/// then its left one, so `a b -` means `a - b`. Tokens that look numeric
/// become number literals and everything else becomes a variable reference.
/// Division by zero is left for evaluation since variables are unknown here.
#[tracing::instrument(level = "debug", skip_all, fields(source = %source))]
pub fn parse_postfix(source: &str) -> Result<Expression, ExpressionParserError> {
    let mut stack: Vec<Expression> = Vec::new();

    for (span, token) in split_tokens(source) {
        if let Some(operator) = BinaryOperator::from_symbol(token) {
            let available = stack.len();
            let (Some(rhs), Some(lhs)) = (stack.pop(), stack.pop()) else {
                return Err(ExpressionParserError {
                    kind: ExpressionParserErrorKind::InsufficientOperands {
                        operator,
                        available,
                    },
                    span,
                });
            };
            tracing::trace!(%operator, depth = stack.len(), "reduce");
            stack.push(Expression::binary(operator, lhs, rhs));
        } else if is_numeric_literal(token) {
            let value = token.parse::<f64>().map_err(|_| ExpressionParserError {
                kind: ExpressionParserErrorKind::InvalidNumber(token.into()),
                span,
            })?;
            tracing::trace!(value, depth = stack.len(), "push number");
            stack.push(Expression::number(value));
        } else {
            tracing::trace!(name = token, depth = stack.len(), "push variable");
            stack.push(Expression::variable(token));
        }
    }

    let count = stack.len();
    let whole = Span::new(0, source.len());
    match (stack.pop(), count) {
        (Some(root), 1) => Ok(root),
        (None, _) => Err(ExpressionParserError {
            kind: ExpressionParserErrorKind::EmptyExpression,
            span: whole,
        }),
        (Some(_), count) => Err(ExpressionParserError {
            kind: ExpressionParserErrorKind::LeftoverOperands { count },
            span: whole,
        }),
    }
}

fn is_numeric_literal(token: &str) -> bool {
    let unsigned = token.strip_prefix(['+', '-']).unwrap_or(token);
    unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.')
}

fn split_tokens(source: &str) -> Vec<(Span, &str)> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (offset, c) in source.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(begin)) => {
                tokens.push((Span::new(begin, offset - begin), &source[begin..offset]));
                start = None;
            }
            (false, None) => start = Some(offset),
            _ => {}
        }
    }
    if let Some(begin) = start {
        tokens.push((Span::new(begin, source.len() - begin), &source[begin..]));
    }
    tokens
}
