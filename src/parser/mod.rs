pub mod error;
pub mod formatter;
mod postfix;

use crate::{
    expression::{BinaryOperator, Expression, PrefixOperator},
    lexer::{Lexer, Span, Token, TokenKind},
    statement::{Assignment, Operand, PrintStatement, Program, Statement},
};
use error::{ParserError, ParserErrorKind};
pub use postfix::parse_postfix;

/// Deepest expression nesting (parentheses and unary minus) a script line may use.
pub const MAX_EXPRESSION_DEPTH: usize = 128;

/// Parses a script into statements, one statement per non-blank line.
///
/// Blank lines and lines starting with `//` are skipped. Parsing stops at the
/// first malformed line, so either the whole program or an error is returned.
#[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
pub fn parse_script(source: &str) -> Result<Program, ParserError> {
    let mut statements = Vec::new();
    let mut line_start = 0;

    for (index, raw) in source.split_inclusive('\n').enumerate() {
        let line = (index + 1) as u32;
        let offset = line_start;
        line_start += raw.len();

        let trimmed = raw.trim_start();
        let text = trimmed.trim_end();
        if text.is_empty() || text.starts_with("//") {
            continue;
        }

        let base = offset + (raw.len() - trimmed.len());
        let statement = Parser::new(text, base, line).parse_statement()?;
        tracing::debug!(line, "parsed statement");
        statements.push(statement);
    }

    Ok(Program::new(statements))
}

/// Recursive descent parser over the tokens of a single line.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    text: &'src str,
    line: u32,
    base: usize,
    depth: usize,
    lookahead: Option<Result<Token, ParserError>>,
}

impl<'src> Parser<'src> {
    /// `base` is the byte offset of `text` inside the full script.
    pub fn new(text: &'src str, base: usize, line: u32) -> Self {
        Self {
            lexer: Lexer::with_offset(text, base.into()),
            text,
            line,
            base,
            depth: 0,
            lookahead: None,
        }
    }

    fn error(&self, kind: ParserErrorKind, span: Span) -> ParserError {
        ParserError {
            kind,
            line: self.line,
            text: self.text.into(),
            span,
        }
    }

    fn peek(&mut self) -> Result<Token, ParserError> {
        match self.lookahead {
            Some(ref token_or_error) => token_or_error.clone(),
            None => {
                let next_token = self.next_token();
                self.lookahead = Some(next_token.clone());
                next_token
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ParserError> {
        match self.lookahead.take() {
            Some(token_or_error) => token_or_error,
            None => self.lexer.next_token().map_err(|e| {
                let span = e.span;
                self.error(ParserErrorKind::LexicalError(e), span)
            }),
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParserError> {
        let next_token = self.next_token()?;
        if next_token.kind != expected {
            Err(self.error(
                ParserErrorKind::UnexpectedToken {
                    actual: next_token.kind,
                    expected,
                },
                next_token.span,
            ))
        } else {
            Ok(next_token)
        }
    }

    fn expect_end_of_line(&mut self) -> Result<(), ParserError> {
        let next_token = self.next_token()?;
        match next_token.kind {
            TokenKind::Eof => Ok(()),
            kind => Err(self.error(ParserErrorKind::TrailingToken(kind), next_token.span)),
        }
    }

    fn lexeme(&self, token: &Token) -> &'src str {
        self.lexer.get_lexeme(&token.span).unwrap_or_default()
    }

    fn line_span(&self) -> Span {
        Span::new(self.base, self.text.len())
    }
}

// Statements
impl<'src> Parser<'src> {
    pub fn parse_statement(&mut self) -> Result<Statement, ParserError> {
        let first = self.next_token()?;
        match first.kind {
            TokenKind::KeywordPrint => {
                let argument = self.parse_operand()?;
                self.expect_end_of_line()?;
                Ok(Statement::Print(PrintStatement {
                    argument,
                    line: self.line,
                    span: self.line_span(),
                }))
            }
            TokenKind::Ident => {
                let name = self.lexeme(&first).into();
                self.expect(TokenKind::Equal)?;
                let value = self.parse_operand()?;
                self.expect_end_of_line()?;
                Ok(Statement::Assignment(Assignment {
                    name,
                    value,
                    line: self.line,
                    span: self.line_span(),
                }))
            }
            kind => Err(self.error(ParserErrorKind::InvalidStatement(kind), first.span)),
        }
    }

    /// A lone string literal is text; anything else is an arithmetic expression.
    fn parse_operand(&mut self) -> Result<Operand, ParserError> {
        let token = self.peek()?;
        if matches!(token.kind, TokenKind::StringLiteral) {
            let _ = self.next_token()?;
            let lexeme = self.lexeme(&token);
            let value = lexeme.get(1..lexeme.len().saturating_sub(1)).unwrap_or_default();
            return Ok(Operand::Text(value.into()));
        }
        Ok(Operand::Expression(self.parse_expression()?))
    }
}

// Pratt parser for expressions
impl<'src> Parser<'src> {
    pub fn parse_expression(&mut self) -> Result<Expression, ParserError> {
        self.parse_expression_pratt(0)
    }

    fn peek_binary_operator(&mut self) -> Result<Option<BinaryOperator>, ParserError> {
        let token = self.peek()?;

        match token.kind {
            TokenKind::Plus => Ok(Some(BinaryOperator::Add)),
            TokenKind::Minus => Ok(Some(BinaryOperator::Subtract)),
            TokenKind::Star => Ok(Some(BinaryOperator::Multiply)),
            TokenKind::Slash => Ok(Some(BinaryOperator::Divide)),
            _ => Ok(None),
        }
    }

    fn expect_left_expression(&mut self) -> Result<Expression, ParserError> {
        let token = self.next_token()?;

        match token.kind {
            TokenKind::NumericLiteral => match self.lexeme(&token).parse() {
                Ok(value) => Ok(Expression::Number(value)),
                Err(_) => Err(self.error(ParserErrorKind::NonExpression(token.kind), token.span)),
            },
            TokenKind::Ident => Ok(Expression::variable(self.lexeme(&token))),
            // Unary operators
            TokenKind::Minus => {
                let rbp = PrefixOperator::Minus.get_binding_power();
                let rhs = self.parse_expression_pratt(rbp)?;
                Ok(Expression::negate(rhs))
            }
            // Bracketed expression
            TokenKind::LeftParenthesis => {
                let inner = self.parse_expression_pratt(0)?;
                self.expect(TokenKind::RightParenthesis)?;
                Ok(inner)
            }
            TokenKind::Eof => Err(self.error(ParserErrorKind::UnexpectedEof, token.span)),
            kind => Err(self.error(ParserErrorKind::NonExpression(kind), token.span)),
        }
    }

    fn parse_expression_pratt(&mut self, min_bp: u8) -> Result<Expression, ParserError> {
        if self.depth >= MAX_EXPRESSION_DEPTH {
            let token = self.peek()?;
            return Err(self.error(
                ParserErrorKind::NestingTooDeep(MAX_EXPRESSION_DEPTH),
                token.span,
            ));
        }
        self.depth += 1;
        let expression = self.parse_binary_expression(min_bp);
        self.depth -= 1;
        expression
    }

    fn parse_binary_expression(&mut self, min_bp: u8) -> Result<Expression, ParserError> {
        let mut lhs = self.expect_left_expression()?;

        while let Some(operator) = self.peek_binary_operator()? {
            let (lbp, rbp) = operator.get_binding_power();
            if lbp < min_bp {
                break;
            }
            let _ = self.next_token()?;

            let rhs = self.parse_expression_pratt(rbp)?;
            lhs = Expression::binary(operator, lhs, rhs);
        }
        Ok(lhs)
    }
}
