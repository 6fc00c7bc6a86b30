use super::{
    token::{Token, TokenKind},
    LineBreaks,
};
use crate::lexer::{LexicalError, LexicalErrorKind};

/// Interface for creating new token formatters.
pub trait TokenFormatter {
    /// Formats a token into a string.
    fn format(&self, token: &Token) -> String;
    /// Formats a lexer error into a string.
    fn format_lexical_error(&self, error: &LexicalError) -> String;
}

/// One token per line in the form `(line) KIND lexeme literal`.
pub struct BasicFormatter<'src> {
    text: &'src str,
    line_breaks: LineBreaks,
}

impl<'src> BasicFormatter<'src> {
    pub fn new(text: &'src str) -> Self {
        Self {
            text,
            line_breaks: LineBreaks::new(text),
        }
    }

    fn lexeme(&self, token: &Token) -> &'src str {
        self.text.get(token.span.range()).unwrap_or_default()
    }
}

impl<'src> TokenFormatter for BasicFormatter<'src> {
    fn format(&self, token: &Token) -> String {
        let line = self.line_breaks.get_line_from_span(token.span);
        let lexeme = self.lexeme(token);
        let literal = match token.kind {
            TokenKind::NumericLiteral => match lexeme.parse::<f64>() {
                Ok(value) => format!("{value:?}"),
                Err(_) => "null".into(),
            },
            TokenKind::StringLiteral => lexeme
                .get(1..lexeme.len().saturating_sub(1))
                .unwrap_or_default()
                .into(),
            _ => "null".into(),
        };
        format!("({line}) {} {lexeme} {literal}", token.kind)
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        let line = self.line_breaks.get_line_from_span(error.span);
        match error.kind {
            LexicalErrorKind::Unrecognized(c) => {
                format!("({line}) Unexpected character: {c}")
            }
            LexicalErrorKind::UnclosedString => {
                format!("({line}) Unterminated string.")
            }
        }
    }
}

pub struct DebugFormatter;

impl TokenFormatter for DebugFormatter {
    fn format(&self, token: &Token) -> String {
        format!("{token:?}")
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        format!("{error:?}")
    }
}
