mod cursor;
mod error;
pub mod formatter;
mod token;

use cursor::SourceChar;
pub use error::{LexicalError, LexicalErrorKind};
use std::{ops::Range, rc::Rc, str::Chars};
pub use token::{Span, SpanIndex, SpanLength, Token, TokenKind, KEYWORD_HASHMAP};

#[derive(Debug, Clone)]
pub struct LineBreaks {
    line_breaks: Rc<[Range<SpanIndex>]>,
}

impl LineBreaks {
    pub fn new(text: &str) -> Self {
        let line_breaks = if !text.is_empty() {
            let mut line_breaks = Vec::new();
            let mut cursor: SpanIndex = 0.into();
            for (offset, byte) in text.bytes().enumerate() {
                let offset = (offset + 1).into();
                if byte == b'\n' {
                    line_breaks.push(cursor..offset);
                    cursor = offset;
                }
            }
            if !text.ends_with('\n') {
                line_breaks.push(cursor..(text.len() + 1).into());
            }
            line_breaks
        } else {
            vec![0.into()..1.into()]
        };
        Self {
            line_breaks: line_breaks.into(),
        }
    }

    pub fn get_max_line(&self) -> u32 {
        (self.line_breaks.len() + 1) as u32
    }

    pub fn get_line(&self, offset: SpanIndex) -> u32 {
        self.line_breaks
            .binary_search_by(|r| {
                if offset < r.start {
                    std::cmp::Ordering::Greater
                } else if offset >= r.end {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .map(|v| (v + 1) as u32)
            .unwrap_or(self.get_max_line())
    }

    pub fn get_line_from_span(&self, span: Span) -> u32 {
        self.get_line(span.start)
    }
}

/// Hand-written scanner over a piece of source text.
///
/// Spans are absolute: a lexer created with [`Lexer::with_offset`] reports
/// byte positions relative to the enclosing source, which lets a script be
/// scanned line by line while diagnostics still point into the whole file.
#[derive(Debug)]
pub struct Lexer<'src> {
    source: &'src str,
    chars: Chars<'src>,
    base: SpanIndex,
    offset: SpanIndex,
    lookahead: Vec<SourceChar>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self::with_offset(source, 0.into())
    }

    pub fn with_offset(source: &'src str, base: SpanIndex) -> Self {
        Self {
            source,
            chars: source.chars(),
            base,
            offset: base,
            lookahead: Vec::new(),
        }
    }

    pub fn get_lexeme(&self, span: &Span) -> Option<&'src str> {
        let start = span.start.to_usize().checked_sub(self.base.to_usize())?;
        self.source.get(start..start + span.length.to_usize())
    }

    /// Scans until EOF, returning every token including the final `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexicalError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }
}

impl<'src> Lexer<'src> {
    fn next_char(&mut self) -> Option<SourceChar> {
        if let Some(c) = self.lookahead.pop() {
            return Some(c);
        }
        let value = self.chars.next()?;
        let offset = self.offset;
        self.offset = self.offset + value.len_utf8();
        Some(SourceChar { value, offset })
    }

    fn put_back_char(&mut self, c: SourceChar) {
        self.lookahead.push(c);
    }

    fn single(kind: TokenKind, c: &SourceChar) -> Token {
        Token {
            kind,
            span: Span {
                start: c.offset,
                length: c.value.len_utf8().into(),
            },
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexicalError> {
        loop {
            let Some(c) = self.next_char() else {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    span: Span {
                        start: self.offset,
                        length: 0.into(),
                    },
                });
            };

            let kind = match c.value {
                ch if ch.is_whitespace() => continue,
                '(' => TokenKind::LeftParenthesis,
                ')' => TokenKind::RightParenthesis,
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '*' => TokenKind::Star,
                '=' => TokenKind::Equal,
                '/' => match self.next_char() {
                    Some(next) if next.value == '/' => {
                        self.skip_comment();
                        continue;
                    }
                    Some(next) => {
                        self.put_back_char(next);
                        TokenKind::Slash
                    }
                    None => TokenKind::Slash,
                },
                '"' => return self.lex_string(c),
                ch if ch.is_ascii_digit() => return Ok(self.lex_number(c)),
                ch if ch.is_ascii_alphabetic() || ch == '_' => {
                    return Ok(self.lex_identifier(c));
                }
                ch => {
                    return Err(LexicalError {
                        kind: LexicalErrorKind::Unrecognized(ch),
                        span: Span {
                            start: c.offset,
                            length: ch.len_utf8().into(),
                        },
                    })
                }
            };
            return Ok(Self::single(kind, &c));
        }
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.next_char() {
            if c.value == '\n' {
                break;
            }
        }
    }

    fn lex_string(&mut self, open: SourceChar) -> Result<Token, LexicalError> {
        while let Some(c) = self.next_char() {
            if c.value == '"' {
                return Ok(Token {
                    kind: TokenKind::StringLiteral,
                    span: Span {
                        start: open.offset,
                        length: c.next_offset() - open.offset,
                    },
                });
            }
        }
        Err(LexicalError {
            kind: LexicalErrorKind::UnclosedString,
            span: Span {
                start: open.offset,
                length: self.offset - open.offset,
            },
        })
    }

    fn lex_number(&mut self, first: SourceChar) -> Token {
        let mut end = first.next_offset();
        let mut seen_dot = false;
        while let Some(c) = self.next_char() {
            match c.value {
                ch if ch.is_ascii_digit() => end = c.next_offset(),
                '.' if !seen_dot => match self.next_char() {
                    Some(next) if next.value.is_ascii_digit() => {
                        seen_dot = true;
                        end = next.next_offset();
                    }
                    Some(next) => {
                        self.put_back_char(next);
                        self.put_back_char(c);
                        break;
                    }
                    None => {
                        self.put_back_char(c);
                        break;
                    }
                },
                _ => {
                    self.put_back_char(c);
                    break;
                }
            }
        }
        Token {
            kind: TokenKind::NumericLiteral,
            span: Span {
                start: first.offset,
                length: end - first.offset,
            },
        }
    }

    fn lex_identifier(&mut self, first: SourceChar) -> Token {
        let mut end = first.next_offset();
        while let Some(c) = self.next_char() {
            if c.value.is_ascii_alphanumeric() || c.value == '_' {
                end = c.next_offset();
            } else {
                self.put_back_char(c);
                break;
            }
        }
        let span = Span {
            start: first.offset,
            length: end - first.offset,
        };
        let kind = self
            .get_lexeme(&span)
            .and_then(|lexeme| KEYWORD_HASHMAP.get(lexeme).copied())
            .unwrap_or(TokenKind::Ident);
        Token { kind, span }
    }
}
