use proptest::prelude::*;

use quill::lexer::{
    formatter::{BasicFormatter, TokenFormatter},
    LexicalErrorKind, Lexer, Span, SpanIndex, Token, TokenKind,
};

fn check(input: &str, expected: &str) {
    let mut scanner = Lexer::new(input);
    let formatter = BasicFormatter::new(input);
    let mut buffer = String::new();
    loop {
        match scanner.next_token() {
            Ok(token) => {
                buffer.push_str(&formatter.format(&token));
                if matches!(token.kind, TokenKind::Eof) {
                    break;
                }
            }
            Err(error) => {
                buffer.push_str(&formatter.format_lexical_error(&error));
                break;
            }
        }
        buffer.push('\n');
    }

    assert_eq!(buffer, expected);
}

fn kinds(input: &str) -> Vec<TokenKind> {
    Lexer::new(input)
        .tokenize()
        .expect("input should lex")
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn smoke_test() {
    check("", "(1) EOF  null");
}

#[test]
fn assignment_line() {
    check(
        "total = 1.5 * (x + 2)\nprint \"ok\"",
        "(1) IDENTIFIER total null\n\
         (1) EQUAL = null\n\
         (1) NUMBER 1.5 1.5\n\
         (1) STAR * null\n\
         (1) LEFT_PAREN ( null\n\
         (1) IDENTIFIER x null\n\
         (1) PLUS + null\n\
         (1) NUMBER 2 2.0\n\
         (1) RIGHT_PAREN ) null\n\
         (2) PRINT print null\n\
         (2) STRING \"ok\" ok\n\
         (2) EOF  null",
    );
}

#[test]
fn comments_run_to_end_of_line() {
    assert_eq!(
        kinds("a / b // ignored * (\nc"),
        vec![
            TokenKind::Ident,
            TokenKind::Slash,
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn trailing_dot_is_not_part_of_number() {
    let mut scanner = Lexer::new("12.");
    let number = scanner.next_token().expect("number");
    assert_eq!(number.kind, TokenKind::NumericLiteral);
    assert_eq!(number.span, Span::new(0, 2));
    let error = scanner.next_token().unwrap_err();
    assert_eq!(error.kind, LexicalErrorKind::Unrecognized('.'));
    assert_eq!(error.span, Span::new(2, 1));
}

#[test]
fn keywords_are_case_sensitive() {
    assert_eq!(
        kinds("print Print PRINT printer _print"),
        vec![
            TokenKind::KeywordPrint,
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn unterminated_string_is_reported_from_the_quote() {
    check("x = \"abc", "(1) IDENTIFIER x null\n(1) EQUAL = null\n(1) Unterminated string.");
    let error = Lexer::new("x = \"abc").tokenize().unwrap_err();
    assert_eq!(error.kind, LexicalErrorKind::UnclosedString);
    assert_eq!(error.span, Span::new(4, 4));
}

#[test]
fn unrecognized_character_reports_its_line() {
    check("a\nb ?", "(1) IDENTIFIER a null\n(2) IDENTIFIER b null\n(2) Unexpected character: ?");
}

#[test]
fn offset_lexer_reports_absolute_spans() {
    let source = "x = 1\ny = 22";
    let line = &source[6..];
    let scanner = Lexer::with_offset(line, 6.into());
    let tokens = scanner.tokenize().expect("line should lex");
    let number = &tokens[2];
    assert_eq!(number.span, Span::new(10, 2));
    assert_eq!(&source[number.span.range()], "22");
}

#[test]
fn multibyte_characters_have_byte_spans() {
    let error = Lexer::new("a é").tokenize().unwrap_err();
    assert_eq!(error.kind, LexicalErrorKind::Unrecognized('é'));
    assert_eq!(error.span.range(), 2..4);
}

#[test]
fn oversized_offsets_saturate() {
    let max = u32::MAX as usize;

    let span = Span::new(usize::MAX, 5);
    assert_eq!(span.range(), max..max);

    let span = Span::new(max - 1, 10);
    assert_eq!(span.range(), max - 1..max);

    assert_eq!(usize::from(SpanIndex::from(usize::MAX) + 1usize), max);
}

// Property-based tests

fn symbol_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("(".to_string()),
        Just(")".to_string()),
        Just("-".to_string()),
        Just("+".to_string()),
        Just("*".to_string()),
        Just("/".to_string()),
        Just("=".to_string()),
    ]
}

fn numeric_literal_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]+",           // Integer literals
        "[0-9]+\\.[0-9]+",  // Decimal literals
    ]
}

fn string_literal_strategy() -> impl Strategy<Value = String> {
    "[^\"]*".prop_map(|s: String| format!("\"{}\"", s))
}

fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]*"
}

fn keyword_strategy() -> impl Strategy<Value = String> {
    Just("print".to_string())
}

fn comment_strategy() -> impl Strategy<Value = String> {
    "[^\n]*".prop_map(|s: String| format!("//{}\n", s))
}

fn token_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        symbol_strategy(),
        numeric_literal_strategy(),
        string_literal_strategy(),
        identifier_strategy(),
        keyword_strategy(),
    ]
}

fn token_sequence_with_comments_strategy() -> impl Strategy<Value = String> {
    const MIN_TOKEN_COUNT: usize = 1;
    const MAX_TOKEN_COUNT: usize = 100;
    prop::collection::vec(
        prop_oneof![token_strategy(), comment_strategy()],
        MIN_TOKEN_COUNT..MAX_TOKEN_COUNT,
    )
    .prop_map(|tokens| tokens.join(" "))
}

fn token_sequence_without_comments_strategy() -> impl Strategy<Value = Vec<String>> {
    const MIN_TOKEN_COUNT: usize = 1;
    const MAX_TOKEN_COUNT: usize = 100;
    prop::collection::vec(token_strategy(), MIN_TOKEN_COUNT..MAX_TOKEN_COUNT)
}

proptest! {
    #[test]
    fn lexer_handles_valid_tokens_without_comments(input in token_sequence_without_comments_strategy()) {
        // Add 1 to include EOF token
        let expected_num_tokens = input.len() + 1;
        let source = input.join(" ");
        let tokens = Lexer::new(&source).tokenize();
        prop_assert!(tokens.is_ok(), "{source:?} failed with {tokens:?}");
        let tokens = tokens.unwrap();
        prop_assert_eq!(tokens.len(), expected_num_tokens);

        // Every lexeme is exactly the text that was joined together.
        for (token, expected) in tokens.iter().zip(&input) {
            prop_assert_eq!(&source[token.span.range()], expected.as_str());
        }
    }

    #[test]
    fn lexer_handles_valid_tokens_with_comments(input in token_sequence_with_comments_strategy()) {
        let mut scanner = Lexer::new(&input);
        loop {
            match scanner.next_token() {
                Ok(Token {kind: TokenKind::Eof, ..}) => {
                    break;
                },
                token => {
                    prop_assert!(token.is_ok());
                }
            }
        }
    }
}
