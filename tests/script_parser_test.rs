use color_eyre::Result;
use pretty_assertions::assert_eq;
use quill::{
    interpreter::{context::BufferedContext, TreeWalkInterpreter},
    lexer::{LexicalErrorKind, TokenKind},
    parse_script,
    parser::{
        error::ParserErrorKind,
        formatter::{ProgramFormatter, SExpressionFormatter},
        MAX_EXPRESSION_DEPTH,
    },
    statement::{Operand, Statement},
    BinaryOperator, Expression,
};

#[test]
fn assignment_and_print_shapes() -> Result<()> {
    let program = parse_script("total = x + y\nprint total\nprint \"hi there\"")?;
    assert_eq!(program.len(), 3);

    let Some(Statement::Assignment(assignment)) = program.get_statement(0) else {
        panic!("expected an assignment");
    };
    assert_eq!(assignment.name, "total");
    assert_eq!(assignment.line, 1);
    assert_eq!(
        assignment.value,
        Operand::Expression(Expression::binary(
            BinaryOperator::Add,
            Expression::variable("x"),
            Expression::variable("y"),
        ))
    );

    let Some(Statement::Print(print)) = program.get_statement(2) else {
        panic!("expected a print");
    };
    assert_eq!(print.argument, Operand::Text("hi there".into()));
    assert_eq!(print.line, 3);
    Ok(())
}

#[test]
fn precedence_and_grouping() -> Result<()> {
    let program = parse_script("a = 1 + 2 * 3\nb = (1 + 2) * 3\nc = -x - -2\nd = 8 / 4 / 2")?;
    let rendered = SExpressionFormatter.format(&program);
    assert_eq!(
        rendered,
        [
            "(= a (+ 1.0 (* 2.0 3.0)))",
            "(= b (* (+ 1.0 2.0) 3.0))",
            "(= c (- (- x) (- 2.0)))",
            "(= d (/ (/ 8.0 4.0) 2.0))",
        ]
        .join("\n")
    );
    Ok(())
}

#[test]
fn blank_and_comment_lines_produce_no_statements() -> Result<()> {
    let source = "\n   \n// a comment\n\t// indented comment\nx = 1 // trailing\n\n";
    let program = parse_script(source)?;
    assert_eq!(program.len(), 1);
    let statement = program.get_statement(0).expect("one statement");
    assert_eq!(statement.line(), 5);
    assert_eq!(&source[statement.span().range()], "x = 1 // trailing");

    assert!(parse_script("")?.is_empty());
    assert!(parse_script("// only\n// comments")?.is_empty());
    Ok(())
}

#[test]
fn windows_line_endings_are_accepted() -> Result<()> {
    let program = parse_script("x = 1\r\nprint x\r\n")?;
    assert_eq!(program.len(), 2);
    assert_eq!(program.get_statement(1).map(Statement::line), Some(2));
    Ok(())
}

#[test]
fn first_malformed_line_stops_parsing() {
    let error = parse_script("x = 1\n  y 2\nprint +").unwrap_err();
    assert_eq!(error.line, 2);
    assert_eq!(error.text, "y 2");
    assert_eq!(
        error.kind,
        ParserErrorKind::UnexpectedToken {
            actual: TokenKind::NumericLiteral,
            expected: TokenKind::Equal,
        }
    );
    // Spans point into the whole script.
    assert_eq!(error.span.range(), 10..11);
    assert_eq!(error.code(), "SE001");
}

#[test]
fn statement_kinds_are_reported() {
    let cases = [
        ("print", ParserErrorKind::UnexpectedEof, "SE003"),
        ("print )", ParserErrorKind::NonExpression(TokenKind::RightParenthesis), "SE002"),
        ("42 = x", ParserErrorKind::InvalidStatement(TokenKind::NumericLiteral), "SE004"),
        ("x = (1 + 2", ParserErrorKind::UnexpectedToken {
            actual: TokenKind::Eof,
            expected: TokenKind::RightParenthesis,
        }, "SE001"),
        ("x = 1 2", ParserErrorKind::TrailingToken(TokenKind::NumericLiteral), "SE005"),
    ];
    for (source, kind, code) in cases {
        let error = parse_script(source).unwrap_err();
        assert_eq!(error.kind, kind, "{source:?}");
        assert_eq!(error.code(), code, "{source:?}");
    }
}

#[test]
fn lexical_errors_surface_through_the_parser() {
    let error = parse_script("x = 2 # 3").unwrap_err();
    let ParserErrorKind::LexicalError(ref lexical) = error.kind else {
        panic!("expected a lexical error but got {:?}", error.kind);
    };
    assert_eq!(lexical.kind, LexicalErrorKind::Unrecognized('#'));
    assert_eq!(error.code(), "LX001");

    let error = parse_script("name = \"open").unwrap_err();
    assert_eq!(error.code(), "LX002");
}

#[test]
fn error_display_includes_line_and_text() {
    let error = parse_script("x = 1\nprint print").unwrap_err();
    assert_eq!(
        error.to_string(),
        "[line 2] Expected an expression but got token PRINT. `print print`"
    );
}

#[test]
fn string_inside_expression_is_not_text() {
    let error = parse_script("x = 1 + \"two\"").unwrap_err();
    assert_eq!(
        error.kind,
        ParserErrorKind::NonExpression(TokenKind::StringLiteral)
    );
}

#[test]
fn nesting_within_the_limit_parses() -> Result<()> {
    let depth = MAX_EXPRESSION_DEPTH - 1;
    let source = format!("x = {}1{}", "(".repeat(depth), ")".repeat(depth));
    let program = parse_script(&source)?;
    let (environment, _) = TreeWalkInterpreter::new(BufferedContext::new()).run(&program)?;
    assert_eq!(environment.get_number("x")?, 1.0);
    Ok(())
}

#[test]
fn excessive_parenthesis_nesting_is_rejected() {
    let source = format!("x = {}1{}", "(".repeat(5000), ")".repeat(5000));
    let error = parse_script(&source).unwrap_err();
    assert_eq!(
        error.kind,
        ParserErrorKind::NestingTooDeep(MAX_EXPRESSION_DEPTH)
    );
    assert_eq!(error.code(), "SE006");
    assert_eq!(error.line, 1);
    assert_eq!(&source[error.span.range()], "(");
}

#[test]
fn excessive_prefix_minus_nesting_is_rejected() {
    let source = format!("print {}1", "-".repeat(5000));
    let error = parse_script(&source).unwrap_err();
    assert_eq!(
        error.kind,
        ParserErrorKind::NestingTooDeep(MAX_EXPRESSION_DEPTH)
    );
}

#[test]
fn long_flat_chain_is_not_nesting() -> Result<()> {
    let terms = 50_000;
    let source = format!("total = 1{}\nprint total", " + 1".repeat(terms - 1));
    let program = parse_script(&source)?;
    let (environment, context) =
        TreeWalkInterpreter::new(BufferedContext::new()).run(&program)?;
    assert_eq!(environment.get_number("total")?, terms as f64);
    assert_eq!(context.into_lines(), vec![terms.to_string()]);
    Ok(())
}
