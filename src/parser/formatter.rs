use super::error::{
    ExpressionParserError, ExpressionParserErrorKind, ParserError, ParserErrorKind,
};
use crate::{
    expression::formatter::{ExpressionFormatter, SExpressionFormatter as SExprFormatter},
    lexer::{LexicalErrorKind, LineBreaks, Span},
    statement::{Operand, Program, Statement},
};
use ariadne::{Color, Config, Label, Report, ReportKind, Source};

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

pub trait ProgramFormatter {
    fn format(&self, program: &Program) -> String;
}

pub struct DebugProgramFormatter;

impl ProgramFormatter for DebugProgramFormatter {
    fn format(&self, program: &Program) -> String {
        program
            .iter()
            .map(|stmt| format!("{stmt:?}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One S-expression per statement, e.g. `(= total (+ x y))`.
pub struct SExpressionFormatter;

impl SExpressionFormatter {
    fn format_operand(operand: &Operand) -> String {
        match operand {
            Operand::Text(text) => format!("{text:?}"),
            Operand::Expression(expr) => SExprFormatter.format(expr),
        }
    }

    pub fn format_statement(statement: &Statement) -> String {
        match statement {
            Statement::Assignment(stmt) => {
                format!("(= {} {})", stmt.name, Self::format_operand(&stmt.value))
            }
            Statement::Print(stmt) => format!("(print {})", Self::format_operand(&stmt.argument)),
        }
    }
}

impl ProgramFormatter for SExpressionFormatter {
    fn format(&self, program: &Program) -> String {
        program
            .iter()
            .map(Self::format_statement)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub trait ParserFormatter {
    fn format_error(&self, error: &ParserError) -> String;
    fn format_expression_error(&self, error: &ExpressionParserError) -> String;
}

pub struct DebugParserFormatter;

impl ParserFormatter for DebugParserFormatter {
    fn format_error(&self, error: &ParserError) -> String {
        format!("{error:?}")
    }

    fn format_expression_error(&self, error: &ExpressionParserError) -> String {
        format!("{error:?}")
    }
}

/// Single line errors of the form `(line) message`.
pub struct BasicParserFormatter {
    line_breaks: LineBreaks,
}

impl BasicParserFormatter {
    pub fn new(text: &str) -> Self {
        Self {
            line_breaks: LineBreaks::new(text),
        }
    }
}

impl ParserFormatter for BasicParserFormatter {
    fn format_error(&self, error: &ParserError) -> String {
        format!("({}) {}", error.line, error.kind)
    }

    fn format_expression_error(&self, error: &ExpressionParserError) -> String {
        let line = self.line_breaks.get_line_from_span(error.span);
        format!("({line}) {}", error.kind)
    }
}

/// Source annotated diagnostics rendered with `ariadne`.
pub struct PrettyParserFormatter<'src> {
    text: &'src str,
    path: &'src str,
    colored: bool,
}

impl<'src> PrettyParserFormatter<'src> {
    pub fn new(text: &'src str, path: &'src str) -> Self {
        Self {
            text,
            path,
            colored: true,
        }
    }

    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    fn render(&self, code: &str, span: Span, message: &str, label: String) -> String {
        let path = self.path;
        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, span.range()))
            .with_config(Config::default().with_color(self.colored))
            .with_code(code)
            .with_message(message)
            .with_label(
                Label::new((path, span.range()))
                    .with_message(label)
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write((path, Source::from(self.text)), &mut output)
            .expect(ARIADNE_WRITE_MSG);
        String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
    }
}

impl<'src> ParserFormatter for PrettyParserFormatter<'src> {
    fn format_error(&self, error: &ParserError) -> String {
        let (message, label) = match &error.kind {
            ParserErrorKind::UnexpectedToken { actual, expected } => (
                "Expected a different token",
                format!("Expected {expected} but got {actual}"),
            ),
            ParserErrorKind::NonExpression(kind) => (
                "Expected an expression",
                format!("{kind} cannot start an expression"),
            ),
            ParserErrorKind::UnexpectedEof => {
                ("Unexpected end of line", "Line ends here...".into())
            }
            ParserErrorKind::InvalidStatement(kind) => (
                "Expected a statement",
                format!("Statements start with `print` or an identifier, not {kind}"),
            ),
            ParserErrorKind::TrailingToken(kind) => (
                "Unexpected trailing token",
                format!("{kind} follows a complete statement"),
            ),
            ParserErrorKind::NestingTooDeep(limit) => (
                "Expression nested too deeply",
                format!("Nesting goes past {limit} levels here"),
            ),
            ParserErrorKind::LexicalError(lexical) => match lexical.kind {
                LexicalErrorKind::Unrecognized(c) => {
                    ("Unrecognized character", format!("`{c}` is not valid here"))
                }
                LexicalErrorKind::UnclosedString => {
                    ("Unterminated string literal", "String starts here...".into())
                }
            },
        };
        self.render(error.code(), error.span, message, label)
    }

    fn format_expression_error(&self, error: &ExpressionParserError) -> String {
        let (message, label) = match &error.kind {
            ExpressionParserErrorKind::InsufficientOperands {
                operator,
                available,
            } => (
                "Not enough operands for operator",
                format!("`{operator}` needs 2 operands but {available} available"),
            ),
            ExpressionParserErrorKind::LeftoverOperands { count } => (
                "Expression does not reduce to a single value",
                format!("{count} operands are left on the stack"),
            ),
            ExpressionParserErrorKind::EmptyExpression => {
                ("Empty expression", "Expected at least one operand".into())
            }
            ExpressionParserErrorKind::InvalidNumber(token) => (
                "Malformed numeric literal",
                format!("`{token}` is not a number"),
            ),
        };
        self.render(error.code(), error.span, message, label)
    }
}
