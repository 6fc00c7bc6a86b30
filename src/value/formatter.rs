use super::error::RuntimeError;
use super::Value;
use crate::interpreter::error::ExecutionError;
use ariadne::{Color, Config, Label, Report, ReportKind, Source};

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

pub trait ValueFormatter {
    fn format(&self, value: &Value) -> String;
    fn format_error(&self, error: &ExecutionError) -> String;
}

pub struct DebugFormatter;

impl ValueFormatter for DebugFormatter {
    fn format(&self, value: &Value) -> String {
        format!("{value:?}")
    }

    fn format_error(&self, error: &ExecutionError) -> String {
        format!("{error:?}")
    }
}

pub struct BasicFormatter;

impl BasicFormatter {
    pub fn format_verbose(value: &Value) -> String {
        match value {
            Value::Number(v) => format!("Number({v})"),
            Value::Text(v) => format!("Text(\"{v}\")"),
            Value::Bool(v) => format!("Bool({v})"),
        }
    }
}

impl ValueFormatter for BasicFormatter {
    fn format(&self, value: &Value) -> String {
        format!("{value}")
    }

    fn format_error(&self, error: &ExecutionError) -> String {
        format!("({}) {}", error.line, error.error)
    }
}

pub struct PrettyFormatter<'src> {
    text: &'src str,
    path: &'src str,
    colored: bool,
}

impl<'src> PrettyFormatter<'src> {
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
}

impl<'src> ValueFormatter for PrettyFormatter<'src> {
    fn format(&self, value: &Value) -> String {
        format!("{value}")
    }

    fn format_error(&self, error: &ExecutionError) -> String {
        let path = self.path;
        let span = error.span;
        let (message, label) = match &error.error {
            RuntimeError::UndefinedVariable(name) => (
                "Attempted to access a variable that has not been assigned",
                format!("`{name}` has not been assigned yet."),
            ),
            RuntimeError::TypeMismatch {
                operation,
                expected,
                actual,
            } => (
                "Operand has the wrong type",
                format!("`{operation}` expects {expected} but got {actual}."),
            ),
            RuntimeError::DivisionByZero => (
                "Attempted to divide by zero",
                "The divisor evaluates to zero.".into(),
            ),
            RuntimeError::InvalidIdentifier(name) => (
                "Attempted to bind an invalid identifier",
                format!("{name:?} is not a valid variable name."),
            ),
        };

        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, span.range()))
            .with_config(Config::default().with_color(self.colored))
            .with_code(error.code())
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
