use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use compact_str::CompactString;
use quill::Value;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::{fs::read_to_string, process::ExitCode};

const EXIT_DATA_ERROR: u8 = 65;
const EXIT_SOFTWARE_ERROR: u8 = 70;

#[derive(Debug, Parser)]
#[clap(name = "quill", version)]
pub struct CLArgs {
    #[clap(subcommand)]
    pub routine: QuillCommand,
}

#[derive(Debug, Subcommand)]
pub enum QuillCommand {
    /// Print the tokens of a script.
    Tokenize {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "basic")]
        format: TokenFormat,
    },
    /// Print the statements of a script.
    Parse {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "sexpr")]
        format: ProgramFormat,
        #[clap(long = "errors", value_enum, default_value = "pretty")]
        errors: ErrorFormat,
    },
    /// Execute a script.
    Run {
        path: PathBuf,
        #[clap(long = "errors", value_enum, default_value = "pretty")]
        errors: ErrorFormat,
        /// Dump the final variable bindings to stderr.
        #[clap(long)]
        dump: bool,
    },
    /// Evaluate a postfix expression such as `"x y + 3 *"`.
    Postfix {
        expression: String,
        /// Variable binding in the form `name=value`.
        #[clap(long = "var", value_parser = parse_binding)]
        vars: Vec<Binding>,
        /// Print the parsed tree to stderr before evaluating it.
        #[clap(long = "tree", value_enum)]
        tree: Option<ProgramFormat>,
        #[clap(long = "errors", value_enum, default_value = "pretty")]
        errors: ErrorFormat,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum TokenFormat {
    Debug,
    Basic,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ProgramFormat {
    Debug,
    #[clap(name = "sexpr")]
    SExpr,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ErrorFormat {
    Debug,
    Basic,
    Pretty,
}

#[derive(Debug, Clone)]
pub struct Binding {
    name: CompactString,
    value: Value,
}

fn parse_binding(input: &str) -> Result<Binding, String> {
    let (name, raw) = input
        .split_once('=')
        .ok_or_else(|| format!("expected `name=value` but got `{input}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing variable name in `{input}`"));
    }
    let raw = raw.trim();
    let value = match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => raw.parse::<f64>().map(Value::Number).unwrap_or_else(|_| raw.into()),
    };
    Ok(Binding {
        name: name.into(),
        value,
    })
}

fn main() -> ExitCode {
    quill_main().expect("Encountered an error!")
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Only initialize if RUST_LOG is set
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn quill_main() -> Result<ExitCode> {
    color_eyre::install().expect("Can't fail at first call!");
    init_tracing();
    let args = CLArgs::parse();
    let succeeded = match args.routine {
        QuillCommand::Tokenize { path, format } => {
            eprintln!("Tokenizing {:?}...", path);
            let src = read_to_string(path)?;
            tokenize(&src, &format)
        }
        QuillCommand::Parse {
            path,
            format,
            errors,
        } => {
            eprintln!("Parsing {:?}...", path);
            let src = read_to_string(&path)?;
            parse(&src, &path.to_string_lossy(), &format, &errors)
        }
        QuillCommand::Run { path, errors, dump } => {
            eprintln!("Running {:?}...", path);
            let src = read_to_string(&path)?;
            run(&src, &path.to_string_lossy(), &errors, dump)
        }
        QuillCommand::Postfix {
            expression,
            vars,
            tree,
            errors,
        } => postfix(&expression, vars, tree.as_ref(), &errors)?,
    };
    Ok(match succeeded {
        Outcome::Success => ExitCode::SUCCESS,
        Outcome::ParseFailure => ExitCode::from(EXIT_DATA_ERROR),
        Outcome::RuntimeFailure => ExitCode::from(EXIT_SOFTWARE_ERROR),
    })
}

enum Outcome {
    Success,
    ParseFailure,
    RuntimeFailure,
}

fn tokenize(src: &str, format: &TokenFormat) -> Outcome {
    use quill::lexer::formatter::{BasicFormatter, DebugFormatter, TokenFormatter};
    use quill::lexer::{Lexer, TokenKind};

    let mut scanner = Lexer::new(src);
    let formatter: Box<dyn TokenFormatter> = match format {
        TokenFormat::Debug => Box::new(DebugFormatter),
        TokenFormat::Basic => Box::new(BasicFormatter::new(src)),
    };
    loop {
        match scanner.next_token() {
            Ok(token) => {
                println!("{}", formatter.format(&token));
                if matches!(token.kind, TokenKind::Eof) {
                    return Outcome::Success;
                }
            }
            Err(error) => {
                eprintln!("{}", formatter.format_lexical_error(&error));
                return Outcome::ParseFailure;
            }
        };
    }
}

fn parser_formatter<'src>(
    src: &'src str,
    path: &'src str,
    errors: &ErrorFormat,
) -> Box<dyn quill::parser::formatter::ParserFormatter + 'src> {
    use quill::parser::formatter::{
        BasicParserFormatter, DebugParserFormatter, PrettyParserFormatter,
    };

    match errors {
        ErrorFormat::Debug => Box::new(DebugParserFormatter),
        ErrorFormat::Basic => Box::new(BasicParserFormatter::new(src)),
        ErrorFormat::Pretty => Box::new(
            PrettyParserFormatter::new(src, path).with_color(std::io::stderr().is_terminal()),
        ),
    }
}

fn value_formatter<'src>(
    src: &'src str,
    path: &'src str,
    errors: &ErrorFormat,
) -> Box<dyn quill::value::formatter::ValueFormatter + 'src> {
    use quill::value::formatter::{BasicFormatter, DebugFormatter, PrettyFormatter};

    match errors {
        ErrorFormat::Debug => Box::new(DebugFormatter),
        ErrorFormat::Basic => Box::new(BasicFormatter),
        ErrorFormat::Pretty => {
            Box::new(PrettyFormatter::new(src, path).with_color(std::io::stderr().is_terminal()))
        }
    }
}

fn parse(src: &str, path: &str, format: &ProgramFormat, errors: &ErrorFormat) -> Outcome {
    use quill::parser::formatter::{DebugProgramFormatter, ProgramFormatter, SExpressionFormatter};

    let program = match quill::parse_script(src) {
        Ok(program) => program,
        Err(error) => {
            eprintln!("{}", parser_formatter(src, path, errors).format_error(&error));
            return Outcome::ParseFailure;
        }
    };
    let formatter: Box<dyn ProgramFormatter> = match format {
        ProgramFormat::Debug => Box::new(DebugProgramFormatter),
        ProgramFormat::SExpr => Box::new(SExpressionFormatter),
    };
    println!("{}", formatter.format(&program));
    Outcome::Success
}

fn run(src: &str, path: &str, errors: &ErrorFormat, dump: bool) -> Outcome {
    use quill::interpreter::{context::StdioContext, TreeWalkInterpreter};
    use quill::value::formatter::BasicFormatter;

    let program = match quill::parse_script(src) {
        Ok(program) => program,
        Err(error) => {
            eprintln!("{}", parser_formatter(src, path, errors).format_error(&error));
            return Outcome::ParseFailure;
        }
    };

    let mut interpreter = TreeWalkInterpreter::new(StdioContext);
    let result = interpreter.execute(&program);
    if dump {
        for (name, value) in interpreter.environment().iter() {
            eprintln!("{name} = {}", BasicFormatter::format_verbose(value));
        }
    }
    match result {
        Ok(()) => Outcome::Success,
        Err(error) => {
            eprintln!("{}", value_formatter(src, path, errors).format_error(&error));
            Outcome::RuntimeFailure
        }
    }
}

fn postfix(
    expression: &str,
    vars: Vec<Binding>,
    tree_format: Option<&ProgramFormat>,
    errors: &ErrorFormat,
) -> Result<Outcome> {
    use quill::expression::formatter::{DebugFormatter, ExpressionFormatter, SExpressionFormatter};
    use quill::interpreter::error::ExecutionError;
    use quill::lexer::Span;
    use quill::Environment;

    const PATH: &str = "<expression>";

    let tree = match quill::parse_postfix(expression) {
        Ok(tree) => tree,
        Err(error) => {
            let formatter = parser_formatter(expression, PATH, errors);
            eprintln!("{}", formatter.format_expression_error(&error));
            return Ok(Outcome::ParseFailure);
        }
    };

    if let Some(format) = tree_format {
        let formatter: Box<dyn ExpressionFormatter> = match format {
            ProgramFormat::Debug => Box::new(DebugFormatter),
            ProgramFormat::SExpr => Box::new(SExpressionFormatter),
        };
        eprintln!("{}", formatter.format(&tree));
    }

    let environment =
        Environment::try_from_iter(vars.into_iter().map(|binding| (binding.name, binding.value)))?;
    match tree.interpret(&environment) {
        Ok(value) => {
            println!("{value}");
            Ok(Outcome::Success)
        }
        Err(error) => {
            let error = ExecutionError {
                error,
                line: 1,
                span: Span::new(0, expression.len()),
            };
            eprintln!("{}", value_formatter(expression, PATH, errors).format_error(&error));
            Ok(Outcome::RuntimeFailure)
        }
    }
}
