use std::{
    fs::{read_dir, read_to_string},
    path::Path,
};

use color_eyre::{eyre::Context, Result};
use pretty_assertions::assert_eq;
use quill::{
    interpreter::{context::BufferedContext, TreeWalkInterpreter},
    parse_script,
    parser::formatter::{BasicParserFormatter, ParserFormatter},
    value::formatter::{BasicFormatter, ValueFormatter},
    Environment, Value,
};

#[test]
fn test_assignment() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/assignment");
    test_engine(input_dir)
}

#[test]
fn test_print() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/print");
    test_engine(input_dir)
}

#[test]
fn test_operator() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/operator");
    test_engine(input_dir)
}

#[test]
fn test_comments() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/comments");
    test_engine(input_dir)
}

#[test]
fn test_errors() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/errors");
    test_engine(input_dir)
}

#[test]
fn sum_script_binds_result_and_prints_once() -> Result<()> {
    let program = parse_script("x = 10\ny = 20\nresult = x + y\nprint result")?;
    let (environment, context) =
        TreeWalkInterpreter::new(BufferedContext::new()).run(&program)?;

    assert_eq!(environment.get_variable("result")?, &Value::Number(30.0));
    assert_eq!(context.into_lines(), vec!["30".to_string()]);
    Ok(())
}

#[test]
fn statements_execute_one_by_one_against_shared_environment() -> Result<()> {
    let program = parse_script("a = 3\nb = a * 2\nprint b\nprint \"done\"")?;
    let mut environment = Environment::new();
    let mut context = BufferedContext::new();
    for stmt in program.iter() {
        stmt.execute(&mut environment, &mut context)?;
    }

    assert_eq!(environment.get_number("b")?, 6.0);
    assert_eq!(context.into_data(), "6\ndone\n");
    Ok(())
}

#[test]
fn rerun_against_cleared_environment_is_identical() -> Result<()> {
    let program = parse_script("x = 2\nx = x * x\nprint x\nlabel = \"sq\"\nprint label")?;
    let mut environment = Environment::new();

    let mut runs = Vec::new();
    for _ in 0..3 {
        environment.clear();
        assert!(environment.is_empty());
        let mut context = BufferedContext::new();
        for stmt in &program {
            stmt.execute(&mut environment, &mut context)?;
        }
        runs.push((environment.clone(), context.into_lines()));
    }

    assert_eq!(runs[0], runs[1]);
    assert_eq!(runs[1], runs[2]);
    assert_eq!(runs[0].1, vec!["4".to_string(), "sq".to_string()]);
    assert_eq!(environment.len(), 2);
    Ok(())
}

#[test]
fn runtime_error_keeps_earlier_effects_and_reports_line() -> Result<()> {
    let program = parse_script("x = 1\nprint x\ny = x / 0\nprint y")?;
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new());
    let error = interpreter
        .execute(&program)
        .expect_err("division by zero must fail");

    assert_eq!(error.line, 3);
    assert_eq!(error.code(), "RT003");
    assert!(interpreter.environment().contains("x"));
    assert!(!interpreter.environment().contains("y"));
    let (_, context) = interpreter.into_parts();
    assert_eq!(context.into_lines(), vec!["1".to_string()]);
    Ok(())
}

#[test]
fn interpreter_can_start_from_existing_bindings() -> Result<()> {
    let environment = Environment::try_from_iter([("base", 40.0)])?;
    let program = parse_script("answer = base + 2\nprint answer")?;
    let (environment, context) =
        TreeWalkInterpreter::with_environment(environment, BufferedContext::new())
            .run(&program)?;

    assert_eq!(environment.get_number("answer")?, 42.0);
    assert_eq!(context.into_data(), "42\n");
    Ok(())
}

struct TestCase {
    name: String,
    source: String,
    output: String,
    syntax_errors: String,
    runtime_errors: String,
}

impl TestCase {
    fn check(&self) {
        let parser_formatter = BasicParserFormatter::new(&self.source);
        let value_formatter = BasicFormatter;

        let program = match parse_script(&self.source) {
            Ok(program) => program,
            Err(e) => {
                assert_eq!(
                    self.syntax_errors,
                    parser_formatter.format_error(&e),
                    "Failed test {} at parse stage.",
                    self.name,
                );
                return;
            }
        };
        assert_eq!(
            self.syntax_errors, "",
            "Failed test {}: expected a syntax error.",
            self.name
        );

        let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new());
        let runtime_errors = match interpreter.execute(&program) {
            Ok(()) => String::new(),
            Err(e) => value_formatter.format_error(&e),
        };
        assert_eq!(
            self.runtime_errors, runtime_errors,
            "Failed test {} at runtime.",
            self.name,
        );

        let (_, context) = interpreter.into_parts();
        assert_eq!(
            self.output,
            context.into_data(),
            "Failed test {} at print.",
            self.name
        );
    }
}

fn test_engine(input_dir: &Path) -> Result<()> {
    let mut succeeded = true;
    for entry in read_dir(input_dir).context("Failed to open input test data folder")? {
        let entry = entry?;
        let path = entry.path();

        let Some(extension) = path.extension() else {
            continue;
        };

        if extension != "ql" {
            continue;
        }

        println!("Parsing {path:?}");
        let test_case = parse_test_case(&path)?;
        println!("Checking {}", test_case.name);

        let res = std::panic::catch_unwind(|| {
            test_case.check();
        });
        if res.is_err() {
            println!("\tFails test case {}", test_case.name);
            succeeded = false;
        }
    }

    assert!(succeeded, "Some test cases in {input_dir:?} failed.");
    Ok(())
}

fn parse_test_case(input_path: &Path) -> Result<TestCase> {
    let test_name = AsRef::<Path>::as_ref(
        input_path
            .file_name()
            .expect("File name can't be none as the path is to a real file."),
    )
    .to_string_lossy();

    let input = read_to_string(input_path).context("Failed to open input test data file")?;

    let mut expected_outputs = Vec::new();
    let mut expected_syntax_errors = Vec::new();
    let mut expected_runtime_errors = Vec::new();

    for (line_index, line) in input.lines().enumerate() {
        if let Some(comment_index) = line.find("// expect:") {
            let expected = line[comment_index..]
                .strip_prefix("// expect:")
                .unwrap()
                .trim()
                .to_string();
            expected_outputs.push(expected);
        } else if let Some(comment_index) = line.find("// expect runtime error:") {
            let expected = line[comment_index..]
                .strip_prefix("// expect runtime error:")
                .unwrap()
                .trim();
            expected_runtime_errors.push(format!("({}) {expected}", line_index + 1));
        } else if let Some(comment_index) = line.find("// expect syntax error:") {
            let expected = line[comment_index..]
                .strip_prefix("// expect syntax error:")
                .unwrap()
                .trim();
            expected_syntax_errors.push(format!("({}) {expected}", line_index + 1));
        }
    }

    // Every printed line ends with a newline.
    let output = expected_outputs
        .iter()
        .map(|line| format!("{line}\n"))
        .collect::<String>();

    Ok(TestCase {
        name: test_name.into_owned(),
        source: input,
        output,
        syntax_errors: expected_syntax_errors.join("\n"),
        runtime_errors: expected_runtime_errors.join("\n"),
    })
}
