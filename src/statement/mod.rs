use crate::{
    environment::Environment,
    expression::Expression,
    interpreter::SystemContext,
    lexer::Span,
    value::{error::RuntimeError, Value},
};
use compact_str::CompactString;

/// Right-hand side of an assignment or the argument of `print`.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Text(CompactString),
    Expression(Expression),
}

impl Operand {
    pub fn evaluate(&self, environment: &Environment) -> Result<Value, RuntimeError> {
        match self {
            Operand::Text(text) => Ok(Value::Text(text.clone())),
            Operand::Expression(expr) => expr.interpret(environment),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub name: CompactString,
    pub value: Operand,
    pub line: u32,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintStatement {
    pub argument: Operand,
    pub line: u32,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Assignment(Assignment),
    Print(PrintStatement),
}

impl Statement {
    pub fn line(&self) -> u32 {
        match self {
            Statement::Assignment(stmt) => stmt.line,
            Statement::Print(stmt) => stmt.line,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Statement::Assignment(stmt) => stmt.span,
            Statement::Print(stmt) => stmt.span,
        }
    }

    pub fn execute<C: SystemContext>(
        &self,
        environment: &mut Environment,
        context: &mut C,
    ) -> Result<(), RuntimeError> {
        match self {
            Statement::Assignment(stmt) => {
                let value = stmt.value.evaluate(environment)?;
                tracing::debug!(line = stmt.line, name = %stmt.name, %value, "assign");
                environment.set_variable(stmt.name.clone(), value)
            }
            Statement::Print(stmt) => {
                let value = stmt.argument.evaluate(environment)?;
                tracing::debug!(line = stmt.line, %value, "print");
                context.writeln(&format!("{value}"));
                Ok(())
            }
        }
    }
}

/// Statements of a script in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn get_statement(&self, index: usize) -> Option<&Statement> {
        self.statements.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
