pub mod context;
pub mod error;

use crate::{environment::Environment, statement::Program};
use error::ExecutionError;

/// Output sink for `print` statements.
pub trait SystemContext {
    fn writeln(&mut self, text: &str);
}

impl<C: SystemContext + ?Sized> SystemContext for &mut C {
    fn writeln(&mut self, text: &str) {
        (**self).writeln(text);
    }
}

/// Runs whole programs against an environment it owns.
pub struct TreeWalkInterpreter<C: SystemContext> {
    environment: Environment,
    context: C,
}

impl<C> TreeWalkInterpreter<C>
where
    C: SystemContext,
{
    pub fn new(context: C) -> Self {
        Self::with_environment(Environment::new(), context)
    }

    pub fn with_environment(environment: Environment, context: C) -> Self {
        Self {
            environment,
            context,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Executes the statements in order, stopping at the first failure.
    ///
    /// Effects of the statements before the failing one are kept.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = program.len()))]
    pub fn execute(&mut self, program: &Program) -> Result<(), ExecutionError> {
        for stmt in program.iter() {
            stmt.execute(&mut self.environment, &mut self.context)
                .map_err(|error| ExecutionError {
                    error,
                    line: stmt.line(),
                    span: stmt.span(),
                })?;
        }
        Ok(())
    }

    pub fn run(mut self, program: &Program) -> Result<(Environment, C), ExecutionError> {
        self.execute(program)?;
        Ok(self.into_parts())
    }

    pub fn into_parts(self) -> (Environment, C) {
        (self.environment, self.context)
    }
}
