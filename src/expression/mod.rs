pub mod boolean;
pub mod formatter;
mod operator;

use crate::{
    environment::Environment,
    value::{error::RuntimeError, Value},
};
use compact_str::CompactString;
pub use operator::{BinaryOperator, PrefixOperator};

const STACK_INVARIANT_MSG: &str = "Operands are always pushed before the node that consumes them.";

/// Arithmetic expression tree.
///
/// Every node owns its children, so a parsed expression is a plain tree with
/// no sharing. Evaluation is eager: both sides of a binary node are always
/// interpreted, left first.
///
/// Trees can be arbitrarily deep (a long postfix chain is one level per
/// operator), so evaluation, traversal and drop all walk the tree with an
/// explicit stack instead of recursion.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(f64),
    Variable(CompactString),
    Negate(Box<Expression>),
    Binary {
        operator: BinaryOperator,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
}

/// Pending work for the evaluation loop.
enum Step<'a> {
    Visit(&'a Expression),
    Negate,
    Apply(BinaryOperator),
}

impl Expression {
    pub fn number(value: f64) -> Self {
        Self::Number(value)
    }

    pub fn variable(name: impl Into<CompactString>) -> Self {
        Self::Variable(name.into())
    }

    pub fn negate(inner: Expression) -> Self {
        Self::Negate(Box::new(inner))
    }

    pub fn binary(operator: BinaryOperator, lhs: Expression, rhs: Expression) -> Self {
        Self::Binary {
            operator,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    fn is_leaf(&self) -> bool {
        matches!(self, Expression::Number(_) | Expression::Variable(_))
    }

    pub fn interpret(&self, environment: &Environment) -> Result<Value, RuntimeError> {
        let mut steps = vec![Step::Visit(self)];
        let mut values: Vec<Value> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(Expression::Number(value)) => values.push(Value::Number(*value)),
                Step::Visit(Expression::Variable(name)) => {
                    values.push(environment.get_variable(name)?.clone());
                }
                Step::Visit(Expression::Negate(inner)) => {
                    steps.push(Step::Negate);
                    steps.push(Step::Visit(inner));
                }
                Step::Visit(Expression::Binary { operator, lhs, rhs }) => {
                    // Popped in reverse: lhs, then rhs, then the operator.
                    steps.push(Step::Apply(*operator));
                    steps.push(Step::Visit(rhs));
                    steps.push(Step::Visit(lhs));
                }
                Step::Negate => {
                    let operand = values.pop().expect(STACK_INVARIANT_MSG);
                    values.push(operand.negate()?);
                }
                Step::Apply(operator) => {
                    let rhs = values.pop().expect(STACK_INVARIANT_MSG);
                    let lhs = values.pop().expect(STACK_INVARIANT_MSG);
                    values.push(operator.apply(&lhs, &rhs)?);
                }
            }
        }

        Ok(values.pop().expect(STACK_INVARIANT_MSG))
    }

    /// Number of binary operator nodes in the tree.
    pub fn operator_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                Expression::Number(_) | Expression::Variable(_) => {}
                Expression::Negate(inner) => pending.push(inner),
                Expression::Binary { lhs, rhs, .. } => {
                    count += 1;
                    pending.push(rhs);
                    pending.push(lhs);
                }
            }
        }
        count
    }

    /// Distinct variable names in order of first appearance.
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                Expression::Number(_) => {}
                Expression::Variable(name) => {
                    if !names.contains(&name.as_str()) {
                        names.push(name.as_str());
                    }
                }
                Expression::Negate(inner) => pending.push(inner),
                Expression::Binary { lhs, rhs, .. } => {
                    pending.push(rhs);
                    pending.push(lhs);
                }
            }
        }
        names
    }

    /// Moves the non-leaf children of this node into `pending`.
    fn detach_children(&mut self, pending: &mut Vec<Box<Expression>>) {
        let mut detach = |child: &mut Box<Expression>| {
            if !child.is_leaf() {
                pending.push(std::mem::replace(child, Box::new(Expression::Number(0.0))));
            }
        };
        match self {
            Expression::Number(_) | Expression::Variable(_) => {}
            Expression::Negate(inner) => detach(inner),
            Expression::Binary { lhs, rhs, .. } => {
                detach(lhs);
                detach(rhs);
            }
        }
    }
}

impl Drop for Expression {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}
