use crate::{environment::Environment, value::error::RuntimeError};
use compact_str::CompactString;

const STACK_INVARIANT_MSG: &str = "Operands are always pushed before the node that consumes them.";

/// Boolean logic tree, composed in code rather than parsed.
///
/// `And` and `Or` do not short-circuit: both operands are interpreted, left
/// first, so an undefined variable on the right is always reported. Like
/// [`super::Expression`], evaluation and drop use an explicit stack.
#[derive(Debug, Clone, PartialEq)]
pub enum BooleanExpression {
    Constant(bool),
    Variable(CompactString),
    Not(Box<BooleanExpression>),
    And(Box<BooleanExpression>, Box<BooleanExpression>),
    Or(Box<BooleanExpression>, Box<BooleanExpression>),
}

enum Step<'a> {
    Visit(&'a BooleanExpression),
    Not,
    And,
    Or,
}

impl BooleanExpression {
    pub fn constant(value: bool) -> Self {
        Self::Constant(value)
    }

    pub fn variable(name: impl Into<CompactString>) -> Self {
        Self::Variable(name.into())
    }

    pub fn and(lhs: BooleanExpression, rhs: BooleanExpression) -> Self {
        Self::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: BooleanExpression, rhs: BooleanExpression) -> Self {
        Self::Or(Box::new(lhs), Box::new(rhs))
    }

    pub fn negate(inner: BooleanExpression) -> Self {
        Self::Not(Box::new(inner))
    }

    fn is_leaf(&self) -> bool {
        matches!(self, Self::Constant(_) | Self::Variable(_))
    }

    pub fn interpret(&self, environment: &Environment) -> Result<bool, RuntimeError> {
        let mut steps = vec![Step::Visit(self)];
        let mut values: Vec<bool> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(BooleanExpression::Constant(value)) => values.push(*value),
                Step::Visit(BooleanExpression::Variable(name)) => {
                    values.push(environment.get_bool(name)?);
                }
                Step::Visit(BooleanExpression::Not(inner)) => {
                    steps.push(Step::Not);
                    steps.push(Step::Visit(inner));
                }
                Step::Visit(BooleanExpression::And(lhs, rhs)) => {
                    steps.push(Step::And);
                    steps.push(Step::Visit(rhs));
                    steps.push(Step::Visit(lhs));
                }
                Step::Visit(BooleanExpression::Or(lhs, rhs)) => {
                    steps.push(Step::Or);
                    steps.push(Step::Visit(rhs));
                    steps.push(Step::Visit(lhs));
                }
                Step::Not => {
                    let operand = values.pop().expect(STACK_INVARIANT_MSG);
                    values.push(!operand);
                }
                Step::And | Step::Or => {
                    let rhs = values.pop().expect(STACK_INVARIANT_MSG);
                    let lhs = values.pop().expect(STACK_INVARIANT_MSG);
                    values.push(if matches!(step, Step::And) {
                        lhs && rhs
                    } else {
                        lhs || rhs
                    });
                }
            }
        }

        Ok(values.pop().expect(STACK_INVARIANT_MSG))
    }

    fn detach_children(&mut self, pending: &mut Vec<Box<BooleanExpression>>) {
        let mut detach = |child: &mut Box<BooleanExpression>| {
            if !child.is_leaf() {
                pending.push(std::mem::replace(
                    child,
                    Box::new(BooleanExpression::Constant(false)),
                ));
            }
        };
        match self {
            Self::Constant(_) | Self::Variable(_) => {}
            Self::Not(inner) => detach(inner),
            Self::And(lhs, rhs) | Self::Or(lhs, rhs) => {
                detach(lhs);
                detach(rhs);
            }
        }
    }
}

impl Drop for BooleanExpression {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}

impl std::ops::BitAnd for BooleanExpression {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::and(self, rhs)
    }
}

impl std::ops::BitOr for BooleanExpression {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::or(self, rhs)
    }
}

impl std::ops::Not for BooleanExpression {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::negate(self)
    }
}
