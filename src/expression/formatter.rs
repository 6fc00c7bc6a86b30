use super::{boolean::BooleanExpression, Expression};

pub trait ExpressionFormatter {
    fn format(&self, expression: &Expression) -> String;
    fn format_boolean(&self, expression: &BooleanExpression) -> String;
}

pub struct DebugFormatter;

impl ExpressionFormatter for DebugFormatter {
    fn format(&self, expression: &Expression) -> String {
        format!("{expression:?}")
    }

    fn format_boolean(&self, expression: &BooleanExpression) -> String {
        format!("{expression:?}")
    }
}

/// Renders trees as prefix S-expressions, e.g. `(* (+ x y) 3.0)`.
pub struct SExpressionFormatter;

/// Output pieces still to be written, innermost last.
enum Piece<'a, T> {
    Node(&'a T),
    Text(&'static str),
}

impl SExpressionFormatter {
    fn format_node(expression: &Expression) -> String {
        let mut buffer = String::new();
        let mut pending = vec![Piece::Node(expression)];
        while let Some(piece) = pending.pop() {
            match piece {
                Piece::Text(text) => buffer.push_str(text),
                Piece::Node(Expression::Number(value)) => buffer.push_str(&format!("{value:?}")),
                Piece::Node(Expression::Variable(name)) => buffer.push_str(name),
                Piece::Node(Expression::Negate(inner)) => {
                    buffer.push_str("(- ");
                    pending.push(Piece::Text(")"));
                    pending.push(Piece::Node(&**inner));
                }
                Piece::Node(Expression::Binary { operator, lhs, rhs }) => {
                    buffer.push('(');
                    buffer.push_str(operator.symbol());
                    buffer.push(' ');
                    pending.push(Piece::Text(")"));
                    pending.push(Piece::Node(&**rhs));
                    pending.push(Piece::Text(" "));
                    pending.push(Piece::Node(&**lhs));
                }
            }
        }
        buffer
    }

    fn format_boolean_node(expression: &BooleanExpression) -> String {
        let mut buffer = String::new();
        let mut pending = vec![Piece::Node(expression)];
        while let Some(piece) = pending.pop() {
            match piece {
                Piece::Text(text) => buffer.push_str(text),
                Piece::Node(BooleanExpression::Constant(value)) => {
                    buffer.push_str(if *value { "true" } else { "false" })
                }
                Piece::Node(BooleanExpression::Variable(name)) => buffer.push_str(name),
                Piece::Node(BooleanExpression::Not(inner)) => {
                    buffer.push_str("(not ");
                    pending.push(Piece::Text(")"));
                    pending.push(Piece::Node(&**inner));
                }
                Piece::Node(BooleanExpression::And(lhs, rhs)) => {
                    buffer.push_str("(and ");
                    pending.push(Piece::Text(")"));
                    pending.push(Piece::Node(&**rhs));
                    pending.push(Piece::Text(" "));
                    pending.push(Piece::Node(&**lhs));
                }
                Piece::Node(BooleanExpression::Or(lhs, rhs)) => {
                    buffer.push_str("(or ");
                    pending.push(Piece::Text(")"));
                    pending.push(Piece::Node(&**rhs));
                    pending.push(Piece::Text(" "));
                    pending.push(Piece::Node(&**lhs));
                }
            }
        }
        buffer
    }
}

impl ExpressionFormatter for SExpressionFormatter {
    fn format(&self, expression: &Expression) -> String {
        Self::format_node(expression)
    }

    fn format_boolean(&self, expression: &BooleanExpression) -> String {
        Self::format_boolean_node(expression)
    }
}
