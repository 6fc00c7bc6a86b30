pub mod environment;
pub mod expression;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod statement;
pub mod value;

pub use environment::Environment;
pub use expression::{boolean::BooleanExpression, BinaryOperator, Expression};
pub use parser::{parse_postfix, parse_script};
pub use value::Value;
