use crate::value::{error::RuntimeError, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOperator {
    Minus,
}

impl PrefixOperator {
    pub fn get_binding_power(&self) -> u8 {
        match self {
            PrefixOperator::Minus => 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Add),
            "-" => Some(Self::Subtract),
            "*" => Some(Self::Multiply),
            "/" => Some(Self::Divide),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }

    pub fn get_binding_power(&self) -> (u8, u8) {
        match self {
            // 1. Multiplicative operators
            Self::Multiply | Self::Divide => (5, 6),
            // 2. Additive operators
            Self::Add | Self::Subtract => (3, 4),
        }
    }

    pub fn apply(&self, lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
        match self {
            Self::Add => lhs.add(rhs),
            Self::Subtract => lhs.subtract(rhs),
            Self::Multiply => lhs.multiply(rhs),
            Self::Divide => lhs.divide(rhs),
        }
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
