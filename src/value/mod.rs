pub mod error;
pub mod formatter;

use compact_str::CompactString;
use error::RuntimeError;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(CompactString),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Text,
    Bool,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number => write!(f, "Number"),
            Self::Text => write!(f, "Text"),
            Self::Bool => write!(f, "Bool"),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<CompactString> for Value {
    fn from(value: CompactString) -> Self {
        Self::Text(value)
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Number(_) => ValueKind::Number,
            Value::Text(_) => ValueKind::Text,
            Value::Bool(_) => ValueKind::Bool,
        }
    }

    pub fn as_number(&self, operation: &'static str) -> Result<f64, RuntimeError> {
        match self {
            Value::Number(v) => Ok(*v),
            v => Err(RuntimeError::TypeMismatch {
                operation,
                expected: ValueKind::Number,
                actual: v.kind(),
            }),
        }
    }

    pub fn as_bool(&self, operation: &'static str) -> Result<bool, RuntimeError> {
        match self {
            Value::Bool(v) => Ok(*v),
            v => Err(RuntimeError::TypeMismatch {
                operation,
                expected: ValueKind::Bool,
                actual: v.kind(),
            }),
        }
    }
}

// Arithmetic
impl Value {
    pub fn add(&self, other: &Value) -> Result<Value, RuntimeError> {
        let lhs = self.as_number("+")?;
        let rhs = other.as_number("+")?;
        Ok(Value::Number(lhs + rhs))
    }

    pub fn subtract(&self, other: &Value) -> Result<Value, RuntimeError> {
        let lhs = self.as_number("-")?;
        let rhs = other.as_number("-")?;
        Ok(Value::Number(lhs - rhs))
    }

    pub fn multiply(&self, other: &Value) -> Result<Value, RuntimeError> {
        let lhs = self.as_number("*")?;
        let rhs = other.as_number("*")?;
        Ok(Value::Number(lhs * rhs))
    }

    pub fn divide(&self, other: &Value) -> Result<Value, RuntimeError> {
        let lhs = self.as_number("/")?;
        let rhs = other.as_number("/")?;
        // Matches both 0.0 and -0.0.
        if rhs == 0.0 {
            return Err(RuntimeError::DivisionByZero);
        }
        Ok(Value::Number(lhs / rhs))
    }

    pub fn negate(&self) -> Result<Value, RuntimeError> {
        Ok(Value::Number(-self.as_number("-")?))
    }
}

