use crate::value::{error::RuntimeError, Value};
use compact_str::CompactString;
use std::collections::HashMap;

/// Variable bindings for a single evaluation session.
///
/// Names are case-sensitive and the last write wins. An environment is never
/// shared between sessions; create a fresh one (or [`Environment::clear`] an
/// existing one) per run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    values: HashMap<CompactString, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_variable(
        &mut self,
        name: impl Into<CompactString>,
        value: impl Into<Value>,
    ) -> Result<(), RuntimeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RuntimeError::InvalidIdentifier(name));
        }
        self.values.insert(name, value.into());
        Ok(())
    }

    /// Builds an environment from `(name, value)` pairs, failing on the first
    /// invalid name.
    pub fn try_from_iter<K, V>(
        iter: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, RuntimeError>
    where
        K: Into<CompactString>,
        V: Into<Value>,
    {
        let mut environment = Self::new();
        for (name, value) in iter {
            environment.set_variable(name, value)?;
        }
        Ok(environment)
    }

    pub fn get_variable(&self, name: &str) -> Result<&Value, RuntimeError> {
        self.values
            .get(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable(name.into()))
    }

    pub fn get_number(&self, name: &str) -> Result<f64, RuntimeError> {
        self.get_variable(name)?.as_number("lookup")
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, RuntimeError> {
        self.get_variable(name)?.as_bool("lookup")
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Bindings sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        let mut entries: Vec<_> = self
            .values
            .iter()
            .map(|(name, value)| (name.as_str(), value))
            .collect();
        entries.sort_by(|(lhs, _), (rhs, _)| lhs.cmp(rhs));
        entries.into_iter()
    }
}
