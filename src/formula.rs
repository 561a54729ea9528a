// Formula closures, the formula set, and the calculator error type

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

use crate::resolver::Resolver;
use crate::value::Value;

/// Calculator errors
#[derive(Error, Debug)]
pub enum CalcError {
    /// A formula path pattern contains more than one `*` segment. Nested
    /// wildcards are ambiguous, so the whole pass is rejected up front
    /// rather than expanded wrongly.
    #[error("formula path '{0}' contains more than one wildcard segment")]
    MultipleWildcards(String),

    /// Raised by a formula body; propagates out of `calculate` unchanged.
    #[error("formula error: {0}")]
    Formula(String),
}

impl CalcError {
    /// Shorthand for failing out of a formula body.
    pub fn formula(message: impl Into<String>) -> Self {
        CalcError::Formula(message.into())
    }
}

/// A derived-field computation.
///
/// Receives the resolver (its accessor to every other raw or derived path)
/// and, for formulas bound by wildcard expansion, the element index.
pub type Formula =
    Box<dyn Fn(&mut Resolver<'_>, Option<usize>) -> Result<Value, CalcError> + Send + Sync>;

/// An ordered mapping from path pattern to formula.
///
/// Patterns are dotted paths that may contain one `*` segment; iteration
/// order is insertion order, which fixes the order formula results are
/// assembled in (resolution order does not matter thanks to memoization).
#[derive(Default)]
pub struct FormulaSet {
    entries: IndexMap<String, Formula>,
}

impl FormulaSet {
    pub fn new() -> Self {
        FormulaSet {
            entries: IndexMap::new(),
        }
    }

    /// Register a formula that ignores the wildcard index.
    pub fn insert<F>(&mut self, pattern: impl Into<String>, formula: F) -> &mut Self
    where
        F: Fn(&mut Resolver<'_>) -> Result<Value, CalcError> + Send + Sync + 'static,
    {
        self.entries
            .insert(pattern.into(), Box::new(move |resolver, _| formula(resolver)));
        self
    }

    /// Register a formula that also receives the element index bound during
    /// wildcard expansion (`None` for non-wildcard patterns).
    pub fn insert_indexed<F>(&mut self, pattern: impl Into<String>, formula: F) -> &mut Self
    where
        F: Fn(&mut Resolver<'_>, Option<usize>) -> Result<Value, CalcError> + Send + Sync + 'static,
    {
        self.entries.insert(pattern.into(), Box::new(formula));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered patterns, in insertion order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &Formula)> {
        self.entries.iter()
    }
}

impl fmt::Debug for FormulaSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_order_is_kept() {
        let mut formulas = FormulaSet::new();
        formulas.insert("b", |_| Ok(Value::from(1)));
        formulas.insert("a", |_| Ok(Value::from(2)));
        formulas.insert_indexed("c.*", |_, i| Ok(Value::from(i.unwrap_or(0))));

        let patterns: Vec<&str> = formulas.patterns().collect();
        assert_eq!(patterns, vec!["b", "a", "c.*"]);
        assert_eq!(formulas.len(), 3);
    }

    #[test]
    fn test_reinsert_replaces() {
        let mut formulas = FormulaSet::new();
        formulas.insert("x", |_| Ok(Value::from(1)));
        formulas.insert("x", |_| Ok(Value::from(2)));
        assert_eq!(formulas.len(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = CalcError::MultipleWildcards("a.*.b.*".to_string());
        assert_eq!(
            err.to_string(),
            "formula path 'a.*.b.*' contains more than one wildcard segment"
        );
        let err = CalcError::formula("division by zero");
        assert_eq!(err.to_string(), "formula error: division by zero");
    }
}
