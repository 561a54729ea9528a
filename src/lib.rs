// fieldcalc - Dependency-resolving derived-field calculator for JSON-like records
// Copyright (c) 2026 fieldcalc contributors
// Licensed under the MIT License

//! # fieldcalc
//!
//! Computes derived fields ("formulas") over an arbitrary nested record,
//! producing an augmented copy of that record. Formulas are keyed by a
//! dotted field path and may read any other field, raw or itself
//! formula-derived, through an accessor with lazy, memoized resolution;
//! a `*` segment in a formula key binds one formula per element of the
//! list at that position.
//!
//! ## Architecture
//!
//! - `value` - The recursive `Value` union records and results are made of
//! - `path` - Dotted-path parsing and nested get/set over `Value` trees
//! - `formula` - Formula closures, `FormulaSet`, and the error type
//! - `expand` - Wildcard pattern expansion into per-element bindings
//! - `resolver` - The lazy, memoized path accessor formulas read through
//! - `merge` - Deep merge of the derived result tree over the input
//!
//! Build a [`FormulaSet`] once, wrap it in a [`Calculator`], and call
//! [`Calculator::calculate`] for every record. Each call runs an
//! independent pass with its own cache, so one calculator can be shared
//! across threads.
//!
//! ## Example
//!
//! ```
//! use fieldcalc::{value, CalcError, Calculator, FormulaSet, Value};
//!
//! let mut formulas = FormulaSet::new();
//! formulas.insert("total", |r| {
//!     Ok(Value::from(r.get_number("price")? * r.get_number("quantity")?))
//! });
//! formulas.insert("total_with_tax", |r| {
//!     Ok(Value::from(r.get_number("total")? * 1.2))
//! });
//!
//! let calc = Calculator::new(formulas);
//! let result = calc.calculate(&value!({"price": 2.5, "quantity": 4}))?;
//!
//! assert_eq!(result.get("total"), Some(&Value::from(10.0)));
//! assert_eq!(result.get("total_with_tax"), Some(&Value::from(12.0)));
//! # Ok::<(), CalcError>(())
//! ```

pub mod value;

pub mod formula;
pub mod merge;
pub mod path;
pub mod resolver;

mod expand;

pub use formula::{CalcError, Formula, FormulaSet};
pub use resolver::Resolver;
pub use value::Value;

/// Options applied to every pass of a [`Calculator`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CalculatorOptions {
    /// Coerce empty-like resolved values (NaN, null, missing, empty
    /// string) to `0`.
    pub force_zeros: bool,
}

/// A reusable formula configuration: the formula set plus options, fixed
/// at construction.
///
/// `calculate` never mutates the calculator or its input, and all per-pass
/// state (expanded bindings, resolution cache) is local to the call.
pub struct Calculator {
    formulas: FormulaSet,
    options: CalculatorOptions,
}

impl Calculator {
    /// Calculator with default options.
    pub fn new(formulas: FormulaSet) -> Self {
        Self::with_options(formulas, CalculatorOptions::default())
    }

    /// Calculator with explicit options. No validation is performed on the
    /// formula set beyond accepting it.
    pub fn with_options(formulas: FormulaSet, options: CalculatorOptions) -> Self {
        Calculator { formulas, options }
    }

    /// Run one evaluation pass over `item`, returning a new record with
    /// every formula path filled in and everything else passed through
    /// unchanged.
    ///
    /// Wildcard patterns are first expanded against `item`'s current list
    /// lengths; each expanded path is then resolved through a fresh
    /// [`Resolver`], written into a result tree, and the result tree is
    /// deep-merged over `item`.
    ///
    /// # Errors
    ///
    /// Fails if a pattern contains more than one wildcard segment, or if
    /// any formula body returns an error; formula errors propagate as-is
    /// with no partial result.
    pub fn calculate(&self, item: &Value) -> Result<Value, CalcError> {
        let expanded = expand::expand(&self.formulas, item)?;
        if expanded.is_empty() {
            return Ok(item.clone());
        }

        let mut resolver = Resolver::new(item, &expanded, self.options.force_zeros);
        let mut derived = Value::empty_object();
        for concrete_path in expanded.keys() {
            let resolved = resolver.get(concrete_path)?;
            path::set_path(&mut derived, concrete_path, resolved);
        }

        Ok(merge::deep_merge(item, &derived))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_formulas_is_identity() {
        let calc = Calculator::new(FormulaSet::new());
        let item = value!({"aaa": "aaa", "list": [1, {"b": 2}], "n": null});
        assert_eq!(calc.calculate(&item).unwrap(), item);
    }

    #[test]
    fn test_identity_holds_for_non_object_roots() {
        let calc = Calculator::new(FormulaSet::new());
        for item in [
            value!([1, 2, 3]),
            value!(42),
            value!("text"),
            value!(null),
        ] {
            assert_eq!(calc.calculate(&item).unwrap(), item);
        }
    }

    #[test]
    fn test_constant_formulas() {
        let mut formulas = FormulaSet::new();
        formulas.insert("x", |_| Ok(value!(42)));
        formulas.insert("y", |_| Ok(value!("foo")));

        let calc = Calculator::new(formulas);
        let result = calc.calculate(&value!({"aaa": "aaa"})).unwrap();
        assert_eq!(result, value!({"aaa": "aaa", "x": 42, "y": "foo"}));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let mut formulas = FormulaSet::new();
        formulas.insert("obj.x", |_| Ok(value!(1)));

        let item = value!({"obj": {"y": 2}});
        let snapshot = item.clone();
        let calc = Calculator::new(formulas);
        let result = calc.calculate(&item).unwrap();

        assert_eq!(item, snapshot);
        assert_eq!(result, value!({"obj": {"y": 2, "x": 1}}));
    }

    #[test]
    fn test_multiple_wildcards_error_surfaces() {
        let mut formulas = FormulaSet::new();
        formulas.insert("a.*.b.*", |_| Ok(value!(0)));

        let calc = Calculator::new(formulas);
        let err = calc.calculate(&value!({"a": [1]})).unwrap_err();
        assert!(matches!(err, CalcError::MultipleWildcards(_)));
    }

    #[test]
    fn test_calculator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Calculator>();
    }
}
