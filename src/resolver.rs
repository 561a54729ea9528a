// Lazy, memoized path resolution for one evaluation pass

use std::collections::HashMap;

use crate::expand::ExpandedFormulas;
use crate::formula::CalcError;
use crate::path;
use crate::value::Value;

/// The accessor handed to formulas: resolves any path on demand, memoizing
/// per evaluation pass.
///
/// A path covered by a formula is computed by invoking that formula with
/// this resolver, so formulas can reference other derived values to any
/// depth without caring about resolution order; anything else is a raw read
/// against the input record. Each path is resolved at most once per pass.
/// The cache lives exactly as long as the resolver, which is created fresh
/// for every `calculate` call.
///
/// There is no cycle detection: a formula graph that (transitively) reads
/// its own path recurses until the stack runs out.
pub struct Resolver<'a> {
    item: &'a Value,
    formulas: &'a ExpandedFormulas<'a>,
    cache: HashMap<String, Value>,
    force_zeros: bool,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(
        item: &'a Value,
        formulas: &'a ExpandedFormulas<'a>,
        force_zeros: bool,
    ) -> Self {
        Resolver {
            item,
            formulas,
            cache: HashMap::new(),
            force_zeros,
        }
    }

    /// Resolve `path` to its value for this pass.
    ///
    /// Cache hits return the already-resolved value; otherwise the path's
    /// formula runs (with this resolver as its accessor) or, if no formula
    /// covers the path, the input record is read directly. Missing paths
    /// yield `Undefined`. When zero-coercion is on, empty-like results
    /// (NaN, null, missing, empty string) are replaced with `0` before
    /// being cached, so every later reader sees the coerced value too.
    pub fn get(&mut self, path: &str) -> Result<Value, CalcError> {
        if let Some(hit) = self.cache.get(path) {
            return Ok(hit.clone());
        }
        let formulas = self.formulas;
        let raw = match formulas.get(path) {
            Some(bound) => (bound.formula)(self, bound.index)?,
            None => path::get_path(self.item, path),
        };
        let resolved = if self.force_zeros && raw.is_empty_like() {
            Value::Number(0.0)
        } else {
            raw
        };
        self.cache.insert(path.to_string(), resolved.clone());
        Ok(resolved)
    }

    /// Numeric read: the value at `path` as an f64, or NaN when it is not
    /// a number. Convenient for arithmetic formulas, where NaN then flows
    /// through like JavaScript arithmetic on undefined would.
    pub fn get_number(&mut self, path: &str) -> Result<f64, CalcError> {
        Ok(self.get(path)?.as_f64().unwrap_or(f64::NAN))
    }
}
