// Wildcard pattern expansion against a snapshot of the input's list lengths

use indexmap::IndexMap;

use crate::formula::{CalcError, Formula, FormulaSet};
use crate::path::{self, WILDCARD};
use crate::value::Value;

/// A formula bound to one concrete path, with the element index fixed when
/// the binding came from a wildcard pattern.
pub(crate) struct Bound<'f> {
    pub formula: &'f Formula,
    pub index: Option<usize>,
}

/// Mapping from concrete (wildcard-free) path to its bound formula.
pub(crate) type ExpandedFormulas<'f> = IndexMap<String, Bound<'f>>;

/// Expand every pattern in `formulas` into concrete per-path bindings.
///
/// A pattern without a wildcard copies through unchanged. A pattern with one
/// wildcard splits into the list path before the `*` and the field path after
/// it, and emits one binding per element of the array currently at the list
/// path in `item`; an absent or non-array value there means zero bindings.
/// List lengths are read here, once, so formulas that later write into the
/// same list cannot change how many bindings exist.
pub(crate) fn expand<'f>(
    formulas: &'f FormulaSet,
    item: &Value,
) -> Result<ExpandedFormulas<'f>, CalcError> {
    let mut expanded = IndexMap::new();
    for (pattern, formula) in formulas.iter() {
        let segments: Vec<&str> = pattern.split('.').collect();
        match segments.iter().position(|s| *s == WILDCARD) {
            None => {
                expanded.insert(pattern.clone(), Bound { formula, index: None });
            }
            Some(pos) => {
                if segments[pos + 1..].iter().any(|s| *s == WILDCARD) {
                    return Err(CalcError::MultipleWildcards(pattern.clone()));
                }
                let list_path = segments[..pos].join(".");
                let field_path = segments[pos + 1..].join(".");
                let len = path::get_path(item, &list_path)
                    .as_array()
                    .map_or(0, Vec::len);
                for i in 0..len {
                    let concrete = if field_path.is_empty() {
                        format!("{}.{}", list_path, i)
                    } else {
                        format!("{}.{}.{}", list_path, i, field_path)
                    };
                    expanded.insert(concrete, Bound { formula, index: Some(i) });
                }
            }
        }
    }
    Ok(expanded)
}
