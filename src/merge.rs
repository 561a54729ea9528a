// Recursive structural merge of two Value trees

use std::sync::Arc;

use crate::value::Value;

/// Deep-merge `overlay` over `base`, returning a new tree.
///
/// Objects merge key by key and arrays index by index, so an overlay that
/// covers only part of a container keeps the base's remaining entries. Any
/// type mismatch resolves to the overlay's value. An `Undefined` overlay
/// node carries no value and leaves the base untouched, except where the
/// base has nothing at that position either.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (_, Value::Undefined) => base.clone(),
        (Value::Object(b), Value::Object(o)) => {
            let mut merged = (**b).clone();
            for (key, over) in o.iter() {
                let next = match merged.get(key) {
                    Some(under) => deep_merge(under, over),
                    None => over.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(Arc::new(merged))
        }
        (Value::Array(b), Value::Array(o)) => {
            let len = b.len().max(o.len());
            let mut merged = Vec::with_capacity(len);
            for i in 0..len {
                let next = match (b.get(i), o.get(i)) {
                    (Some(under), Some(over)) => deep_merge(under, over),
                    (Some(under), None) => under.clone(),
                    (None, Some(over)) => over.clone(),
                    (None, None) => break,
                };
                merged.push(next);
            }
            Value::array(merged)
        }
        _ => overlay.clone(),
    }
}
