// Value: Arc-wrapped JSON-like value type for O(1) cloning
// Records, intermediate results and formula outputs all use this type

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A JSON-like value with O(1) clone semantics via Arc-wrapping.
///
/// Container types (Array, Object, String) are wrapped in Arc so that a
/// resolver cache hit hands out a clone without copying the payload.
/// `Undefined` is a first-class variant rather than a tagged marker object:
/// it is what a nested read yields when any path segment is absent, and it
/// is distinct from an explicit `Null`. Numbers are `f64`, so NaN is
/// representable (serde_json's `Number` cannot hold it).
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Undefined,
    Bool(bool),
    Number(f64),
    String(Arc<str>),
    Array(Arc<Vec<Value>>),
    Object(Arc<IndexMap<String, Value>>),
}

// ── Type checks ──────────────────────────────────────────────────────────────

impl Value {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    #[inline]
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// The "empty-like" predicate behind zero-coercion: `Undefined`, `Null`,
    /// the empty string, and NaN-valued numbers all count as empty.
    pub fn is_empty_like(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Number(n) => n.is_nan(),
            _ => false,
        }
    }
}

// ── Extraction ───────────────────────────────────────────────────────────────

impl Value {
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => {
                let f = *n;
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                    Some(f as i64)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Get a mutable reference to the inner Vec, cloning if shared (Arc::make_mut).
    #[inline]
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(arr) => Some(Arc::make_mut(arr)),
            _ => None,
        }
    }

    /// Get a mutable reference to the inner IndexMap, cloning if shared (Arc::make_mut).
    #[inline]
    pub fn as_object_mut(&mut self) -> Option<&mut IndexMap<String, Value>> {
        match self {
            Value::Object(map) => Some(Arc::make_mut(map)),
            _ => None,
        }
    }

    /// Index into an object by key.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Index into an array by position.
    #[inline]
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Array(arr) => arr.get(index),
            _ => None,
        }
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

impl Value {
    #[inline]
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::String(s.into())
    }

    #[inline]
    pub fn array(v: Vec<Value>) -> Self {
        Value::Array(Arc::new(v))
    }

    #[inline]
    pub fn object(m: IndexMap<String, Value>) -> Self {
        Value::Object(Arc::new(m))
    }

    /// Empty object, the usual seed for a result tree.
    #[inline]
    pub fn empty_object() -> Self {
        Value::Object(Arc::new(IndexMap::new()))
    }
}

// ── From impls ───────────────────────────────────────────────────────────────

impl From<bool> for Value {
    #[inline]
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    #[inline]
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u64> for Value {
    #[inline]
    fn from(n: u64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    #[inline]
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(s: String) -> Self {
        Value::String(s.into())
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(v: Vec<Value>) -> Self {
        Value::Array(Arc::new(v))
    }
}

impl From<IndexMap<String, Value>> for Value {
    #[inline]
    fn from(m: IndexMap<String, Value>) -> Self {
        Value::Object(Arc::new(m))
    }
}

// ── PartialEq ────────────────────────────────────────────────────────────────

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Undefined, Value::Undefined) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => {
                // NaN != NaN
                if a.is_nan() && b.is_nan() {
                    return false;
                }
                a == b
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

// ── Display ──────────────────────────────────────────────────────────────────

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Undefined => write!(f, "undefined"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => format_number(*n, f),
            Value::String(s) => write!(f, "\"{}\"", escape_json_string(s)),
            Value::Array(arr) => {
                write!(f, "[")?;
                for (i, v) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Value::Object(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "\"{}\":{}", escape_json_string(k), v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

fn escape_json_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c < '\x20' => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result
}

fn format_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if !n.is_finite() {
        // NaN and +/-Infinity print as null (matching JSON)
        write!(f, "null")
    } else if n.fract() == 0.0 && n.abs() < 1e20 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

// ── Serialization ────────────────────────────────────────────────────────────

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Undefined => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => {
                if n.is_nan() || n.is_infinite() {
                    serializer.serialize_none()
                } else if n.fract() == 0.0 && *n >= i64::MIN as f64 && *n <= i64::MAX as f64 {
                    serializer.serialize_i64(*n as i64)
                } else {
                    serializer.serialize_f64(*n)
                }
            }
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for v in arr.iter() {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut m = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    m.serialize_entry(k, v)?;
                }
                m.end()
            }
        }
    }
}

// ── Deserialization (single-pass JSON→Value) ─────────────────────────────────

impl<'de> serde::Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "any valid JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::string(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v.into()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut vec = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(elem) = seq.next_element()? {
            vec.push(elem);
        }
        Ok(Value::array(vec))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut m = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((k, v)) = map.next_entry()? {
            m.insert(k, v);
        }
        Ok(Value::object(m))
    }
}

// ── JSON string I/O ──────────────────────────────────────────────────────────

impl Value {
    /// Serialize to a JSON string. `Undefined` and non-finite numbers
    /// serialize as `null`.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to a pretty-printed JSON string.
    pub fn to_json_string_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a JSON string into a Value (single-pass, no intermediate
    /// serde_json::Value).
    pub fn from_json_str(s: &str) -> Result<Value, serde_json::Error> {
        serde_json::from_str(s)
    }
}

// ── Conversion from/to serde_json::Value ─────────────────────────────────────

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::String(s.into()),
            serde_json::Value::Array(arr) => {
                Value::Array(Arc::new(arr.into_iter().map(Value::from).collect()))
            }
            serde_json::Value::Object(map) => {
                let m: IndexMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, Value::from(v))).collect();
                Value::Object(Arc::new(m))
            }
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null | Value::Undefined => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => {
                if n.is_nan() || n.is_infinite() {
                    serde_json::Value::Null
                } else {
                    serde_json::json!(*n)
                }
            }
            Value::String(s) => serde_json::Value::String(s.to_string()),
            Value::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(serde_json::Value::from).collect())
            }
            Value::Object(map) => {
                let m: serde_json::Map<String, serde_json::Value> = map
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect();
                serde_json::Value::Object(m)
            }
        }
    }
}

// ── value! macro ─────────────────────────────────────────────────────────────

/// Macro for constructing Value literals, similar to serde_json::json!
///
/// Usage:
///   value!(null)           → Value::Null
///   value!(true)           → Value::Bool(true)
///   value!(42)             → Value::Number(42.0)
///   value!(-3.14)          → Value::Number(-3.14)
///   value!("hello")        → Value::String(Arc::from("hello"))
///   value!([1, -2, 3])     → Value::Array(Arc::new(vec![...]))
///   value!({"k": v, ...})  → Value::Object(Arc::new(IndexMap from pairs))
///   value!(expr)           → Value::from(expr)
///
/// Arrays and objects are consumed token by token so that negative number
/// literals (two tokens each) work in element and value positions.
#[macro_export]
macro_rules! value {
    // null
    (null) => {
        $crate::value::Value::Null
    };

    // true
    (true) => {
        $crate::value::Value::Bool(true)
    };

    // false
    (false) => {
        $crate::value::Value::Bool(false)
    };

    // Negative number
    (- $n:literal) => {
        $crate::value::Value::from(-$n)
    };

    // Array
    ([ $($tt:tt)* ]) => {
        $crate::value!(@array [] $($tt)*)
    };

    // Object
    ({ $($tt:tt)* }) => {
        $crate::value!(@object () $($tt)*)
    };

    // Array muncher: done
    (@array [ $($elems:expr),* ]) => {
        $crate::value::Value::Array(std::sync::Arc::new(vec![ $($elems),* ]))
    };

    // Array muncher: comma between elements (and trailing comma)
    (@array [ $($elems:expr),* ] , $($rest:tt)*) => {
        $crate::value!(@array [ $($elems),* ] $($rest)*)
    };

    // Array muncher: negative number element
    (@array [ $($elems:expr),* ] - $n:literal $($rest:tt)*) => {
        $crate::value!(@array [ $($elems,)* $crate::value!(- $n) ] $($rest)*)
    };

    // Array muncher: any single-token element
    (@array [ $($elems:expr),* ] $elem:tt $($rest:tt)*) => {
        $crate::value!(@array [ $($elems,)* $crate::value!($elem) ] $($rest)*)
    };

    // Object muncher: done
    (@object ( $($pairs:expr),* )) => {
        {
            #[allow(unused_mut)]
            let mut map = indexmap::IndexMap::new();
            $(
                {
                    let (key, val) = $pairs;
                    map.insert(key, val);
                }
            )*
            $crate::value::Value::Object(std::sync::Arc::new(map))
        }
    };

    // Object muncher: comma between entries (and trailing comma)
    (@object ( $($pairs:expr),* ) , $($rest:tt)*) => {
        $crate::value!(@object ( $($pairs),* ) $($rest)*)
    };

    // Object muncher: entry with a negative number value
    (@object ( $($pairs:expr),* ) $key:tt : - $n:literal $($rest:tt)*) => {
        $crate::value!(@object ( $($pairs,)* (($key).to_string(), $crate::value!(- $n)) ) $($rest)*)
    };

    // Object muncher: entry with a single-token value
    (@object ( $($pairs:expr),* ) $key:tt : $val:tt $($rest:tt)*) => {
        $crate::value!(@object ( $($pairs,)* (($key).to_string(), $crate::value!($val)) ) $($rest)*)
    };

    // Expression (fallback — numbers, variables, function calls, etc.)
    ($other:expr) => {
        $crate::value::Value::from($other)
    };
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_is_cheap() {
        // Array clone should be O(1) — same Arc pointer
        let arr = Value::array(vec![
            Value::from(1i64),
            Value::from(2i64),
            Value::from(3i64),
        ]);
        let arr2 = arr.clone();
        if let (Value::Array(a), Value::Array(b)) = (&arr, &arr2) {
            assert!(Arc::ptr_eq(a, b));
        } else {
            panic!("expected arrays");
        }

        // Object clone should be O(1)
        let mut map = IndexMap::new();
        map.insert("x".to_string(), Value::from(1i64));
        let obj = Value::object(map);
        let obj2 = obj.clone();
        if let (Value::Object(a), Value::Object(b)) = (&obj, &obj2) {
            assert!(Arc::ptr_eq(a, b));
        } else {
            panic!("expected objects");
        }
    }

    #[test]
    fn test_type_checks() {
        assert!(Value::Null.is_null());
        assert!(Value::Undefined.is_undefined());
        assert!(Value::Bool(true).is_bool());
        assert!(Value::Number(42.0).is_number());
        assert!(Value::string("hello").is_string());
        assert!(Value::array(vec![]).is_array());
        assert!(Value::object(IndexMap::new()).is_object());
    }

    #[test]
    fn test_empty_like() {
        assert!(Value::Undefined.is_empty_like());
        assert!(Value::Null.is_empty_like());
        assert!(Value::string("").is_empty_like());
        assert!(Value::Number(f64::NAN).is_empty_like());

        assert!(!Value::Number(0.0).is_empty_like());
        assert!(!Value::Bool(false).is_empty_like());
        assert!(!Value::string("x").is_empty_like());
        assert!(!Value::array(vec![]).is_empty_like());
        assert!(!Value::object(IndexMap::new()).is_empty_like());
    }

    #[test]
    fn test_extraction() {
        assert_eq!(Value::Number(42.0).as_f64(), Some(42.0));
        assert_eq!(Value::Number(42.0).as_i64(), Some(42));
        assert_eq!(Value::Number(42.5).as_i64(), None);
        assert_eq!(Value::string("hello").as_str(), Some("hello"));
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(
            Value::array(vec![Value::from(1i64)])
                .as_array()
                .map(|a| a.len()),
            Some(1)
        );
    }

    #[test]
    fn test_value_macro() {
        let n = value!(null);
        assert!(n.is_null());

        let b = value!(true);
        assert_eq!(b.as_bool(), Some(true));

        let arr = value!([1i64, 2i64, 3i64]);
        assert_eq!(arr.as_array().map(|a| a.len()), Some(3));

        let obj = value!({"name": "Alice", "age": 30i64});
        assert_eq!(obj.get("name").and_then(|v| v.as_str()), Some("Alice"));
    }

    #[test]
    fn test_value_macro_negative_numbers() {
        assert_eq!(value!(-1), Value::Number(-1.0));
        assert_eq!(value!(-2.5), Value::Number(-2.5));

        let arr = value!([-1, 2i64, -3.5]);
        assert_eq!(
            arr.as_array().map(Vec::as_slice),
            Some(&[Value::Number(-1.0), Value::Number(2.0), Value::Number(-3.5)][..])
        );

        let obj = value!({"profit": -1, "nested": {"delta": -2.5}, "list": [-4]});
        assert_eq!(obj.get("profit"), Some(&Value::Number(-1.0)));
        assert_eq!(
            obj.get("nested").and_then(|n| n.get("delta")),
            Some(&Value::Number(-2.5))
        );
        assert_eq!(
            obj.get("list").and_then(|l| l.get_index(0)),
            Some(&Value::Number(-4.0))
        );
    }

    #[test]
    fn test_equality() {
        assert_eq!(Value::Null, Value::Null);
        assert_eq!(Value::Bool(true), Value::Bool(true));
        assert_ne!(Value::Bool(true), Value::Bool(false));
        assert_eq!(Value::Number(42.0), Value::Number(42.0));
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
        assert_eq!(Value::string("hello"), Value::string("hello"));
        assert_ne!(Value::Null, Value::Undefined);
    }

    #[test]
    fn test_serde_roundtrip() {
        let v = value!({"name": "Alice", "scores": [1i64, 2i64, 3i64], "active": true});
        let json_str = v.to_json_string().unwrap();
        let parsed = Value::from_json_str(&json_str).unwrap();
        assert_eq!(v, parsed);
    }

    #[test]
    fn test_display_and_pretty() {
        let v = value!({
            "name": "A\"B",
            "half": 0.5,
            "loss": -2,
            "flags": [null, true],
            "missing": (Value::Undefined)
        });
        assert_eq!(
            v.to_string(),
            r#"{"name":"A\"B","half":0.5,"loss":-2,"flags":[null,true],"missing":undefined}"#
        );
        assert_eq!(Value::Number(f64::NAN).to_string(), "null");

        let pretty = v.to_json_string_pretty().unwrap();
        assert!(pretty.contains('\n'));
        assert!(pretty.contains("\"name\": \"A\\\"B\""));
        assert!(pretty.contains("\"missing\": null"));
    }

    #[test]
    fn test_from_serde_json() {
        let sv = serde_json::json!({"name": "Alice", "age": 30, "scores": [1, 2, 3]});
        let jv = Value::from(sv);
        assert_eq!(jv.get("name").and_then(|v| v.as_str()), Some("Alice"));
        assert_eq!(jv.get("age").and_then(|v| v.as_f64()), Some(30.0));
    }

    #[test]
    fn test_make_mut() {
        let mut arr = Value::array(vec![Value::from(1i64), Value::from(2i64)]);
        let arr2 = arr.clone();

        // Mutate arr — should CoW (clone-on-write)
        arr.as_array_mut().unwrap().push(Value::from(3i64));

        assert_eq!(arr.as_array().unwrap().len(), 3);
        assert_eq!(arr2.as_array().unwrap().len(), 2);
    }
}
